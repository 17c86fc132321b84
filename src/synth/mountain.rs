//! Mountainous islands: tall Gaussian peaks, a rock band, and a snow cap.

use crate::rng::{NoiseField, SeedStream};
use crate::voxel::Material;

use super::{derive_bays, dither_grass, Bump, Column, FootprintFrame, IslandShape, NoiseLayer};

#[derive(Clone, Debug)]
pub struct Mountainous {
    pub shape: IslandShape,
    sand_band: f32,
    rock_frac: f32,
    snow_frac: f32,
    dither_wavelength: f32,
}

impl Mountainous {
    pub fn derive(stream: &mut SeedStream, frame: &FootprintFrame) -> Self {
        let relief = 0.75 + 0.25 * frame.size_scale;
        let target = frame.shoreline + stream.next_f32_range(18.0, 28.0);
        let dome_exp = stream.next_f32_range(1.5, 2.4);
        let bays = derive_bays(stream, frame, 2, 4.0, 8.0);

        // Peaks cluster near the center; height scales with island size.
        let peak_count = stream.next_range(1, 3);
        let bumps = (0..peak_count)
            .map(|_| {
                let u = stream.next_f32_range(-0.35, 0.35);
                let v = stream.next_f32_range(-0.35, 0.35);
                Bump {
                    x: frame.center_x + u * frame.half_w,
                    z: frame.center_z + v * frame.half_d,
                    sigma: frame.min_half() * stream.next_f32_range(0.15, 0.30),
                    height: stream.next_f32_range(12.0, 20.0) * relief,
                }
            })
            .collect();

        let layers = vec![
            NoiseLayer {
                wavelength: stream.next_f32_range(100.0, 150.0),
                amplitude: 4.5 * relief,
                channel: 0,
            },
            NoiseLayer {
                wavelength: stream.next_f32_range(36.0, 60.0),
                amplitude: 2.2 * relief,
                channel: 1,
            },
            NoiseLayer {
                wavelength: stream.next_f32_range(12.0, 20.0),
                amplitude: 1.0 * relief,
                channel: 2,
            },
        ];

        Self {
            shape: IslandShape {
                target,
                dome_exp,
                bays,
                bumps,
                layers,
            },
            sand_band: stream.next_f32_range(1.5, 3.0),
            rock_frac: stream.next_f32_range(0.50, 0.60),
            snow_frac: stream.next_f32_range(0.88, 0.93),
            dither_wavelength: stream.next_f32_range(8.0, 12.0),
        }
    }

    pub fn material(
        &self,
        column: &Column,
        y: f32,
        x: f32,
        z: f32,
        frame: &FootprintFrame,
        noise: &NoiseField,
    ) -> Material {
        if y <= frame.shoreline + self.sand_band {
            return Material::Sand;
        }
        let span = column.top - frame.shoreline;
        let rel = ((y - frame.shoreline) / span).clamp(0.0, 1.0);
        if rel > self.snow_frac {
            return Material::Snow;
        }
        if rel > self.rock_frac {
            return Material::Rock;
        }
        dither_grass(x, z, self.dither_wavelength, noise)
    }
}
