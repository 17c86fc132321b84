//! Plateau islands: steep-rimmed flat tops with shallow bumps and
//! scattered rock at the bump crests.

use crate::rng::{NoiseField, SeedStream};
use crate::voxel::Material;

use super::{derive_bays, dither_grass, Bump, Column, FootprintFrame, IslandShape, NoiseLayer};

#[derive(Clone, Debug)]
pub struct Plateau {
    pub shape: IslandShape,
    sand_band: f32,
    /// Rock appears only above this band fraction...
    rock_frac: f32,
    /// ...and only where the column's bump lift exceeds this.
    lift_threshold: f32,
    dither_wavelength: f32,
}

impl Plateau {
    pub fn derive(stream: &mut SeedStream, frame: &FootprintFrame) -> Self {
        let relief = 0.75 + 0.25 * frame.size_scale;
        let target = frame.shoreline + stream.next_f32_range(14.0, 22.0);
        // Exponent below 1 keeps the top flat and the rim steep.
        let dome_exp = stream.next_f32_range(0.45, 0.7);
        let bays = derive_bays(stream, frame, 2, 3.0, 6.0);

        let bump_count = stream.next_range(2, 4);
        let bumps = (0..bump_count)
            .map(|_| {
                let u = stream.next_f32_range(-0.5, 0.5);
                let v = stream.next_f32_range(-0.5, 0.5);
                Bump {
                    x: frame.center_x + u * frame.half_w,
                    z: frame.center_z + v * frame.half_d,
                    sigma: frame.min_half() * stream.next_f32_range(0.10, 0.22),
                    height: stream.next_f32_range(1.5, 3.5),
                }
            })
            .collect();

        let layers = vec![
            NoiseLayer {
                wavelength: stream.next_f32_range(70.0, 110.0),
                amplitude: 1.8 * relief,
                channel: 0,
            },
            NoiseLayer {
                wavelength: stream.next_f32_range(20.0, 36.0),
                amplitude: 0.9 * relief,
                channel: 1,
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
            rock_frac: 0.8,
            lift_threshold: 1.2,
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
        if column.lift > self.lift_threshold && rel > self.rock_frac {
            return Material::Rock;
        }
        dither_grass(x, z, self.dither_wavelength, noise)
    }
}
