//! Beachy islands: low sandy domes with wide coves and no rock.

use crate::rng::{NoiseField, SeedStream};
use crate::voxel::Material;

use super::{derive_bays, dither_grass, Column, FootprintFrame, IslandShape, NoiseLayer};

/// Low-relief island: broad sand band, grassy interior, a neutral ground
/// crown where other archetypes would show rock.
#[derive(Clone, Debug)]
pub struct Beachy {
    pub shape: IslandShape,
    sand_band: f32,
    cap_frac: f32,
    dither_wavelength: f32,
}

impl Beachy {
    pub fn derive(stream: &mut SeedStream, frame: &FootprintFrame) -> Self {
        let relief = 0.75 + 0.25 * frame.size_scale;
        let target = frame.shoreline + stream.next_f32_range(8.0, 14.0);
        let dome_exp = stream.next_f32_range(1.2, 2.0);
        let bays = derive_bays(stream, frame, 3, 2.0, 4.5);
        let layers = vec![
            NoiseLayer {
                wavelength: stream.next_f32_range(90.0, 140.0),
                amplitude: 2.2 * relief,
                channel: 0,
            },
            NoiseLayer {
                wavelength: stream.next_f32_range(28.0, 48.0),
                amplitude: 1.1 * relief,
                channel: 1,
            },
        ];

        Self {
            shape: IslandShape {
                target,
                dome_exp,
                bays,
                bumps: Vec::new(),
                layers,
            },
            sand_band: stream.next_f32_range(2.0, 4.0),
            cap_frac: 0.88,
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
        if rel > self.cap_frac {
            return Material::Ground;
        }
        dither_grass(x, z, self.dither_wavelength, noise)
    }
}
