//! Height-field synthesis for island archetypes.
//!
//! Three archetypes share one skeleton: a smoothstep edge falloff over the
//! footprint, a domed base slope from the shoreline up to a target
//! elevation, subtractive bays, additive bumps or peaks, and a stack of
//! noise layers whose amplitude scales with island size. They differ in
//! their shape parameters and in how elevation bands map to materials.

pub mod beachy;
pub mod mountain;
pub mod plateau;

pub use beachy::Beachy;
pub use mountain::Mountainous;
pub use plateau::Plateau;

use crate::math::smooth01;
use crate::placement::IslandBlob;
use crate::rng::{NoiseField, SeedStream, WorldRng};
use crate::voxel::Material;

/// Salt for an island's shape parameter stream.
const SHAPE_SALT: u32 = 51;

/// Noise channel used for grass color dithering.
const DITHER_CHANNEL: u32 = 3;

/// A column whose top does not clear the shoreline by this much stays
/// underwater and emits nothing.
pub const SHORE_EPSILON: f32 = 0.25;

/// Closed set of island archetypes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ArchetypeKind {
    Beachy,
    Plateau,
    Mountainous,
}

impl ArchetypeKind {
    /// Select an archetype from a uniform roll over probability bands.
    pub fn pick(roll: f32, weights: [f32; 3]) -> Self {
        let total: f32 = weights.iter().sum();
        let r = roll * total;
        if r < weights[0] {
            ArchetypeKind::Beachy
        } else if r < weights[0] + weights[1] {
            ArchetypeKind::Plateau
        } else {
            ArchetypeKind::Mountainous
        }
    }
}

impl std::fmt::Display for ArchetypeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ArchetypeKind::Beachy => "beachy",
            ArchetypeKind::Plateau => "plateau",
            ArchetypeKind::Mountainous => "mountainous",
        };
        f.write_str(name)
    }
}

/// World-space geometry of one island footprint.
#[derive(Clone, Copy, Debug)]
pub struct FootprintFrame {
    pub center_x: f32,
    pub center_z: f32,
    pub half_w: f32,
    pub half_d: f32,
    /// Mean footprint side in chunks; scales relief on larger islands.
    pub size_scale: f32,
    pub shoreline: f32,
}

impl FootprintFrame {
    pub fn from_blob(blob: &IslandBlob, chunk_size: f32, shoreline: f32) -> Self {
        let origin_x = blob.seed.x as f32 * chunk_size;
        let origin_z = blob.seed.z as f32 * chunk_size;
        let w = blob.width as f32 * chunk_size;
        let d = blob.depth as f32 * chunk_size;
        Self {
            center_x: origin_x + w * 0.5,
            center_z: origin_z + d * 0.5,
            half_w: w * 0.5,
            half_d: d * 0.5,
            size_scale: (blob.width + blob.depth) as f32 * 0.5,
            shoreline,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.half_w > 0.0 && self.half_d > 0.0
    }

    pub fn min_half(&self) -> f32 {
        self.half_w.min(self.half_d)
    }

    /// Normalized radial distance from the footprint center; 1.0 at the
    /// nominal edge.
    pub fn radial(&self, x: f32, z: f32) -> f32 {
        let nx = (x - self.center_x) / self.half_w;
        let nz = (z - self.center_z) / self.half_d;
        (nx * nx + nz * nz).sqrt()
    }
}

/// A circular depression carved out of the height field.
#[derive(Clone, Copy, Debug)]
pub struct Bay {
    pub x: f32,
    pub z: f32,
    pub radius: f32,
    pub depth: f32,
}

impl Bay {
    /// Influence in [0, 1], smoothstep-blended at the rim.
    pub fn influence(&self, x: f32, z: f32) -> f32 {
        let d = ((x - self.x).powi(2) + (z - self.z).powi(2)).sqrt();
        1.0 - smooth01(d / self.radius)
    }
}

/// A Gaussian-falloff elevation added to the height field.
#[derive(Clone, Copy, Debug)]
pub struct Bump {
    pub x: f32,
    pub z: f32,
    pub sigma: f32,
    pub height: f32,
}

impl Bump {
    pub fn influence(&self, x: f32, z: f32) -> f32 {
        let d2 = (x - self.x).powi(2) + (z - self.z).powi(2);
        (-d2 / (2.0 * self.sigma * self.sigma)).exp()
    }
}

/// One noise octave: wavelength in world units, amplitude in height units.
#[derive(Clone, Copy, Debug)]
pub struct NoiseLayer {
    pub wavelength: f32,
    pub amplitude: f32,
    pub channel: u32,
}

/// The shared shape skeleton every archetype composes.
#[derive(Clone, Debug)]
pub struct IslandShape {
    /// Elevation at the island center before bays/bumps/noise.
    pub target: f32,
    /// Power applied to (1 - falloff); >1 domes, <1 flattens.
    pub dome_exp: f32,
    pub bays: Vec<Bay>,
    pub bumps: Vec<Bump>,
    pub layers: Vec<NoiseLayer>,
}

/// One sampled voxel column: computed top elevation plus the bump lift
/// that went into it (plateaus scatter rock where the lift is high).
#[derive(Clone, Copy, Debug)]
pub struct Column {
    pub top: f32,
    pub lift: f32,
}

impl Column {
    pub fn is_dry(&self, shoreline: f32) -> bool {
        self.top > shoreline + SHORE_EPSILON
    }
}

impl IslandShape {
    /// Compute the column at (x, z). Beyond the falloff boundary the
    /// column sits at the shoreline and emits nothing.
    pub fn column(&self, x: f32, z: f32, frame: &FootprintFrame, noise: &NoiseField) -> Column {
        let r = frame.radial(x, z);
        if r >= 1.0 {
            return Column { top: frame.shoreline, lift: 0.0 };
        }

        let falloff = smooth01(r);
        let interior = 1.0 - falloff;
        let mut top = frame.shoreline + (self.target - frame.shoreline) * interior.powf(self.dome_exp);

        for bay in &self.bays {
            top -= bay.depth * bay.influence(x, z);
        }

        let mut lift = 0.0;
        for bump in &self.bumps {
            lift += bump.height * bump.influence(x, z);
        }
        top += lift;

        // Noise fades toward the rim so the falloff stays soft.
        for layer in &self.layers {
            let n = noise.sample(x / layer.wavelength, z / layer.wavelength, layer.channel);
            top += n * layer.amplitude * interior;
        }

        Column { top, lift }
    }
}

/// Grass-band color dither: leafy grass where a high-frequency noise
/// channel runs positive.
pub(crate) fn dither_grass(x: f32, z: f32, wavelength: f32, noise: &NoiseField) -> Material {
    if noise.sample(x / wavelength, z / wavelength, DITHER_CHANNEL) > 0.1 {
        Material::LeafyGrass
    } else {
        Material::Grass
    }
}

/// Draw 1..=max circular bays inside the footprint.
pub(crate) fn derive_bays(
    stream: &mut SeedStream,
    frame: &FootprintFrame,
    max: i32,
    depth_lo: f32,
    depth_hi: f32,
) -> Vec<Bay> {
    let count = stream.next_range(1, max);
    (0..count)
        .map(|_| {
            let u = stream.next_f32_range(-0.6, 0.6);
            let v = stream.next_f32_range(-0.6, 0.6);
            Bay {
                x: frame.center_x + u * frame.half_w,
                z: frame.center_z + v * frame.half_d,
                radius: frame.min_half() * stream.next_f32_range(0.15, 0.35),
                depth: stream.next_f32_range(depth_lo, depth_hi),
            }
        })
        .collect()
}

/// An island's complete synthesizer: shape plus material policy.
#[derive(Clone, Debug)]
pub enum Archetype {
    Beachy(Beachy),
    Plateau(Plateau),
    Mountainous(Mountainous),
}

impl Archetype {
    /// Derive the archetype's parameters from the island's own seeded
    /// stream. Same blob, same world seed: identical parameters.
    pub fn derive(blob: &IslandBlob, frame: &FootprintFrame, rng: &WorldRng) -> Self {
        let mut stream = rng.stream(blob.seed, SHAPE_SALT);
        match blob.archetype {
            ArchetypeKind::Beachy => Archetype::Beachy(Beachy::derive(&mut stream, frame)),
            ArchetypeKind::Plateau => Archetype::Plateau(Plateau::derive(&mut stream, frame)),
            ArchetypeKind::Mountainous => {
                Archetype::Mountainous(Mountainous::derive(&mut stream, frame))
            }
        }
    }

    pub fn kind(&self) -> ArchetypeKind {
        match self {
            Archetype::Beachy(_) => ArchetypeKind::Beachy,
            Archetype::Plateau(_) => ArchetypeKind::Plateau,
            Archetype::Mountainous(_) => ArchetypeKind::Mountainous,
        }
    }

    /// Sample the height column at (x, z).
    pub fn column(&self, x: f32, z: f32, frame: &FootprintFrame, noise: &NoiseField) -> Column {
        match self {
            Archetype::Beachy(a) => a.shape.column(x, z, frame, noise),
            Archetype::Plateau(a) => a.shape.column(x, z, frame, noise),
            Archetype::Mountainous(a) => a.shape.column(x, z, frame, noise),
        }
    }

    /// Classify the material at elevation `y` within a column.
    pub fn material(
        &self,
        column: &Column,
        y: f32,
        x: f32,
        z: f32,
        frame: &FootprintFrame,
        noise: &NoiseField,
    ) -> Material {
        match self {
            Archetype::Beachy(a) => a.material(column, y, x, z, frame, noise),
            Archetype::Plateau(a) => a.material(column, y, x, z, frame, noise),
            Archetype::Mountainous(a) => a.material(column, y, x, z, frame, noise),
        }
    }
}
