//! Deterministic randomness: salted coordinate hashing, reproducible
//! per-island draw streams, and coordinate-continuous noise channels.
//!
//! Everything here is a pure function of (world seed, coordinate, salt),
//! which is what makes worlds reproducible and testable.

use noise::{NoiseFn, Perlin};

use crate::grid::ChunkCoord;

/// Integer hash mixing a coordinate pair with the world seed and a salt.
///
/// The salt disambiguates independent uses at the same coordinate
/// (spawn roll vs. sizing vs. archetype choice).
#[inline]
pub fn hash_coord(seed: u32, x: i32, z: i32, salt: u32) -> u32 {
    let mut h = (x as u32)
        .wrapping_mul(374_761_393)
        .wrapping_add((z as u32).wrapping_mul(668_265_263))
        .wrapping_add(seed.wrapping_mul(1_274_126_177))
        .wrapping_add(salt.wrapping_mul(2_246_822_519));
    h = (h ^ (h >> 13)).wrapping_mul(1_103_515_245);
    h ^ (h >> 16)
}

/// Map a hash to [0, 1).
#[inline]
pub fn to_unit(h: u32) -> f32 {
    h as f32 * (1.0 / 4_294_967_296.0)
}

/// A reproducible sequence of uniform draws seeded from a chunk coordinate.
///
/// xorshift over a hashed non-zero state; cheap and stable across platforms.
#[derive(Clone, Debug)]
pub struct SeedStream {
    state: u32,
}

impl SeedStream {
    fn from_hash(h: u32) -> Self {
        // xorshift needs a non-zero state
        Self { state: h.max(1) }
    }

    fn next_u32(&mut self) -> u32 {
        let mut s = self.state;
        s ^= s << 13;
        s ^= s >> 17;
        s ^= s << 5;
        self.state = s;
        s
    }

    /// Uniform draw in [0, 1).
    pub fn next_f32(&mut self) -> f32 {
        to_unit(self.next_u32())
    }

    /// Uniform draw in [lo, hi] (inclusive).
    pub fn next_range(&mut self, lo: i32, hi: i32) -> i32 {
        debug_assert!(lo <= hi);
        let span = (hi - lo + 1) as u32;
        lo + (self.next_u32() % span) as i32
    }

    /// Uniform draw in [lo, hi).
    pub fn next_f32_range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// Index into a weighted discrete distribution.
    pub fn weighted(&mut self, weights: &[f32]) -> usize {
        let total: f32 = weights.iter().sum();
        let mut roll = self.next_f32() * total;
        for (i, w) in weights.iter().enumerate() {
            if roll < *w {
                return i;
            }
            roll -= w;
        }
        weights.len() - 1
    }
}

/// Derives per-coordinate hashes and draw streams from the world seed.
#[derive(Clone, Debug)]
pub struct WorldRng {
    seed: u32,
}

impl WorldRng {
    pub fn new(seed: u32) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// One-shot uniform value in [0, 1) for a coordinate and salt.
    pub fn chance(&self, coord: ChunkCoord, salt: u32) -> f32 {
        to_unit(hash_coord(self.seed, coord.x, coord.z, salt))
    }

    /// A reproducible draw stream for a coordinate and salt.
    pub fn stream(&self, coord: ChunkCoord, salt: u32) -> SeedStream {
        SeedStream::from_hash(hash_coord(self.seed, coord.x, coord.z, salt))
    }
}

/// Smooth coordinate-continuous noise with decorrelated channels.
///
/// Channels shift the sample domain by hashed fractional offsets, so one
/// generator serves any number of independent fields.
pub struct NoiseField {
    perlin: Perlin,
    seed: u32,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
            seed,
        }
    }

    /// Sample channel `channel` at (x, z). Returns a value in [-1, 1].
    ///
    /// Callers scale coordinates by their own wavelength before sampling.
    pub fn sample(&self, x: f32, z: f32, channel: u32) -> f32 {
        // Fractional offsets keep channels off each other's lattice.
        let ox = hash_coord(self.seed, channel as i32, 17, channel) % 4096;
        let oz = hash_coord(self.seed, channel as i32, 91, channel.wrapping_add(7)) % 4096;
        let v = self.perlin.get([
            x as f64 + ox as f64 * 0.37,
            z as f64 + oz as f64 * 0.61,
        ]);
        (v as f32).clamp(-1.0, 1.0)
    }
}
