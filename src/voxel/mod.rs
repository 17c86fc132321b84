//! Voxel materials and the terrain write sink

use glam::Vec3;

/// Terrain material tags emitted by the synthesizers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Material {
    Sand,
    Grass,
    LeafyGrass,
    Ground,
    Rock,
    Snow,
}

impl Material {
    /// Elevation band rank: sand < grass < rock-substitutes < snow.
    ///
    /// Grass and leafy grass are the same band (they dither against each
    /// other); ground is the beachy/plateau stand-in for rock.
    pub fn band(&self) -> u8 {
        match self {
            Material::Sand => 0,
            Material::Grass | Material::LeafyGrass => 1,
            Material::Ground | Material::Rock => 2,
            Material::Snow => 3,
        }
    }
}

/// One region write accepted by a [`VoxelSink`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FillOp {
    /// Minimum corner of the filled box.
    pub origin: Vec3,
    /// Box extent along each axis.
    pub extent: Vec3,
    pub material: Material,
}

/// Opaque terrain write primitive. Fire-and-forget: fills are idempotent
/// per coordinate and order-insensitive across disjoint regions.
pub trait VoxelSink {
    fn fill(&mut self, origin: Vec3, extent: Vec3, material: Material);
}

/// Sink that records every fill. Used by tests and the headless demo.
#[derive(Debug, Default)]
pub struct MemoryVoxelSink {
    pub fills: Vec<FillOp>,
}

impl MemoryVoxelSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fill_count(&self) -> usize {
        self.fills.len()
    }

    pub fn count_of(&self, material: Material) -> usize {
        self.fills.iter().filter(|f| f.material == material).count()
    }

    /// Highest filled elevation, if anything was written.
    pub fn max_height(&self) -> Option<f32> {
        self.fills
            .iter()
            .map(|f| f.origin.y + f.extent.y)
            .max_by(|a, b| a.total_cmp(b))
    }
}

impl VoxelSink for MemoryVoxelSink {
    fn fill(&mut self, origin: Vec3, extent: Vec3, material: Material) {
        self.fills.push(FillOp { origin, extent, material });
    }
}

/// Sink that counts fills without storing them. Used by benchmarks.
#[derive(Debug, Default)]
pub struct DiscardVoxelSink {
    pub fills: usize,
}

impl VoxelSink for DiscardVoxelSink {
    fn fill(&mut self, _origin: Vec3, _extent: Vec3, _material: Material) {
        self.fills += 1;
    }
}
