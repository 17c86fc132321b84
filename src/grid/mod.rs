//! Chunk grid: world-to-chunk mapping and the loaded-chunk registry

use std::collections::HashMap;

use glam::Vec3;

/// Integer coordinate identifying a chunk column in the world grid
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    /// Create a new chunk coordinate
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Convert world position to chunk coordinate
    pub fn from_world_pos(pos: Vec3, chunk_size: f32) -> Self {
        Self {
            x: (pos.x / chunk_size).floor() as i32,
            z: (pos.z / chunk_size).floor() as i32,
        }
    }

    /// Get the world-space origin (minimum corner) of this chunk
    pub fn world_origin(&self, chunk_size: f32) -> Vec3 {
        Vec3::new(self.x as f32 * chunk_size, 0.0, self.z as f32 * chunk_size)
    }

    /// Get the world-space center of this chunk, at y = 0
    pub fn world_center(&self, chunk_size: f32) -> Vec3 {
        self.world_origin(chunk_size) + Vec3::new(chunk_size * 0.5, 0.0, chunk_size * 0.5)
    }

    /// Chebyshev (chessboard) distance to another chunk coordinate
    pub fn chebyshev_distance(&self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// Coordinate offset by (dx, dz)
    pub fn offset(&self, dx: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.z + dz)
    }
}

/// Cosmetic marker style, fixed at load time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MarkerStyle {
    /// Unresolved chunk / no island.
    Neutral,
    /// Chunk belongs to an island footprint.
    Island,
}

/// Opaque handle to a marker entity owned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Host-side marker entity sink. The engine creates one marker per loaded
/// chunk and destroys it on unload; markers have no behavior of their own.
pub trait MarkerSink {
    fn create(&mut self, center: Vec3, size: Vec3, style: MarkerStyle) -> MarkerId;
    fn destroy(&mut self, id: MarkerId);
}

/// Marker sink that only tracks live handles. Used by tests and headless runs.
#[derive(Debug, Default)]
pub struct CountingMarkerSink {
    next_id: u64,
    live: std::collections::HashSet<MarkerId>,
    pub created_total: usize,
}

impl CountingMarkerSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, id: MarkerId) -> bool {
        self.live.contains(&id)
    }
}

impl MarkerSink for CountingMarkerSink {
    fn create(&mut self, _center: Vec3, _size: Vec3, _style: MarkerStyle) -> MarkerId {
        let id = MarkerId(self.next_id);
        self.next_id += 1;
        self.created_total += 1;
        self.live.insert(id);
        id
    }

    fn destroy(&mut self, id: MarkerId) {
        self.live.remove(&id);
    }
}

/// A currently loaded chunk: its coordinate and the marker it owns.
#[derive(Clone, Copy, Debug)]
pub struct ChunkRecord {
    pub coord: ChunkCoord,
    pub marker: MarkerId,
    pub style: MarkerStyle,
}

/// Registry of loaded chunks. Load and unload are idempotent; there is
/// never more than one record per coordinate.
pub struct ChunkGrid {
    chunk_size: f32,
    records: HashMap<ChunkCoord, ChunkRecord>,
}

impl ChunkGrid {
    pub fn new(chunk_size: f32) -> Self {
        Self {
            chunk_size,
            records: HashMap::new(),
        }
    }

    pub fn chunk_size(&self) -> f32 {
        self.chunk_size
    }

    pub fn is_loaded(&self, coord: ChunkCoord) -> bool {
        self.records.contains_key(&coord)
    }

    pub fn loaded_count(&self) -> usize {
        self.records.len()
    }

    pub fn record(&self, coord: ChunkCoord) -> Option<&ChunkRecord> {
        self.records.get(&coord)
    }

    pub fn loaded_coords(&self) -> impl Iterator<Item = ChunkCoord> + '_ {
        self.records.keys().copied()
    }

    /// Load a chunk, creating its marker. Returns false if already loaded.
    pub fn load(
        &mut self,
        coord: ChunkCoord,
        style: MarkerStyle,
        markers: &mut dyn MarkerSink,
    ) -> bool {
        if self.records.contains_key(&coord) {
            return false;
        }
        let size = Vec3::new(self.chunk_size, 1.0, self.chunk_size);
        let marker = markers.create(coord.world_center(self.chunk_size), size, style);
        self.records.insert(coord, ChunkRecord { coord, marker, style });
        log::debug!("loaded chunk {:?} ({:?})", coord, style);
        true
    }

    /// Unload a chunk, releasing its marker. Returns false if not loaded.
    pub fn unload(&mut self, coord: ChunkCoord, markers: &mut dyn MarkerSink) -> bool {
        match self.records.remove(&coord) {
            Some(record) => {
                markers.destroy(record.marker);
                log::debug!("unloaded chunk {:?}", coord);
                true
            }
            None => false,
        }
    }
}
