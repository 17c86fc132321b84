//! Streaming controller: the per-tick observer scan that loads and
//! unloads chunks, discovers islands, and drives the scheduler.
//!
//! Ordering within one tick: all load/unload work for every observer
//! completes first, then active tasks advance. Unloading a chunk never
//! cancels an in-flight task; synthesis always runs to completion or
//! failure regardless of chunk visibility.

use std::collections::HashSet;

use glam::Vec3;

use crate::core::WorldConfig;
use crate::grid::{ChunkCoord, ChunkGrid, MarkerSink, MarkerStyle};
use crate::placement::PlacementEngine;
use crate::scheduler::GenerationScheduler;
use crate::voxel::VoxelSink;

/// Snapshot of streaming state for logging and tests.
#[derive(Clone, Copy, Debug)]
pub struct StreamerStats {
    pub loaded_chunks: usize,
    pub islands_discovered: usize,
    pub tasks_active: usize,
    pub tasks_completed: usize,
    pub tasks_failed: usize,
    pub columns_processed: u64,
}

/// Streams the world around a set of observers.
pub struct WorldStreamer {
    config: WorldConfig,
    grid: ChunkGrid,
    placement: PlacementEngine,
    scheduler: GenerationScheduler,
    islands_discovered: usize,
    tick_count: u64,
}

impl WorldStreamer {
    pub fn new(config: WorldConfig) -> Self {
        Self {
            grid: ChunkGrid::new(config.chunk_size),
            placement: PlacementEngine::new(&config),
            scheduler: GenerationScheduler::new(&config),
            islands_discovered: 0,
            tick_count: 0,
            config,
        }
    }

    /// One streaming tick. Observers without a resolvable position this
    /// tick pass `None` and are skipped.
    pub fn tick(
        &mut self,
        observers: &[Option<Vec3>],
        markers: &mut dyn MarkerSink,
        voxels: &mut dyn VoxelSink,
    ) {
        // Collect wanted chunks in a fixed order (observer order, then
        // row-major over the radius window) so placement decisions are
        // evaluated in a reproducible sequence.
        let radius = self.config.load_radius;
        let mut wanted: HashSet<ChunkCoord> = HashSet::new();
        let mut scan_order: Vec<ChunkCoord> = Vec::new();
        for pos in observers.iter().flatten() {
            let center = ChunkCoord::from_world_pos(*pos, self.config.chunk_size);
            for dz in -radius..=radius {
                for dx in -radius..=radius {
                    let coord = center.offset(dx, dz);
                    if wanted.insert(coord) {
                        scan_order.push(coord);
                    }
                }
            }
        }

        for coord in scan_order {
            if self.grid.is_loaded(coord) {
                continue;
            }
            let island = self.placement.is_island_chunk(coord);
            let style = if island {
                MarkerStyle::Island
            } else {
                MarkerStyle::Neutral
            };
            self.grid.load(coord, style, markers);

            if island {
                if let Some(blob) = self.placement.blob_at(coord).copied() {
                    if self.scheduler.enqueue(&blob) {
                        self.islands_discovered += 1;
                    }
                }
            }
        }

        let stale: Vec<ChunkCoord> = self
            .grid
            .loaded_coords()
            .filter(|coord| !wanted.contains(coord))
            .collect();
        for coord in stale {
            self.grid.unload(coord, markers);
        }

        self.scheduler.advance_all(voxels);
        self.tick_count += 1;
    }

    pub fn stats(&self) -> StreamerStats {
        StreamerStats {
            loaded_chunks: self.grid.loaded_count(),
            islands_discovered: self.islands_discovered,
            tasks_active: self.scheduler.active_count(),
            tasks_completed: self.scheduler.completed_count(),
            tasks_failed: self.scheduler.failed_count(),
            columns_processed: self.scheduler.columns_processed(),
        }
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn grid(&self) -> &ChunkGrid {
        &self.grid
    }

    pub fn placement(&self) -> &PlacementEngine {
        &self.placement
    }

    pub fn scheduler(&self) -> &GenerationScheduler {
        &self.scheduler
    }
}
