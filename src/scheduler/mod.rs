//! Cooperative generation scheduler.
//!
//! Each island gets exactly one resumable task that walks the footprint's
//! voxel columns and emits material fills. A task processes at most the
//! configured column budget per tick, then suspends with its cursor
//! preserved. Tasks run FIFO, each at most once per tick; a failing task
//! is dropped without retry and never disturbs the others.

use std::collections::{HashSet, VecDeque};

use glam::Vec3;

use crate::core::{Error, WorldConfig};
use crate::grid::ChunkCoord;
use crate::placement::IslandBlob;
use crate::rng::{NoiseField, WorldRng};
use crate::synth::{Archetype, Column, FootprintFrame};
use crate::voxel::{Material, VoxelSink};

/// Lifecycle of a generation task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskState {
    Pending,
    Running,
    Completed,
    Failed,
}

/// Incremental voxel-fill job for one island.
pub struct GenerationTask {
    blob: IslandBlob,
    archetype: Archetype,
    frame: FootprintFrame,
    origin_x: f32,
    origin_z: f32,
    step: f32,
    voxel_height: f32,
    cols_x: usize,
    cols_z: usize,
    /// Flattened row-major cursor over the column grid.
    cursor: usize,
    state: TaskState,
}

impl GenerationTask {
    pub fn new(
        blob: IslandBlob,
        archetype: Archetype,
        frame: FootprintFrame,
        voxel_step: f32,
        voxel_height: f32,
    ) -> Self {
        // One step of overshoot past the rectangle so the edge falloff
        // tapers smoothly beyond the logical footprint.
        let margin = voxel_step;
        let span_x = frame.half_w * 2.0 + 2.0 * margin;
        let span_z = frame.half_d * 2.0 + 2.0 * margin;
        let cols_x = (span_x / voxel_step).ceil().max(0.0) as usize;
        let cols_z = (span_z / voxel_step).ceil().max(0.0) as usize;

        Self {
            blob,
            archetype,
            frame,
            origin_x: frame.center_x - frame.half_w - margin,
            origin_z: frame.center_z - frame.half_d - margin,
            step: voxel_step,
            voxel_height,
            cols_x,
            cols_z,
            cursor: 0,
            state: TaskState::Pending,
        }
    }

    pub fn seed(&self) -> ChunkCoord {
        self.blob.seed
    }

    pub fn state(&self) -> TaskState {
        self.state
    }

    pub fn total_columns(&self) -> usize {
        self.cols_x * self.cols_z
    }

    pub fn columns_done(&self) -> usize {
        self.cursor
    }

    /// Resume the column walk for up to `budget` columns. Returns true
    /// once every column has been processed.
    pub fn advance(
        &mut self,
        budget: usize,
        noise: &NoiseField,
        sink: &mut dyn VoxelSink,
    ) -> Result<bool, Error> {
        match self.state {
            TaskState::Completed => return Ok(true),
            TaskState::Failed => {
                return Err(self.failure("advanced after failure"));
            }
            TaskState::Pending => {
                if !self.frame.is_valid() || self.total_columns() == 0 {
                    self.state = TaskState::Failed;
                    return Err(self.failure("degenerate footprint"));
                }
                self.state = TaskState::Running;
            }
            TaskState::Running => {}
        }

        let total = self.total_columns();
        let end = self.cursor.saturating_add(budget).min(total);
        while self.cursor < end {
            let ix = self.cursor % self.cols_x;
            let iz = self.cursor / self.cols_x;
            let x = self.origin_x + ix as f32 * self.step;
            let z = self.origin_z + iz as f32 * self.step;

            let column = self.archetype.column(x, z, &self.frame, noise);
            if column.is_dry(self.frame.shoreline) {
                self.emit_column(x, z, &column, noise, sink);
            }
            self.cursor += 1;
        }

        if self.cursor >= total {
            self.state = TaskState::Completed;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Write one column as vertical runs of identical material.
    fn emit_column(&self, x: f32, z: f32, column: &Column, noise: &NoiseField, sink: &mut dyn VoxelSink) {
        let half = self.step * 0.5;
        let mut run_start = self.frame.shoreline;
        let mut run_material: Option<Material> = None;

        let mut y = self.frame.shoreline;
        while y < column.top {
            let material = self
                .archetype
                .material(column, y, x, z, &self.frame, noise);
            match run_material {
                Some(current) if current == material => {}
                Some(current) => {
                    sink.fill(
                        Vec3::new(x - half, run_start, z - half),
                        Vec3::new(self.step, y - run_start, self.step),
                        current,
                    );
                    run_start = y;
                    run_material = Some(material);
                }
                None => run_material = Some(material),
            }
            y += self.voxel_height;
        }

        if let Some(material) = run_material {
            sink.fill(
                Vec3::new(x - half, run_start, z - half),
                Vec3::new(self.step, column.top - run_start, self.step),
                material,
            );
        }
    }

    fn failure(&self, reason: &str) -> Error {
        Error::Synthesis {
            seed: self.blob.seed,
            archetype: self.blob.archetype,
            reason: reason.to_string(),
        }
    }
}

/// Drives all active tasks, bounded work per tick.
pub struct GenerationScheduler {
    rng: WorldRng,
    noise: NoiseField,
    chunk_size: f32,
    shoreline: f32,
    voxel_step: f32,
    voxel_height: f32,
    column_budget: usize,
    active: VecDeque<GenerationTask>,
    /// Seeds that ever got a task; guards against duplicate enqueues.
    enqueued: HashSet<ChunkCoord>,
    completed: usize,
    failed: usize,
    columns_processed: u64,
}

impl GenerationScheduler {
    pub fn new(config: &WorldConfig) -> Self {
        Self {
            rng: WorldRng::new(config.seed),
            noise: NoiseField::new(config.seed),
            chunk_size: config.chunk_size,
            shoreline: config.shoreline,
            voxel_step: config.voxel_step,
            voxel_height: config.voxel_height,
            column_budget: config.column_budget,
            active: VecDeque::new(),
            enqueued: HashSet::new(),
            completed: 0,
            failed: 0,
            columns_processed: 0,
        }
    }

    /// Create a task for this island unless one was ever created before.
    /// Returns true if a new task was enqueued.
    pub fn enqueue(&mut self, blob: &IslandBlob) -> bool {
        if !self.enqueued.insert(blob.seed) {
            return false;
        }

        let frame = FootprintFrame::from_blob(blob, self.chunk_size, self.shoreline);
        let archetype = Archetype::derive(blob, &frame, &self.rng);
        let task = GenerationTask::new(*blob, archetype, frame, self.voxel_step, self.voxel_height);
        log::info!(
            "enqueued {} island at {:?}: {}x{} chunks, {} columns",
            blob.archetype,
            blob.seed,
            blob.width,
            blob.depth,
            task.total_columns()
        );
        self.active.push_back(task);
        true
    }

    /// Advance every active task once, FIFO, each within the column budget.
    pub fn advance_all(&mut self, sink: &mut dyn VoxelSink) {
        let rounds = self.active.len();
        for _ in 0..rounds {
            let mut task = match self.active.pop_front() {
                Some(task) => task,
                None => break,
            };
            let before = task.columns_done();
            match task.advance(self.column_budget, &self.noise, sink) {
                Ok(true) => {
                    self.columns_processed += (task.columns_done() - before) as u64;
                    self.completed += 1;
                    log::info!(
                        "completed {} island at {:?} ({} columns)",
                        task.blob.archetype,
                        task.seed(),
                        task.total_columns()
                    );
                }
                Ok(false) => {
                    self.columns_processed += (task.columns_done() - before) as u64;
                    self.active.push_back(task);
                }
                Err(e) => {
                    self.failed += 1;
                    log::warn!("dropping generation task: {e}");
                }
            }
        }
    }

    pub fn was_enqueued(&self, seed: ChunkCoord) -> bool {
        self.enqueued.contains(&seed)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    pub fn completed_count(&self) -> usize {
        self.completed
    }

    pub fn failed_count(&self) -> usize {
        self.failed
    }

    pub fn columns_processed(&self) -> u64 {
        self.columns_processed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synth::ArchetypeKind;
    use crate::voxel::MemoryVoxelSink;

    fn blob(x: i32, z: i32, width: i32, depth: i32, kind: ArchetypeKind) -> IslandBlob {
        IslandBlob {
            seed: ChunkCoord::new(x, z),
            width,
            depth,
            archetype: kind,
        }
    }

    fn config() -> WorldConfig {
        WorldConfig { seed: 1000, ..Default::default() }
    }

    fn make_task(config: &WorldConfig, blob: &IslandBlob) -> GenerationTask {
        let rng = WorldRng::new(config.seed);
        let frame = FootprintFrame::from_blob(blob, config.chunk_size, config.shoreline);
        let archetype = Archetype::derive(blob, &frame, &rng);
        GenerationTask::new(*blob, archetype, frame, config.voxel_step, config.voxel_height)
    }

    #[test]
    fn test_task_column_count() {
        // 1x1 chunk of 256 units, step 4, one step of overshoot per side:
        // ceil(264 / 4) = 66 columns per axis.
        let config = config();
        let task = make_task(&config, &blob(4, 4, 1, 1, ArchetypeKind::Beachy));
        assert_eq!(task.total_columns(), 66 * 66);
    }

    #[test]
    fn test_task_budget_bound_and_completion_count() {
        let config = config();
        let mut task = make_task(&config, &blob(4, 4, 1, 1, ArchetypeKind::Beachy));
        let noise = NoiseField::new(config.seed);
        let mut sink = MemoryVoxelSink::new();

        let budget = config.column_budget;
        let expected = task.total_columns().div_ceil(budget);

        let mut advances = 0;
        loop {
            let before = task.columns_done();
            let done = task.advance(budget, &noise, &mut sink).unwrap();
            advances += 1;
            assert!(
                task.columns_done() - before <= budget,
                "advance exceeded its budget"
            );
            if done {
                break;
            }
            assert!(advances < expected, "task should not finish early");
        }

        assert_eq!(advances, expected);
        assert_eq!(task.state(), TaskState::Completed);
        assert!(sink.fill_count() > 0, "a beachy island should emit terrain");
    }

    #[test]
    fn test_task_resumes_where_it_suspended() {
        let config = config();
        let mut task = make_task(&config, &blob(4, 4, 1, 1, ArchetypeKind::Plateau));
        let noise = NoiseField::new(config.seed);
        let mut sink = MemoryVoxelSink::new();

        assert_eq!(task.state(), TaskState::Pending);
        task.advance(100, &noise, &mut sink).unwrap();
        assert_eq!(task.state(), TaskState::Running);
        assert_eq!(task.columns_done(), 100);
        task.advance(50, &noise, &mut sink).unwrap();
        assert_eq!(task.columns_done(), 150);
    }

    #[test]
    fn test_degenerate_footprint_fails() {
        let config = config();
        let mut task = make_task(&config, &blob(4, 4, 0, 1, ArchetypeKind::Beachy));
        let noise = NoiseField::new(config.seed);
        let mut sink = MemoryVoxelSink::new();

        let err = task.advance(100, &noise, &mut sink).unwrap_err();
        assert_eq!(task.state(), TaskState::Failed);
        let msg = err.to_string();
        assert!(msg.contains("beachy"), "error should name the archetype: {msg}");
        assert_eq!(sink.fill_count(), 0);
    }

    #[test]
    fn test_enqueue_is_idempotent() {
        let config = config();
        let mut scheduler = GenerationScheduler::new(&config);
        let island = blob(4, 4, 2, 2, ArchetypeKind::Beachy);

        assert!(scheduler.enqueue(&island));
        assert!(!scheduler.enqueue(&island));
        assert_eq!(scheduler.active_count(), 1);
        assert!(scheduler.was_enqueued(island.seed));
    }

    #[test]
    fn test_enqueue_guard_outlives_completion() {
        let config = config();
        let mut scheduler = GenerationScheduler::new(&config);
        let island = blob(4, 4, 1, 1, ArchetypeKind::Beachy);
        let mut sink = MemoryVoxelSink::new();

        scheduler.enqueue(&island);
        while scheduler.active_count() > 0 {
            scheduler.advance_all(&mut sink);
        }
        assert_eq!(scheduler.completed_count(), 1);

        // Completion must not re-open the door for a second task.
        assert!(!scheduler.enqueue(&island));
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_each_task_advanced_once_per_tick() {
        let config = config();
        let mut scheduler = GenerationScheduler::new(&config);
        scheduler.enqueue(&blob(0, 0, 2, 2, ArchetypeKind::Beachy));
        scheduler.enqueue(&blob(10, 10, 2, 2, ArchetypeKind::Mountainous));

        let mut sink = MemoryVoxelSink::new();
        scheduler.advance_all(&mut sink);

        // Both tasks are far larger than one budget, so one tick processes
        // exactly one budget's worth of columns for each.
        assert_eq!(
            scheduler.columns_processed(),
            2 * config.column_budget as u64
        );
        assert_eq!(scheduler.active_count(), 2);
    }

    #[test]
    fn test_failed_task_does_not_stall_others() {
        let config = config();
        let mut scheduler = GenerationScheduler::new(&config);
        scheduler.enqueue(&blob(0, 0, 0, 0, ArchetypeKind::Beachy));
        scheduler.enqueue(&blob(10, 10, 1, 1, ArchetypeKind::Beachy));

        let mut sink = MemoryVoxelSink::new();
        scheduler.advance_all(&mut sink);
        assert_eq!(scheduler.failed_count(), 1);
        assert_eq!(scheduler.active_count(), 1);

        for _ in 0..64 {
            scheduler.advance_all(&mut sink);
            if scheduler.active_count() == 0 {
                break;
            }
        }
        assert_eq!(scheduler.completed_count(), 1);
        assert!(sink.fill_count() > 0);
    }

    #[test]
    fn test_fills_start_at_shoreline() {
        let config = config();
        let mut scheduler = GenerationScheduler::new(&config);
        scheduler.enqueue(&blob(4, 4, 1, 1, ArchetypeKind::Mountainous));

        let mut sink = MemoryVoxelSink::new();
        while scheduler.active_count() > 0 {
            scheduler.advance_all(&mut sink);
        }

        assert!(sink.fill_count() > 0);
        for fill in &sink.fills {
            assert!(fill.origin.y >= config.shoreline);
            assert!(fill.extent.y > 0.0);
        }
    }
}
