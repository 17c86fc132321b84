//! Headless streaming demo: walks an observer across the world and
//! reports what got discovered and generated.

use glam::Vec3;

use skerry::core::{logging, WorldConfig};
use skerry::grid::CountingMarkerSink;
use skerry::streaming::WorldStreamer;
use skerry::voxel::DiscardVoxelSink;

fn main() {
    logging::init();

    let config = WorldConfig::default();
    log::info!(
        "streaming world seed {} (chunk {}m, radius {} chunks)",
        config.seed,
        config.chunk_size,
        config.load_radius
    );

    let mut streamer = WorldStreamer::new(config.clone());
    let mut markers = CountingMarkerSink::new();
    let mut voxels = DiscardVoxelSink::default();

    // Walk east at half a chunk per tick.
    let mut pos = Vec3::ZERO;
    for tick in 1..=600 {
        streamer.tick(&[Some(pos)], &mut markers, &mut voxels);
        pos.x += config.chunk_size * 0.5;

        if tick % 100 == 0 {
            let stats = streamer.stats();
            log::info!(
                "tick {tick}: {} chunks loaded, {} islands, {} tasks active",
                stats.loaded_chunks,
                stats.islands_discovered,
                stats.tasks_active
            );
        }
    }

    // The observer leaves; let the remaining tasks drain.
    while streamer.stats().tasks_active > 0 {
        streamer.tick(&[], &mut markers, &mut voxels);
    }

    let stats = streamer.stats();
    log::info!(
        "done after {} ticks: {} islands discovered, {} completed, {} failed, {} voxel fills",
        streamer.tick_count(),
        stats.islands_discovered,
        stats.tasks_completed,
        stats.tasks_failed,
        voxels.fills
    );
}
