//! Error types for the skerry engine

use thiserror::Error;

use crate::grid::ChunkCoord;
use crate::synth::ArchetypeKind;

/// Main error type for the engine
#[derive(Debug, Error)]
pub enum Error {
    /// An archetype generator hit a degenerate input. The owning task is
    /// marked failed and never retried; voxels already written stay.
    #[error("synthesis failed for {archetype} island at {seed:?}: {reason}")]
    Synthesis {
        seed: ChunkCoord,
        archetype: ArchetypeKind,
        reason: String,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_json::Error),
}
