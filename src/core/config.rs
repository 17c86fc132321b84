//! World configuration: the static tunables for one world instance.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::Error;

/// Parameters controlling streaming, placement, and synthesis.
///
/// All values are static for a given world instance. Changing `seed`
/// changes the entire placement and shape outcome deterministically.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Random seed for placement and island shaping.
    pub seed: u32,
    /// Side length of a chunk in world units.
    pub chunk_size: f32,
    /// Chebyshev chunk radius loaded around each observer.
    pub load_radius: i32,
    /// Minimum Chebyshev distance (in chunks) between island seeds before
    /// the suppressed spawn probability kicks in.
    pub island_spacing: i32,
    /// Spawn probability when the spacing constraint is satisfied.
    pub spawn_chance: f32,
    /// Suppressed spawn probability inside the spacing radius.
    pub crowded_chance: f32,
    /// Water surface elevation. Columns that don't clear it stay unfilled.
    pub shoreline: f32,
    /// Horizontal sampling step for voxel columns, in world units.
    pub voxel_step: f32,
    /// Vertical material classification step, in world units.
    pub voxel_height: f32,
    /// Max voxel columns one task emits per scheduler tick.
    pub column_budget: usize,
    /// Archetype selection weights: beachy, plateau, mountainous.
    pub archetype_weights: [f32; 3],
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            chunk_size: 256.0,
            load_radius: 2,
            island_spacing: 3,
            spawn_chance: 0.30,
            crowded_chance: 0.05,
            shoreline: 8.0,
            voxel_step: 4.0,
            voxel_height: 4.0,
            column_budget: 350,
            archetype_weights: [0.40, 0.35, 0.25],
        }
    }
}

impl WorldConfig {
    /// Load a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Save the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), Error> {
        let text = serde_json::to_string_pretty(self)?;
        std::fs::write(path, text)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = WorldConfig::default();
        assert_eq!(config.chunk_size, 256.0);
        assert_eq!(config.load_radius, 2);
        assert_eq!(config.island_spacing, 3);
        assert!(config.spawn_chance > config.crowded_chance);
        let total: f32 = config.archetype_weights.iter().sum();
        assert!((total - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_config_json_roundtrip() {
        let config = WorldConfig {
            seed: 777,
            load_radius: 4,
            ..Default::default()
        };

        let text = serde_json::to_string(&config).unwrap();
        let back: WorldConfig = serde_json::from_str(&text).unwrap();

        assert_eq!(back.seed, 777);
        assert_eq!(back.load_radius, 4);
        assert_eq!(back.chunk_size, config.chunk_size);
        assert_eq!(back.column_budget, config.column_budget);
    }
}
