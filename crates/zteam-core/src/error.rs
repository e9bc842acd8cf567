//! Error types for configuration and session setup.

use thiserror::Error;

/// Faults in the session configuration or in externally supplied state.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown game state code {0}")]
    UnknownGameState(u8),

    #[error("tick rate must be positive")]
    ZeroTickRate,

    #[error("spawn interval must be positive, got {0}")]
    InvalidSpawnInterval(f32),

    #[error("population cap must be at least 1")]
    ZeroPopulationCap,

    #[error("at least one spawn zone is required")]
    NoSpawnZones,

    #[error("spawn zone {index} has negative half-extents")]
    InvalidSpawnZone { index: usize },

    #[error("world bounds must be positive")]
    InvalidBounds,

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),
}
