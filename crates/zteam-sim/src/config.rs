//! Session configuration.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use zteam_core::constants::*;
use zteam_core::error::ConfigError;
use zteam_core::types::SpawnZone;

/// Configuration for starting a new session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// RNG seed for determinism. Same seed = same simulation.
    pub seed: u64,
    /// Fixed tick rate used by `Session::tick` (Hz).
    pub tick_rate: u32,
    /// Population cap for live robots.
    pub max_robots: usize,
    /// Seconds between timed robot spawns.
    pub spawn_interval_secs: f32,
    pub spawn_zones: Vec<SpawnZone>,
    /// Half-width of the playable area along x.
    pub bounds_x: f32,
    /// Half-depth of the playable area along z.
    pub bounds_z: f32,
    pub player_start: Vec3,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            tick_rate: DEFAULT_TICK_RATE,
            max_robots: DEFAULT_MAX_ROBOTS,
            spawn_interval_secs: DEFAULT_SPAWN_INTERVAL_SECS,
            spawn_zones: vec![
                SpawnZone::new(Vec2::new(0.0, 35.0), Vec2::new(10.0, 3.0)),
                SpawnZone::new(Vec2::new(35.0, 0.0), Vec2::new(3.0, 10.0)),
                SpawnZone::new(Vec2::new(-35.0, 0.0), Vec2::new(3.0, 10.0)),
            ],
            bounds_x: DEFAULT_BOUNDS_X,
            bounds_z: DEFAULT_BOUNDS_Z,
            player_start: Vec3::new(0.0, GROUND_Y, 0.0),
        }
    }
}

impl SimConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        if !(self.spawn_interval_secs > 0.0) {
            return Err(ConfigError::InvalidSpawnInterval(self.spawn_interval_secs));
        }
        if self.max_robots == 0 {
            return Err(ConfigError::ZeroPopulationCap);
        }
        if self.spawn_zones.is_empty() {
            return Err(ConfigError::NoSpawnZones);
        }
        if let Some(index) = self
            .spawn_zones
            .iter()
            .position(|z| z.half_extents.x < 0.0 || z.half_extents.y < 0.0)
        {
            return Err(ConfigError::InvalidSpawnZone { index });
        }
        if !(self.bounds_x > 0.0 && self.bounds_z > 0.0) {
            return Err(ConfigError::InvalidBounds);
        }
        Ok(())
    }

    /// Seconds per fixed tick.
    pub fn dt(&self) -> f32 {
        1.0 / self.tick_rate as f32
    }

    /// Clamp a point to the playable area.
    pub fn clamp_to_bounds(&self, point: Vec3) -> Vec3 {
        Vec3::new(
            point.x.clamp(-self.bounds_x, self.bounds_x),
            point.y,
            point.z.clamp(-self.bounds_z, self.bounds_z),
        )
    }
}
