//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level session state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Entities have been created but gameplay has not begun.
    #[default]
    Starting,
    Playing,
    /// No per-tick work happens while paused.
    Paused,
    /// The session is over and will be reset on the next tick.
    Ended,
}

impl GameState {
    /// Stable numeric code used by external controllers.
    pub fn code(self) -> u8 {
        match self {
            GameState::Starting => 0,
            GameState::Playing => 1,
            GameState::Paused => 2,
            GameState::Ended => 3,
        }
    }
}

impl TryFrom<u8> for GameState {
    type Error = ConfigError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(GameState::Starting),
            1 => Ok(GameState::Playing),
            2 => Ok(GameState::Paused),
            3 => Ok(GameState::Ended),
            other => Err(ConfigError::UnknownGameState(other)),
        }
    }
}

/// Collision layer of an entity, used to filter spatial queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tag {
    Robot,
    Tower,
    Player,
    ZBuck,
}

/// Phase of a robot's attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPhase {
    /// Turning toward the target before the lunge.
    Charging,
    /// Lunging along the locked attack direction with the hit volume live.
    Performing,
    /// Standing still after the lunge.
    Recovery,
}

/// Robot behaviour state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RobotState {
    #[default]
    Moving,
    Attacking(AttackPhase),
    Dying,
}

/// Tower behaviour state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TowerState {
    #[default]
    Alive,
    Dying,
}

/// Result of applying damage (or a health change) to a targetable entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageOutcome {
    /// Health changed and the entity is still alive.
    Survived,
    /// This change crossed below 1 health; death side effects must run now.
    Killed,
    /// The entity was already dead; nothing changed.
    AlreadyDead,
}
