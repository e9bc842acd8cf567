//! Events emitted by the simulation for audio and UI feedback.
//!
//! Entity ids are `hecs::Entity::to_bits` values.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::GameState;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    RobotSpawned { id: u64, position: Vec3 },
    RobotKilled { id: u64, position: Vec3 },
    TowerBuilt { id: u64, position: Vec3 },
    TowerDestroyed { id: u64 },
    ShotFired { tower: u64, target: u64 },
    ZBuckSpawned { id: u64, value: u32, angle_deg: f32 },
    ZBuckCollected { id: u64, value: u32 },
    PlayerHit { health: u16 },
    StateChanged { from: GameState, to: GameState },
    SessionReset,
}
