//! Session snapshot: the complete visible state produced after each tick.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::enums::{GameState, RobotState};
use crate::events::GameEvent;
use crate::types::SimTime;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: SimTime,
    pub state: GameState,
    pub build_mode: bool,
    pub live_robots: usize,
    pub max_robots: usize,
    pub player: PlayerView,
    pub towers: Vec<TowerView>,
    pub robots: Vec<RobotView>,
    pub zbucks: Vec<ZBuckView>,
    pub events: Vec<GameEvent>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerView {
    pub position: Vec3,
    pub health: u16,
    pub max_health: u16,
    pub wallet: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TowerView {
    pub id: u64,
    pub position: Vec3,
    /// Turret heading (radians around +y).
    pub facing_yaw: f32,
    pub health: i32,
    pub max_health: i32,
    pub radius_display: bool,
    pub muzzle_flash: bool,
    pub tracking_target: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RobotView {
    pub id: u64,
    pub position: Vec3,
    pub health: u16,
    pub state: RobotState,
    pub hitbox_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ZBuckView {
    pub id: u64,
    pub position: Vec3,
    pub value: u32,
    pub landed: bool,
}
