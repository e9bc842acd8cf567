//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Behaviour lives in the actor state machines and the sim systems.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::enums::Tag;

/// World placement of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Transform {
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            rotation: Quat::IDENTITY,
        }
    }
}

/// Physics layer membership; what the broad-phase indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Collider {
    pub tag: Tag,
    /// Trigger volumes can be skipped by queries that exclude triggers.
    pub trigger: bool,
}

/// Marks an entity that can be aimed at, tracked and damaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targetable {
    pub kind: Tag,
    /// Moveable targets have their position re-read every tick by pursuers.
    pub moveable: bool,
}

/// Opaque navigation agent: the movement system walks it toward `destination`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavAgent {
    pub destination: Option<Vec3>,
    pub stopped: bool,
    /// One-tick velocity that replaces path following (consumed each tick).
    pub velocity_override: Option<Vec3>,
    pub speed: f32,
    pub stopping_distance: f32,
}

/// Simple health pool (used for the player).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    pub current: u16,
    pub max: u16,
}

/// Player state beyond health.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Collected currency.
    pub wallet: u32,
}

/// Health bar display sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthBar {
    pub current: i32,
    pub max: i32,
}

/// Build-mode range ring around a tower.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RadiusDisplay {
    pub active: bool,
    pub scale: f32,
}

/// Muzzle flash shown briefly after a tower fires.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MuzzleFlash {
    pub active: bool,
}

/// Rotating part of a tower; independent of the tower body's orientation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Turret {
    pub facing: Quat,
}

/// Currency pickup flying toward (or resting at) its landing point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZBuck {
    pub target: Vec3,
    pub value: u32,
    /// Launch angle on the ground plane in degrees, `[0, 360)`.
    pub angle_deg: f32,
    /// Horizontal launch velocity.
    pub launch: Vec3,
    pub vertical_speed: f32,
    pub landed: bool,
}
