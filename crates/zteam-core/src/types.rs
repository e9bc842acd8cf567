//! Fundamental geometric and simulation types.
//!
//! World space follows the usual game-engine convention: y is up and an
//! entity's forward axis is +z in its local frame.

use glam::{Quat, Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::constants::GROUND_Y;

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of ticks spent in `Playing`.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Advance by one tick of `dt` seconds.
    pub fn advance(&mut self, dt: f32) {
        self.tick += 1;
        self.elapsed_secs += dt as f64;
    }
}

/// Rectangular area on the ground plane where robots appear.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnZone {
    /// Centre on the ground plane (x, z).
    pub center: Vec2,
    /// Half-size along x and z.
    pub half_extents: Vec2,
}

impl SpawnZone {
    pub fn new(center: Vec2, half_extents: Vec2) -> Self {
        Self {
            center,
            half_extents,
        }
    }

    /// World point for normalized offsets in `[-1, 1]` on each axis.
    pub fn point_at(&self, fx: f32, fz: f32) -> Vec3 {
        Vec3::new(
            self.center.x + fx.clamp(-1.0, 1.0) * self.half_extents.x,
            GROUND_Y,
            self.center.y + fz.clamp(-1.0, 1.0) * self.half_extents.y,
        )
    }

    /// Whether a world point lies inside the zone (ignoring height).
    pub fn contains(&self, point: Vec3) -> bool {
        (point.x - self.center.x).abs() <= self.half_extents.x
            && (point.z - self.center.y).abs() <= self.half_extents.y
    }
}

/// Forward axis of a rotation.
pub fn forward(rotation: Quat) -> Vec3 {
    rotation * Vec3::Z
}

/// Rotation about +y that faces `direction` projected onto the ground plane.
/// Returns `None` when the direction has no horizontal component.
pub fn flat_look_rotation(direction: Vec3) -> Option<Quat> {
    let flat = Vec3::new(direction.x, 0.0, direction.z);
    if flat.length_squared() <= f32::EPSILON {
        return None;
    }
    Some(Quat::from_rotation_y(flat.x.atan2(flat.z)))
}

/// Heading of a rotation in radians around +y (0 = +z, increasing toward +x).
pub fn yaw_of(rotation: Quat) -> f32 {
    let f = forward(rotation);
    f.x.atan2(f.z)
}

/// Unit vector on the ground plane for an angle in degrees (0 = +x).
pub fn ground_direction(angle_deg: f32) -> Vec3 {
    let radians = angle_deg.to_radians();
    Vec3::new(radians.cos(), 0.0, radians.sin())
}
