//! Actor behaviour for the Z-Team simulation.
//!
//! Implements the robot and tower state machines, the spatial query seam
//! and nearest-target search. No ECS world access: state machines read the
//! world through the `Perception` trait and report what they want done
//! through plain output structs.

pub mod damage;
pub mod perception;
pub mod robot;
pub mod search;
pub mod tower;

pub use damage::Damageable;
pub use perception::{Candidate, Perception, QueryFilter, ScratchBuffer, SpatialIndex, TargetInfo};
pub use robot::{RobotBrain, RobotOutput};
pub use tower::{TowerBrain, TowerOutput};

pub use zteam_core as core;

#[cfg(test)]
mod tests;
