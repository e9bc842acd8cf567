//! ECS systems that operate on the simulation world each tick.
//!
//! Systems are plain functions over `&mut World`. They do not own state and
//! never reach back into the session: anything with session-wide side
//! effects (shots, contacts, pickups) is returned to the caller.

pub mod cleanup;
pub mod damage;
pub mod hitbox;
pub mod movement;
pub mod robots;
pub mod snapshot;
pub mod towers;
pub mod zbucks;
