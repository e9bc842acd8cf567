//! Simulation engine for the Z-Team tower-defense game.
//!
//! Owns the hecs ECS world, runs the per-tick systems, drives the session
//! state machine and produces `SessionSnapshot`s for the frontend.

pub mod config;
pub mod engine;
pub mod spatial;
pub mod spawner;
pub mod systems;
pub mod world_setup;

pub use zteam_core as core;
pub use config::SimConfig;
pub use engine::Session;

/// Stable numeric id for an entity, as used in events and snapshots.
pub fn entity_id(entity: hecs::Entity) -> u64 {
    entity.to_bits().get()
}
