//! Cleanup system: removes entities queued for despawn during the tick.

use hecs::{Entity, World};

/// Despawn everything in the buffer. Entities already gone are skipped, so
/// queuing the same entity twice is harmless.
pub fn run(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}
