//! Currency pickup by the player.

use hecs::{Entity, World};

use zteam_ai::perception::{QueryFilter, ScratchBuffer, SpatialIndex};
use zteam_core::components::{Player, Transform, ZBuck};
use zteam_core::constants::ZBUCK_PICKUP_RADIUS;
use zteam_core::enums::Tag;

use crate::spatial::SpatialHash;

/// Credit the player with every drop inside the pickup radius and queue the
/// drops for removal. Returns `(drop, value)` for each one collected.
pub fn collect(
    world: &mut World,
    index: &SpatialHash,
    scratch: &mut ScratchBuffer,
    player: Entity,
    despawn_buffer: &mut Vec<Entity>,
) -> Vec<(Entity, u32)> {
    let Ok(origin) = world.get::<&Transform>(player).map(|t| t.position) else {
        return Vec::new();
    };

    index.query_radius(origin, ZBUCK_PICKUP_RADIUS, QueryFilter::any(Tag::ZBuck), scratch);
    let mut collected = Vec::new();
    for candidate in scratch.as_slice() {
        if despawn_buffer.contains(&candidate.entity) {
            continue;
        }
        if let Ok(zbuck) = world.get::<&ZBuck>(candidate.entity) {
            collected.push((candidate.entity, zbuck.value));
        }
    }

    if let Ok(state) = world.query_one_mut::<&mut Player>(player) {
        for (_, value) in &collected {
            state.wallet = state.wallet.saturating_add(*value);
        }
    }
    despawn_buffer.extend(collected.iter().map(|(entity, _)| *entity));
    collected
}
