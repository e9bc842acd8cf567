//! Nearest-target search over a broad-phase query.

use glam::Vec3;
use hecs::Entity;

use crate::perception::{Candidate, QueryFilter, ScratchBuffer, SpatialIndex};

/// Query `index` around `origin` and return the closest match.
pub fn find_nearest<I: SpatialIndex + ?Sized>(
    index: &I,
    origin: Vec3,
    radius: f32,
    filter: QueryFilter,
    scratch: &mut ScratchBuffer,
) -> Option<Entity> {
    index.query_radius(origin, radius, filter, scratch);
    nearest_candidate(origin, scratch.as_slice())
}

/// Closest candidate by squared distance.
///
/// Equidistant candidates resolve to the lowest entity bits, so the result
/// does not depend on the order the broad-phase produced them in.
pub fn nearest_candidate(origin: Vec3, candidates: &[Candidate]) -> Option<Entity> {
    let mut best: Option<(f32, Entity)> = None;
    for candidate in candidates {
        let dist_sq = origin.distance_squared(candidate.position);
        let closer = match best {
            None => true,
            Some((best_sq, best_entity)) => {
                dist_sq < best_sq
                    || (dist_sq == best_sq && candidate.entity.to_bits() < best_entity.to_bits())
            }
        };
        if closer {
            best = Some((dist_sq, candidate.entity));
        }
    }
    best.map(|(_, entity)| entity)
}
