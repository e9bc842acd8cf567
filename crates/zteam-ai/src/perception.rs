//! The seams between actor behaviour and the world it runs in.

use glam::Vec3;
use hecs::Entity;

use zteam_core::enums::Tag;

/// What a pursuer needs to know about a live target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetInfo {
    pub position: Vec3,
    pub moveable: bool,
}

/// Read access to the world from an actor's point of view.
pub trait Perception {
    /// Current state of a target, or `None` if the handle no longer refers
    /// to a live targetable entity.
    fn locate(&self, target: Entity) -> Option<TargetInfo>;

    /// Nearest entity with `tag` within `radius` of `origin`.
    fn nearest(&mut self, origin: Vec3, radius: f32, tag: Tag) -> Option<Entity>;

    /// Target of last resort when nothing else is found (the player).
    fn fallback(&self) -> Option<Entity>;
}

/// Layer filter for a radius query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryFilter {
    pub tag: Tag,
    pub exclude_triggers: bool,
}

impl QueryFilter {
    /// Solid colliders of `tag` only.
    pub fn solid(tag: Tag) -> Self {
        Self {
            tag,
            exclude_triggers: true,
        }
    }

    /// Solid colliders and trigger volumes of `tag`.
    pub fn any(tag: Tag) -> Self {
        Self {
            tag,
            exclude_triggers: false,
        }
    }
}

/// A single broad-phase hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub entity: Entity,
    pub position: Vec3,
}

/// Fixed-capacity result buffer for radius queries.
///
/// Once full, further hits are refused, so a query never returns more than
/// `capacity` candidates.
#[derive(Debug, Clone)]
pub struct ScratchBuffer {
    items: Vec<Candidate>,
    capacity: usize,
}

impl ScratchBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            capacity,
        }
    }

    /// Append a hit. Returns `false` (and drops the hit) when full.
    pub fn push(&mut self, candidate: Candidate) -> bool {
        if self.items.len() >= self.capacity {
            return false;
        }
        self.items.push(candidate);
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn as_slice(&self) -> &[Candidate] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

/// Broad-phase radius query. Results carry no ordering guarantee.
pub trait SpatialIndex {
    /// Clear `out` and fill it with entities matching `filter` whose position
    /// lies within `radius` of `origin`, up to the buffer's capacity.
    fn query_radius(&self, origin: Vec3, radius: f32, filter: QueryFilter, out: &mut ScratchBuffer);
}
