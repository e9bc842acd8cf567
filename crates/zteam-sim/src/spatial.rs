//! Broad-phase spatial hash and the world-backed `Perception`.
//!
//! The hash buckets every collider by its (x, z) cell and is rebuilt from
//! the world whenever positions have changed. Queries visit only the cells
//! overlapping the query circle.

use std::collections::HashMap;

use glam::Vec3;
use hecs::{Entity, World};

use zteam_ai::perception::{
    Candidate, Perception, QueryFilter, ScratchBuffer, SpatialIndex, TargetInfo,
};
use zteam_ai::search::find_nearest;
use zteam_core::components::{Collider, Targetable, Transform};
use zteam_core::constants::SPATIAL_CELL_SIZE;
use zteam_core::enums::Tag;

#[derive(Debug, Clone, Copy)]
struct Entry {
    entity: Entity,
    position: Vec3,
    tag: Tag,
    trigger: bool,
}

#[derive(Debug, Clone)]
pub struct SpatialHash {
    cell_size: f32,
    cells: HashMap<(i32, i32), Vec<usize>>,
    entries: Vec<Entry>,
}

impl Default for SpatialHash {
    fn default() -> Self {
        Self::new(SPATIAL_CELL_SIZE)
    }
}

impl SpatialHash {
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
            entries: Vec::new(),
        }
    }

    pub fn clear(&mut self) {
        // Keep bucket allocations for the next rebuild.
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Re-index every entity that has a `Transform` and a `Collider`.
    pub fn rebuild(&mut self, world: &World) {
        self.clear();
        let mut query = world.query::<(&Transform, &Collider)>();
        for (entity, (transform, collider)) in query.iter() {
            self.insert(entity, transform.position, *collider);
        }
    }

    pub fn insert(&mut self, entity: Entity, position: Vec3, collider: Collider) {
        let index = self.entries.len();
        self.entries.push(Entry {
            entity,
            position,
            tag: collider.tag,
            trigger: collider.trigger,
        });
        self.cells
            .entry(self.cell_of(position))
            .or_default()
            .push(index);
    }

    fn cell_of(&self, position: Vec3) -> (i32, i32) {
        (
            (position.x / self.cell_size).floor() as i32,
            (position.z / self.cell_size).floor() as i32,
        )
    }
}

impl SpatialIndex for SpatialHash {
    fn query_radius(&self, origin: Vec3, radius: f32, filter: QueryFilter, out: &mut ScratchBuffer) {
        out.clear();
        let radius_sq = radius * radius;
        let (min_x, min_z) = self.cell_of(origin - Vec3::new(radius, 0.0, radius));
        let (max_x, max_z) = self.cell_of(origin + Vec3::new(radius, 0.0, radius));

        for cx in min_x..=max_x {
            for cz in min_z..=max_z {
                let Some(bucket) = self.cells.get(&(cx, cz)) else {
                    continue;
                };
                for &i in bucket {
                    let entry = &self.entries[i];
                    if entry.tag != filter.tag || (filter.exclude_triggers && entry.trigger) {
                        continue;
                    }
                    if entry.position.distance_squared(origin) > radius_sq {
                        continue;
                    }
                    let candidate = Candidate {
                        entity: entry.entity,
                        position: entry.position,
                    };
                    if !out.push(candidate) {
                        return;
                    }
                }
            }
        }
    }
}

/// `Perception` over the live world, the current spatial hash and a scratch
/// buffer sized for the calling actor type.
pub struct WorldPerception<'a> {
    world: &'a World,
    index: &'a SpatialHash,
    scratch: &'a mut ScratchBuffer,
    fallback: Option<Entity>,
}

impl<'a> WorldPerception<'a> {
    pub fn new(
        world: &'a World,
        index: &'a SpatialHash,
        scratch: &'a mut ScratchBuffer,
        fallback: Option<Entity>,
    ) -> Self {
        Self {
            world,
            index,
            scratch,
            fallback,
        }
    }
}

impl Perception for WorldPerception<'_> {
    fn locate(&self, target: Entity) -> Option<TargetInfo> {
        let transform = self.world.get::<&Transform>(target).ok()?;
        let targetable = self.world.get::<&Targetable>(target).ok()?;
        Some(TargetInfo {
            position: transform.position,
            moveable: targetable.moveable,
        })
    }

    fn nearest(&mut self, origin: Vec3, radius: f32, tag: Tag) -> Option<Entity> {
        let found = find_nearest(
            self.index,
            origin,
            radius,
            QueryFilter::solid(tag),
            self.scratch,
        )?;
        // The hash may still hold an entity removed since the last rebuild.
        self.world.contains(found).then_some(found)
    }

    fn fallback(&self) -> Option<Entity> {
        self.fallback.filter(|&player| self.world.contains(player))
    }
}
