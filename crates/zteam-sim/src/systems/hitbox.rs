//! Robot attack hit volumes.
//!
//! A hit volume is a sphere in front of the robot. While active, every tower
//! or player that enters it is struck once; the struck list is cleared each
//! time the volume is switched on, so a single lunge never hits the same
//! victim twice.

use hecs::{Entity, World};

use zteam_ai::perception::{QueryFilter, ScratchBuffer, SpatialIndex};
use zteam_core::components::Transform;
use zteam_core::constants::{HITBOX_OFFSET, HITBOX_RADIUS};
use zteam_core::enums::Tag;
use zteam_core::types::forward;

use crate::spatial::SpatialHash;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Hitbox {
    pub active: bool,
    /// Victims already hit during the current activation.
    pub struck: Vec<Entity>,
}

impl Hitbox {
    pub fn set_active(&mut self, active: bool) {
        if active && !self.active {
            self.struck.clear();
        }
        self.active = active;
    }
}

/// Layers a robot's hit volume reacts to.
const VICTIM_TAGS: [Tag; 2] = [Tag::Tower, Tag::Player];

/// Collect new contacts for all active hit volumes. Each returned entity
/// should receive one hit of robot attack damage.
pub fn run(world: &mut World, index: &SpatialHash, scratch: &mut ScratchBuffer) -> Vec<Entity> {
    let mut contacts = Vec::new();

    for (_robot, (transform, hitbox)) in world.query_mut::<(&Transform, &mut Hitbox)>() {
        if !hitbox.active {
            continue;
        }
        let center = transform.position + forward(transform.rotation) * HITBOX_OFFSET;

        for tag in VICTIM_TAGS {
            index.query_radius(center, HITBOX_RADIUS, QueryFilter::solid(tag), scratch);
            for candidate in scratch.as_slice() {
                if hitbox.struck.contains(&candidate.entity) {
                    continue;
                }
                hitbox.struck.push(candidate.entity);
                contacts.push(candidate.entity);
            }
        }
    }

    contacts
}
