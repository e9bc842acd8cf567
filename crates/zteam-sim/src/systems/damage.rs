//! Damage dispatch: routes a hit to whatever health model the victim uses.

use glam::Vec3;
use hecs::{Component, Entity, World};

use zteam_ai::{Damageable, RobotBrain, TowerBrain};
use zteam_core::components::{Health, HealthBar, Targetable, Transform};
use zteam_core::enums::{DamageOutcome, Tag};

/// What a single hit did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageReport {
    pub kind: Tag,
    pub outcome: DamageOutcome,
    pub position: Vec3,
}

/// Apply `amount` damage to `target`. Returns `None` when the entity is gone
/// or cannot be damaged.
pub fn apply(world: &World, target: Entity, amount: u16) -> Option<DamageReport> {
    let kind = world.get::<&Targetable>(target).ok()?.kind;
    let position = world.get::<&Transform>(target).ok()?.position;

    let outcome = match kind {
        Tag::Robot => hit::<RobotBrain>(world, target, amount)?,
        Tag::Tower => {
            let outcome = hit::<TowerBrain>(world, target, amount)?;
            sync_health_bar(world, target);
            outcome
        }
        Tag::Player => hit::<Health>(world, target, amount)?,
        Tag::ZBuck => return None,
    };

    Some(DamageReport {
        kind,
        outcome,
        position,
    })
}

fn hit<T: Damageable + Component>(world: &World, target: Entity, amount: u16) -> Option<DamageOutcome> {
    let mut victim = world.get::<&mut T>(target).ok()?;
    Some(victim.take_damage(amount))
}

/// Mirror a tower's health onto its health bar.
pub fn sync_health_bar(world: &World, tower: Entity) {
    let Ok(brain) = world.get::<&TowerBrain>(tower) else {
        return;
    };
    if let Ok(mut bar) = world.get::<&mut HealthBar>(tower) {
        bar.current = brain.health;
    }
}
