//! Tower behaviour system: target tracking, turret aim and firing.

use hecs::{Entity, World};

use zteam_ai::perception::ScratchBuffer;
use zteam_ai::{TowerBrain, TowerOutput};
use zteam_core::components::{MuzzleFlash, Transform, Turret};
use zteam_core::types::flat_look_rotation;

use crate::spatial::{SpatialHash, WorldPerception};

/// A tower fired at a target this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shot {
    pub tower: Entity,
    pub target: Entity,
}

#[derive(Debug, Default)]
pub struct TowerReport {
    pub shots: Vec<Shot>,
    /// Towers that finished dying and were queued for despawn.
    pub removed: Vec<Entity>,
}

pub fn run(
    world: &mut World,
    index: &SpatialHash,
    scratch: &mut ScratchBuffer,
    dt: f32,
    despawn_buffer: &mut Vec<Entity>,
) -> TowerReport {
    let towers: Vec<(Entity, TowerBrain, Transform)> = world
        .query::<(&TowerBrain, &Transform)>()
        .iter()
        .map(|(entity, (brain, transform))| (entity, brain.clone(), *transform))
        .collect();

    let mut updates = Vec::with_capacity(towers.len());
    {
        let mut sense = WorldPerception::new(world, index, scratch, None);
        for (entity, mut brain, body) in towers {
            let output = brain.advance(dt, body.position, &mut sense);
            updates.push((entity, brain, body, output));
        }
    }

    let mut report = TowerReport::default();
    for (entity, brain, body, output) in updates {
        if let Some(target) = output.fire_at {
            report.shots.push(Shot {
                tower: entity,
                target,
            });
        }
        if output.despawn {
            report.removed.push(entity);
            despawn_buffer.push(entity);
        }
        apply(world, entity, brain, &body, &output);
    }
    report
}

fn apply(world: &mut World, entity: Entity, brain: TowerBrain, body: &Transform, output: &TowerOutput) {
    let Ok((stored, turret, flash)) =
        world.query_one_mut::<(&mut TowerBrain, &mut Turret, &mut MuzzleFlash)>(entity)
    else {
        return;
    };

    *stored = brain;
    if let Some(rotation) = output
        .aim_at
        .and_then(|point| flat_look_rotation(point - body.position))
    {
        turret.facing = rotation;
    }
    if let Some(active) = output.muzzle_flash {
        flash.active = active;
    }
}
