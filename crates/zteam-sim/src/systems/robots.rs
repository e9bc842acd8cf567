//! Robot behaviour system: advances every robot's state machine against the
//! live world and applies the requests it makes.

use hecs::{Entity, World};
use tracing::debug;

use zteam_ai::perception::ScratchBuffer;
use zteam_ai::{RobotBrain, RobotOutput};
use zteam_core::components::{NavAgent, Transform};

use super::hitbox::Hitbox;
use crate::entity_id;
use crate::spatial::{SpatialHash, WorldPerception};

pub fn run(
    world: &mut World,
    index: &SpatialHash,
    scratch: &mut ScratchBuffer,
    player: Option<Entity>,
    dt: f32,
    despawn_buffer: &mut Vec<Entity>,
) {
    // Brains are advanced on copies so perception can borrow the world.
    let robots: Vec<(Entity, RobotBrain, Transform)> = world
        .query::<(&RobotBrain, &Transform)>()
        .iter()
        .map(|(entity, (brain, transform))| (entity, brain.clone(), *transform))
        .collect();

    let mut updates = Vec::with_capacity(robots.len());
    {
        let mut sense = WorldPerception::new(world, index, scratch, player);
        for (entity, mut brain, body) in robots {
            let output = brain.advance(dt, &body, &mut sense);
            updates.push((entity, brain, output));
        }
    }

    for (entity, brain, output) in updates {
        apply(world, entity, brain, output, despawn_buffer);
    }
}

fn apply(
    world: &mut World,
    entity: Entity,
    brain: RobotBrain,
    output: RobotOutput,
    despawn_buffer: &mut Vec<Entity>,
) {
    if output.despawn {
        debug!(robot = entity_id(entity), "robot removed");
        despawn_buffer.push(entity);
    }

    let Ok((stored, transform, agent, hitbox)) = world
        .query_one_mut::<(&mut RobotBrain, &mut Transform, &mut NavAgent, &mut Hitbox)>(entity)
    else {
        return;
    };

    *stored = brain;
    if let Some(rotation) = output.rotation {
        transform.rotation = rotation;
    }
    if let Some(destination) = output.destination {
        agent.destination = Some(destination);
    }
    if let Some(stopped) = output.stopped {
        agent.stopped = stopped;
    }
    if let Some(velocity) = output.velocity {
        agent.velocity_override = Some(velocity);
    }
    if let Some(active) = output.hitbox_active {
        hitbox.set_active(active);
    }
}
