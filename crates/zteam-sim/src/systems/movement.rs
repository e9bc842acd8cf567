//! Navigation system: moves agents toward their destination.
//!
//! Pathing is a straight line on the ground plane. A velocity override (the
//! robot lunge) replaces path following for the tick it is set.

use hecs::World;

use zteam_core::components::{NavAgent, Transform, ZBuck};
use zteam_core::constants::ZBUCK_GRAVITY;
use zteam_core::types::flat_look_rotation;

pub fn run(world: &mut World, dt: f32) {
    for (_entity, (transform, agent)) in world.query_mut::<(&mut Transform, &mut NavAgent)>() {
        if let Some(velocity) = agent.velocity_override.take() {
            transform.position += velocity * dt;
            continue;
        }
        if agent.stopped {
            continue;
        }
        let Some(destination) = agent.destination else {
            continue;
        };

        let mut to_destination = destination - transform.position;
        to_destination.y = 0.0;
        let distance = to_destination.length();
        if distance <= agent.stopping_distance {
            continue;
        }

        let direction = to_destination / distance;
        let step = (agent.speed * dt).min(distance - agent.stopping_distance);
        transform.position += direction * step;
        if let Some(rotation) = flat_look_rotation(direction) {
            transform.rotation = rotation;
        }
    }
}

/// Ballistic flight of currency drops toward their landing points.
pub fn fly_zbucks(world: &mut World, dt: f32) {
    for (_entity, (transform, zbuck)) in world.query_mut::<(&mut Transform, &mut ZBuck)>() {
        if zbuck.landed {
            continue;
        }
        let position = &mut transform.position;

        let mut remaining = zbuck.target - *position;
        remaining.y = 0.0;
        let step = zbuck.launch * dt;
        if step.length_squared() >= remaining.length_squared() {
            position.x = zbuck.target.x;
            position.z = zbuck.target.z;
        } else {
            position.x += step.x;
            position.z += step.z;
        }

        zbuck.vertical_speed -= ZBUCK_GRAVITY * dt;
        position.y += zbuck.vertical_speed * dt;
        let grounded = zbuck.vertical_speed <= 0.0 && position.y <= zbuck.target.y;
        if grounded {
            position.y = zbuck.target.y;
            zbuck.vertical_speed = 0.0;
        }

        let arrived = position.x == zbuck.target.x && position.z == zbuck.target.z;
        zbuck.landed = grounded && arrived;
    }
}
