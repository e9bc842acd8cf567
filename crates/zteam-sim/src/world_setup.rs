//! Entity spawn factories.
//!
//! Creates the player, robots, towers and currency drops with their
//! component bundles.

use glam::{Quat, Vec3};
use hecs::{Entity, World};

use zteam_ai::{RobotBrain, TowerBrain};
use zteam_core::components::*;
use zteam_core::constants::*;
use zteam_core::enums::Tag;
use zteam_core::types::ground_direction;

use crate::systems::hitbox::Hitbox;

/// Spawn the player at `position`.
pub fn spawn_player(world: &mut World, position: Vec3) -> Entity {
    world.spawn((
        Player::default(),
        Transform::from_position(position),
        Health {
            current: PLAYER_MAX_HEALTH,
            max: PLAYER_MAX_HEALTH,
        },
        Targetable {
            kind: Tag::Player,
            moveable: true,
        },
        Collider {
            tag: Tag::Player,
            trigger: false,
        },
    ))
}

/// Put the player back to its starting condition.
pub fn reset_player(world: &mut World, player: Entity, position: Vec3) {
    if let Ok((transform, health, state)) =
        world.query_one_mut::<(&mut Transform, &mut Health, &mut Player)>(player)
    {
        *transform = Transform::from_position(position);
        health.current = health.max;
        state.wallet = 0;
    }
}

/// Spawn a robot at `position`, initially chasing `target`.
pub fn spawn_robot(world: &mut World, position: Vec3, target: Option<Entity>) -> Entity {
    world.spawn((
        RobotBrain::new(target),
        Transform::from_position(position),
        NavAgent {
            destination: None,
            stopped: false,
            velocity_override: None,
            speed: ROBOT_MOVE_SPEED,
            stopping_distance: ROBOT_STOPPING_DISTANCE,
        },
        Hitbox::default(),
        Targetable {
            kind: Tag::Robot,
            moveable: true,
        },
        Collider {
            tag: Tag::Robot,
            trigger: false,
        },
    ))
}

/// Spawn a tower. The body keeps a fixed orientation; `orientation` only
/// seeds the turret's initial facing.
pub fn spawn_tower(world: &mut World, position: Vec3, orientation: Quat) -> Entity {
    let brain = TowerBrain::default();
    let health_bar = HealthBar {
        current: brain.health,
        max: TOWER_MAX_HEALTH,
    };
    world.spawn((
        brain,
        Transform::from_position(position),
        Turret {
            facing: orientation,
        },
        health_bar,
        RadiusDisplay {
            active: false,
            scale: TOWER_RADIUS_DISPLAY_SCALE,
        },
        MuzzleFlash::default(),
        Targetable {
            kind: Tag::Tower,
            moveable: false,
        },
        Collider {
            tag: Tag::Tower,
            trigger: false,
        },
    ))
}

/// Spawn a currency drop at `center`, launched along `angle_deg` on the
/// ground plane toward a landing point on the ground.
pub fn spawn_zbuck(world: &mut World, center: Vec3, angle_deg: f32, value: u32) -> Entity {
    let direction = ground_direction(angle_deg);
    let landing = center + direction * ZBUCK_SCATTER_DISTANCE;
    let target = Vec3::new(landing.x, GROUND_Y, landing.z);

    world.spawn((
        ZBuck {
            target,
            value,
            angle_deg,
            launch: direction * ZBUCK_LAUNCH_SPEED,
            vertical_speed: ZBUCK_POP_SPEED,
            landed: false,
        },
        Transform {
            position: center,
            rotation: Quat::from_rotation_y(angle_deg.to_radians()),
        },
        Collider {
            tag: Tag::ZBuck,
            trigger: true,
        },
    ))
}
