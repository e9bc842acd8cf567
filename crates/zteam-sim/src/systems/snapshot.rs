//! Snapshot system: queries the ECS world and builds a `SessionSnapshot`.
//!
//! This system is read-only.

use hecs::{Entity, World};

use zteam_ai::{RobotBrain, TowerBrain};
use zteam_core::components::*;
use zteam_core::enums::GameState;
use zteam_core::events::GameEvent;
use zteam_core::state::*;
use zteam_core::types::{yaw_of, SimTime};

use super::hitbox::Hitbox;
use crate::entity_id;
use crate::spawner::RobotSpawner;

pub fn build_snapshot(
    world: &World,
    time: &SimTime,
    state: GameState,
    build_mode: bool,
    spawner: &RobotSpawner,
    player: Entity,
    events: Vec<GameEvent>,
) -> SessionSnapshot {
    SessionSnapshot {
        time: *time,
        state,
        build_mode,
        live_robots: spawner.live_count(),
        max_robots: spawner.max_robots(),
        player: build_player(world, player),
        towers: build_towers(world),
        robots: build_robots(world),
        zbucks: build_zbucks(world),
        events,
    }
}

fn build_player(world: &World, player: Entity) -> PlayerView {
    let Ok(mut query) = world.query_one::<(&Transform, &Health, &Player)>(player) else {
        return PlayerView::default();
    };
    let view = query
        .get()
        .map(|(transform, health, state)| PlayerView {
            position: transform.position,
            health: health.current,
            max_health: health.max,
            wallet: state.wallet,
        })
        .unwrap_or_default();
    view
}

fn build_towers(world: &World) -> Vec<TowerView> {
    let mut towers: Vec<TowerView> = world
        .query::<(&TowerBrain, &Transform, &Turret, &HealthBar, &RadiusDisplay, &MuzzleFlash)>()
        .iter()
        .map(|(entity, (brain, transform, turret, bar, radius, flash))| TowerView {
            id: entity_id(entity),
            position: transform.position,
            facing_yaw: yaw_of(turret.facing),
            health: bar.current,
            max_health: bar.max,
            radius_display: radius.active,
            muzzle_flash: flash.active,
            tracking_target: brain.tracking_target,
        })
        .collect();

    towers.sort_by_key(|t| t.id);
    towers
}

fn build_robots(world: &World) -> Vec<RobotView> {
    let mut robots: Vec<RobotView> = world
        .query::<(&RobotBrain, &Transform, &Hitbox)>()
        .iter()
        .map(|(entity, (brain, transform, hitbox))| RobotView {
            id: entity_id(entity),
            position: transform.position,
            health: brain.health,
            state: brain.state,
            hitbox_active: hitbox.active,
        })
        .collect();

    robots.sort_by_key(|r| r.id);
    robots
}

fn build_zbucks(world: &World) -> Vec<ZBuckView> {
    let mut zbucks: Vec<ZBuckView> = world
        .query::<(&ZBuck, &Transform)>()
        .iter()
        .map(|(entity, (zbuck, transform))| ZBuckView {
            id: entity_id(entity),
            position: transform.position,
            value: zbuck.value,
            landed: zbuck.landed,
        })
        .collect();

    zbucks.sort_by_key(|z| z.id);
    zbucks
}
