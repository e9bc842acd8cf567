//! Tests for nearest-target search and the robot/tower state machines.

use std::collections::HashMap;

use glam::{Quat, Vec3};
use hecs::{Entity, World};

use zteam_core::components::{Health, Transform};
use zteam_core::constants::*;
use zteam_core::enums::*;

use crate::damage::Damageable;
use crate::perception::*;
use crate::robot::RobotBrain;
use crate::search::{find_nearest, nearest_candidate};
use crate::tower::TowerBrain;

// ---- Fixtures ----

/// A handful of live entities with positions, tags and an optional player.
struct MockWorld {
    handles: World,
    targets: HashMap<Entity, (TargetInfo, Tag)>,
    player: Option<Entity>,
    nearest_calls: usize,
}

impl MockWorld {
    fn new() -> Self {
        Self {
            handles: World::new(),
            targets: HashMap::new(),
            player: None,
            nearest_calls: 0,
        }
    }

    fn add(&mut self, tag: Tag, position: Vec3, moveable: bool) -> Entity {
        let entity = self.handles.spawn(());
        self.targets
            .insert(entity, (TargetInfo { position, moveable }, tag));
        entity
    }

    fn add_player(&mut self, position: Vec3) -> Entity {
        let player = self.add(Tag::Player, position, true);
        self.player = Some(player);
        player
    }

    fn remove(&mut self, entity: Entity) {
        self.targets.remove(&entity);
        let _ = self.handles.despawn(entity);
    }

    fn move_to(&mut self, entity: Entity, position: Vec3) {
        if let Some((info, _)) = self.targets.get_mut(&entity) {
            info.position = position;
        }
    }
}

impl Perception for MockWorld {
    fn locate(&self, target: Entity) -> Option<TargetInfo> {
        self.targets.get(&target).map(|(info, _)| *info)
    }

    fn nearest(&mut self, origin: Vec3, radius: f32, tag: Tag) -> Option<Entity> {
        self.nearest_calls += 1;
        let candidates: Vec<Candidate> = self
            .targets
            .iter()
            .filter(|(_, (info, t))| {
                *t == tag && info.position.distance_squared(origin) <= radius * radius
            })
            .map(|(entity, (info, _))| Candidate {
                entity: *entity,
                position: info.position,
            })
            .collect();
        nearest_candidate(origin, &candidates)
    }

    fn fallback(&self) -> Option<Entity> {
        self.player.filter(|p| self.targets.contains_key(p))
    }
}

/// Flat list broad-phase.
struct ListIndex {
    entries: Vec<(Entity, Vec3, Tag, bool)>,
}

impl SpatialIndex for ListIndex {
    fn query_radius(&self, origin: Vec3, radius: f32, filter: QueryFilter, out: &mut ScratchBuffer) {
        out.clear();
        for &(entity, position, tag, trigger) in &self.entries {
            if tag != filter.tag || (filter.exclude_triggers && trigger) {
                continue;
            }
            if position.distance_squared(origin) <= radius * radius
                && !out.push(Candidate { entity, position })
            {
                return;
            }
        }
    }
}

fn body_at(position: Vec3) -> Transform {
    Transform::from_position(position)
}

// ---- Nearest-target search ----

#[test]
fn test_nearest_candidate_picks_minimum_distance() {
    let mut world = World::new();
    let far = world.spawn(());
    let near = world.spawn(());
    let mid = world.spawn(());
    let candidates = [
        Candidate { entity: far, position: Vec3::new(9.0, 0.0, 0.0) },
        Candidate { entity: near, position: Vec3::new(0.0, 0.0, -2.0) },
        Candidate { entity: mid, position: Vec3::new(3.0, 0.0, 3.0) },
    ];
    assert_eq!(nearest_candidate(Vec3::ZERO, &candidates), Some(near));
}

#[test]
fn test_nearest_candidate_empty_is_none() {
    assert_eq!(nearest_candidate(Vec3::ZERO, &[]), None);
}

#[test]
fn test_nearest_candidate_tie_breaks_on_lowest_bits() {
    let mut world = World::new();
    let a = world.spawn(());
    let b = world.spawn(());
    let (low, high) = if a.to_bits() < b.to_bits() { (a, b) } else { (b, a) };

    let forward = [
        Candidate { entity: high, position: Vec3::new(5.0, 0.0, 0.0) },
        Candidate { entity: low, position: Vec3::new(-5.0, 0.0, 0.0) },
    ];
    let reversed = [forward[1], forward[0]];
    assert_eq!(nearest_candidate(Vec3::ZERO, &forward), Some(low));
    assert_eq!(nearest_candidate(Vec3::ZERO, &reversed), Some(low));
}

#[test]
fn test_find_nearest_respects_radius_and_filter() {
    let mut world = World::new();
    let tower_close = world.spawn(());
    let tower_far = world.spawn(());
    let robot_closer = world.spawn(());
    let pickup = world.spawn(());
    let index = ListIndex {
        entries: vec![
            (tower_close, Vec3::new(4.0, 0.0, 0.0), Tag::Tower, false),
            (tower_far, Vec3::new(30.0, 0.0, 0.0), Tag::Tower, false),
            (robot_closer, Vec3::new(1.0, 0.0, 0.0), Tag::Robot, false),
            (pickup, Vec3::new(0.5, 0.0, 0.0), Tag::ZBuck, true),
        ],
    };
    let mut scratch = ScratchBuffer::new(8);

    let found = find_nearest(&index, Vec3::ZERO, 20.0, QueryFilter::solid(Tag::Tower), &mut scratch);
    assert_eq!(found, Some(tower_close));

    let none = find_nearest(&index, Vec3::ZERO, 2.0, QueryFilter::solid(Tag::Tower), &mut scratch);
    assert_eq!(none, None);

    let hidden = find_nearest(&index, Vec3::ZERO, 2.0, QueryFilter::solid(Tag::ZBuck), &mut scratch);
    assert_eq!(hidden, None, "trigger volumes are excluded from solid queries");
    let shown = find_nearest(&index, Vec3::ZERO, 2.0, QueryFilter::any(Tag::ZBuck), &mut scratch);
    assert_eq!(shown, Some(pickup));
}

#[test]
fn test_scratch_buffer_caps_results() {
    let mut world = World::new();
    let entries: Vec<_> = (0..10)
        .map(|i| (world.spawn(()), Vec3::new(i as f32, 0.0, 0.0), Tag::Robot, false))
        .collect();
    let index = ListIndex { entries };
    let mut scratch = ScratchBuffer::new(3);
    index.query_radius(Vec3::ZERO, 100.0, QueryFilter::solid(Tag::Robot), &mut scratch);
    assert_eq!(scratch.len(), 3);
    assert_eq!(scratch.capacity(), 3);

    let extra = Candidate { entity: world.spawn(()), position: Vec3::ZERO };
    assert!(!scratch.push(extra));
}

// ---- Robot: damage ----

#[test]
fn test_robot_dies_once_after_three_hits() {
    let mut brain = RobotBrain::new(None);
    assert_eq!(brain.take_damage(1), DamageOutcome::Survived);
    assert_eq!(brain.health, 2);
    assert_eq!(brain.take_damage(1), DamageOutcome::Survived);
    assert_eq!(brain.take_damage(1), DamageOutcome::Killed);
    assert_eq!(brain.state, RobotState::Dying);
    assert_eq!(brain.health, 0);

    for _ in 0..5 {
        assert_eq!(brain.take_damage(1), DamageOutcome::AlreadyDead);
    }
    assert_eq!(brain.health, 0);
}

#[test]
fn test_robot_overkill_floors_at_zero() {
    let mut brain = RobotBrain::new(None);
    assert_eq!(brain.take_damage(50), DamageOutcome::Killed);
    assert_eq!(brain.health, 0);
}

#[test]
fn test_dying_robot_requests_despawn() {
    let mut sense = MockWorld::new();
    let mut brain = RobotBrain::new(None);
    brain.take_damage(ROBOT_MAX_HEALTH);
    let out = brain.advance(0.016, &body_at(Vec3::ZERO), &mut sense);
    assert!(out.despawn);
}

// ---- Robot: movement and targeting ----

#[test]
fn test_robot_falls_back_to_player_when_target_destroyed() {
    let mut sense = MockWorld::new();
    let player = sense.add_player(Vec3::new(50.0, 0.0, 0.0));
    let tower = sense.add(Tag::Tower, Vec3::new(60.0, 0.0, 0.0), false);
    let mut brain = RobotBrain::new(Some(tower));

    sense.remove(tower);
    let out = brain.advance(0.1, &body_at(Vec3::ZERO), &mut sense);

    assert_eq!(brain.target, Some(player));
    assert_eq!(out.destination, Some(Vec3::new(50.0, 0.0, 0.0)));
}

#[test]
fn test_robot_periodic_search_switches_to_tower() {
    let mut sense = MockWorld::new();
    let player = sense.add_player(Vec3::new(0.0, 0.0, 80.0));
    let tower = sense.add(Tag::Tower, Vec3::new(15.0, 0.0, 0.0), false);
    let mut brain = RobotBrain::new(Some(player));
    let body = body_at(Vec3::ZERO);

    brain.advance(0.25, &body, &mut sense);
    assert_eq!(brain.target, Some(player), "no search before 0.5s");

    let out = brain.advance(0.25, &body, &mut sense);
    assert_eq!(brain.target, Some(tower));
    assert_eq!(out.destination, Some(Vec3::new(15.0, 0.0, 0.0)));
}

#[test]
fn test_robot_tracks_moveable_target_every_tick() {
    let mut sense = MockWorld::new();
    let player = sense.add_player(Vec3::new(40.0, 0.0, 0.0));
    let mut brain = RobotBrain::new(Some(player));
    let body = body_at(Vec3::ZERO);

    let out = brain.advance(0.1, &body, &mut sense);
    assert_eq!(out.destination, Some(Vec3::new(40.0, 0.0, 0.0)));

    sense.move_to(player, Vec3::new(40.0, 0.0, 5.0));
    let out = brain.advance(0.1, &body, &mut sense);
    assert_eq!(out.destination, Some(Vec3::new(40.0, 0.0, 5.0)));
}

#[test]
fn test_robot_does_not_reissue_destination_for_static_target() {
    let mut sense = MockWorld::new();
    sense.add_player(Vec3::new(0.0, 0.0, 90.0));
    let tower = sense.add(Tag::Tower, Vec3::new(50.0, 0.0, 0.0), false);
    let mut brain = RobotBrain::new(Some(tower));

    let out = brain.advance(0.1, &body_at(Vec3::ZERO), &mut sense);
    assert_eq!(out.destination, None);
}

#[test]
fn test_robot_starts_charge_after_cooldown_in_range() {
    let mut sense = MockWorld::new();
    let player = sense.add_player(Vec3::new(6.0, 0.0, 8.0)); // exactly 10 away
    let mut brain = RobotBrain::new(Some(player));
    let body = body_at(Vec3::ZERO);

    for _ in 0..8 {
        let out = brain.advance(0.25, &body, &mut sense);
        assert_eq!(brain.state, RobotState::Moving);
        assert_eq!(out.stopped, None);
    }
    // 2.25s > 2.0s cooldown
    let out = brain.advance(0.25, &body, &mut sense);
    assert_eq!(brain.state, RobotState::Attacking(AttackPhase::Charging));
    assert_eq!(out.stopped, Some(true));
    assert_eq!(brain.attack_timer, 0.0);
}

#[test]
fn test_robot_out_of_range_keeps_moving() {
    let mut sense = MockWorld::new();
    let player = sense.add_player(Vec3::new(10.5, 0.0, 0.0));
    let mut brain = RobotBrain::new(Some(player));
    for _ in 0..20 {
        brain.advance(0.25, &body_at(Vec3::ZERO), &mut sense);
    }
    assert_eq!(brain.state, RobotState::Moving);
}

// ---- Robot: attack cycle ----

#[test]
fn test_attack_cycle_timing() {
    let mut sense = MockWorld::new();
    let player = sense.add_player(Vec3::new(0.0, 0.0, 5.0));
    let mut brain = RobotBrain::new(Some(player));
    brain.state = RobotState::Attacking(AttackPhase::Charging);
    let body = body_at(Vec3::ZERO);

    // t = 0.25: still charging, hit volume untouched (inactive)
    let out = brain.advance(0.25, &body, &mut sense);
    assert_eq!(out.hitbox_active, None);
    assert_eq!(brain.state, RobotState::Attacking(AttackPhase::Charging));

    // t = 0.5: hit volume on
    let out = brain.advance(0.25, &body, &mut sense);
    assert_eq!(out.hitbox_active, Some(true));
    assert_eq!(brain.state, RobotState::Attacking(AttackPhase::Performing));

    // t = 0.75: lunging
    let out = brain.advance(0.25, &body, &mut sense);
    assert_eq!(out.hitbox_active, None);
    assert!(out.velocity.is_some());

    // t = 1.0: hit volume off
    let out = brain.advance(0.25, &body, &mut sense);
    assert_eq!(out.hitbox_active, Some(false));
    assert_eq!(brain.state, RobotState::Attacking(AttackPhase::Recovery));

    // t = 1.25: recovering
    let out = brain.advance(0.25, &body, &mut sense);
    assert_eq!(out.hitbox_active, None);
    assert_eq!(brain.state, RobotState::Attacking(AttackPhase::Recovery));

    // t = 1.5: back to moving
    let out = brain.advance(0.25, &body, &mut sense);
    assert_eq!(brain.state, RobotState::Moving);
    assert_eq!(out.stopped, Some(false));
}

#[test]
fn test_charge_turns_toward_target_and_locks_direction() {
    let mut sense = MockWorld::new();
    let player = sense.add_player(Vec3::new(5.0, 0.0, 0.0));
    let mut brain = RobotBrain::new(Some(player));
    brain.state = RobotState::Attacking(AttackPhase::Charging);
    let mut body = body_at(Vec3::ZERO);

    // dt * 100 >= 1, so the slerp snaps to the look rotation.
    let out = brain.advance(0.25, &body, &mut sense);
    let rotation = out.rotation.unwrap();
    body.rotation = rotation;
    let facing = rotation * Vec3::Z;
    assert!((facing - Vec3::X).length() < 1e-4);

    brain.advance(0.25, &body, &mut sense);
    assert!((brain.attack_direction - Vec3::X).length() < 1e-4);

    // The lunge keeps the locked direction even if the target moves.
    sense.move_to(player, Vec3::new(0.0, 0.0, -5.0));
    let out = brain.advance(0.1, &body, &mut sense);
    let velocity = out.velocity.unwrap();
    assert!((velocity - Vec3::X * ROBOT_LUNGE_SPEED).length() < 1e-3);
}

#[test]
fn test_charge_rotation_is_partial_for_small_steps() {
    let mut sense = MockWorld::new();
    let player = sense.add_player(Vec3::new(5.0, 0.0, 0.0));
    let mut brain = RobotBrain::new(Some(player));
    brain.state = RobotState::Attacking(AttackPhase::Charging);
    let body = Transform {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    let out = brain.advance(0.002, &body, &mut sense);
    let facing = out.rotation.unwrap() * Vec3::Z;
    assert!(facing.x > 0.0 && facing.x < 1.0 - 1e-3, "partial turn, got {facing:?}");
}

#[test]
fn test_charge_reacquires_when_target_vanishes() {
    let mut sense = MockWorld::new();
    let player = sense.add_player(Vec3::new(0.0, 0.0, 30.0));
    let tower = sense.add(Tag::Tower, Vec3::new(3.0, 0.0, 0.0), false);
    let doomed = sense.add(Tag::Tower, Vec3::new(0.0, 0.0, 50.0), false);
    let mut brain = RobotBrain::new(Some(doomed));
    brain.state = RobotState::Attacking(AttackPhase::Charging);

    sense.remove(doomed);
    let out = brain.advance(0.1, &body_at(Vec3::ZERO), &mut sense);
    assert_eq!(brain.target, Some(tower));
    assert_eq!(out.destination, Some(Vec3::new(3.0, 0.0, 0.0)));
    assert_ne!(brain.target, Some(player));
}

// ---- Tower ----

#[test]
fn test_tower_set_health_clamps() {
    let mut tower = TowerBrain::default();
    assert_eq!(tower.set_health(99), DamageOutcome::Survived);
    assert_eq!(tower.health, TOWER_MAX_HEALTH);

    assert_eq!(tower.set_health(-4), DamageOutcome::Killed);
    assert_eq!(tower.health, 0);
    assert_eq!(tower.state, TowerState::Dying);

    assert_eq!(tower.set_health(3), DamageOutcome::AlreadyDead);
    assert_eq!(tower.health, 0);
}

#[test]
fn test_tower_dies_once_at_zero() {
    let mut tower = TowerBrain::default();
    let outcomes: Vec<_> = (0..8).map(|_| tower.take_damage(1)).collect();
    let kills = outcomes.iter().filter(|o| **o == DamageOutcome::Killed).count();
    assert_eq!(kills, 1);
    assert_eq!(outcomes[4], DamageOutcome::Killed);
    assert!(outcomes[..4].iter().all(|o| *o == DamageOutcome::Survived));
    assert!(outcomes[5..].iter().all(|o| *o == DamageOutcome::AlreadyDead));
}

#[test]
fn test_dying_tower_requests_despawn() {
    let mut sense = MockWorld::new();
    let mut tower = TowerBrain::default();
    tower.set_health(0);
    assert!(tower.advance(0.1, Vec3::ZERO, &mut sense).despawn);
}

#[test]
fn test_tower_fire_cycle_respects_cooldown() {
    let mut sense = MockWorld::new();
    let robot = sense.add(Tag::Robot, Vec3::new(10.0, 0.0, 0.0), true);
    let mut tower = TowerBrain::default();
    let dt = 0.25;

    let mut shot_times = Vec::new();
    for tick in 1..=20 {
        let out = tower.advance(dt, Vec3::ZERO, &mut sense);
        if let Some(target) = out.fire_at {
            assert_eq!(target, robot);
            assert_eq!(out.muzzle_flash, Some(true));
            shot_times.push(tick as f32 * dt);
        }
    }

    assert!(shot_times.len() >= 2, "expected repeated shots, got {shot_times:?}");
    for pair in shot_times.windows(2) {
        assert!(pair[1] - pair[0] >= TOWER_SHOOT_COOLDOWN_SECS);
    }
    assert!(tower.tracking_target);
}

#[test]
fn test_tower_cooldown_resets_on_fire() {
    let mut sense = MockWorld::new();
    sense.add(Tag::Robot, Vec3::new(5.0, 0.0, 0.0), true);
    let mut tower = TowerBrain::default();
    tower.since_last_shot = 2.0;
    tower.advance(0.0, Vec3::ZERO, &mut sense); // acquire
    let out = tower.advance(0.0, Vec3::ZERO, &mut sense);
    assert!(out.fire_at.is_some());
    assert_eq!(tower.since_last_shot, 0.0);
}

#[test]
fn test_tower_muzzle_flash_hides_after_quarter_second() {
    let mut sense = MockWorld::new();
    sense.add(Tag::Robot, Vec3::new(5.0, 0.0, 0.0), true);
    let mut tower = TowerBrain::default();
    tower.since_last_shot = 2.0;
    tower.advance(0.1, Vec3::ZERO, &mut sense);
    let fired = tower.advance(0.1, Vec3::ZERO, &mut sense);
    assert_eq!(fired.muzzle_flash, Some(true));

    let mut hidden_at = None;
    for tick in 1..10 {
        let out = tower.advance(0.1, Vec3::ZERO, &mut sense);
        if out.muzzle_flash == Some(false) {
            hidden_at = Some(tick);
            break;
        }
    }
    // Clock reads 0.1, 0.2, then 0.3 > 0.25 on the third tick after firing.
    assert_eq!(hidden_at, Some(3));
}

#[test]
fn test_tower_drops_target_out_of_range_without_research() {
    let mut sense = MockWorld::new();
    let robot = sense.add(Tag::Robot, Vec3::new(10.0, 0.0, 0.0), true);
    let mut tower = TowerBrain::default();
    tower.advance(0.1, Vec3::ZERO, &mut sense);
    assert_eq!(tower.target, Some(robot));

    sense.move_to(robot, Vec3::new(26.0, 0.0, 0.0));
    let calls_before = sense.nearest_calls;
    let out = tower.advance(0.1, Vec3::ZERO, &mut sense);
    assert_eq!(tower.target, None);
    assert_eq!(out.fire_at, None);
    assert_eq!(sense.nearest_calls, calls_before);
}

#[test]
fn test_tower_without_candidates_stops_tracking() {
    let mut sense = MockWorld::new();
    let mut tower = TowerBrain::default();
    tower.tracking_target = true;
    let out = tower.advance(0.1, Vec3::ZERO, &mut sense);
    assert!(!tower.tracking_target);
    assert_eq!(out.aim_at, None);
}

#[test]
fn test_tower_retargets_to_closer_robot_after_interval() {
    let mut sense = MockWorld::new();
    let first = sense.add(Tag::Robot, Vec3::new(20.0, 0.0, 0.0), true);
    let mut tower = TowerBrain::default();
    tower.advance(0.5, Vec3::ZERO, &mut sense);
    assert_eq!(tower.target, Some(first));

    let closer = sense.add(Tag::Robot, Vec3::new(3.0, 0.0, 0.0), true);
    for _ in 0..20 {
        tower.advance(0.5, Vec3::ZERO, &mut sense);
    }
    // The retarget clock passes 10s only after these twenty ticks.
    tower.advance(0.5, Vec3::ZERO, &mut sense);
    assert_eq!(tower.target, Some(closer));
    assert!(tower.retarget_timer < TOWER_RETARGET_INTERVAL_SECS);
}

#[test]
fn test_tower_aims_at_moveable_target() {
    let mut sense = MockWorld::new();
    sense.add(Tag::Robot, Vec3::new(4.0, 0.0, 4.0), true);
    let mut tower = TowerBrain::default();
    tower.advance(0.1, Vec3::ZERO, &mut sense);
    let out = tower.advance(0.1, Vec3::ZERO, &mut sense);
    assert_eq!(out.aim_at, Some(Vec3::new(4.0, 0.0, 4.0)));
}

// ---- Player health ----

#[test]
fn test_player_health_reports_death_once() {
    let mut health = Health { current: 2, max: 2 };
    assert_eq!(health.take_damage(1), DamageOutcome::Survived);
    assert_eq!(health.take_damage(1), DamageOutcome::Killed);
    assert_eq!(health.take_damage(1), DamageOutcome::AlreadyDead);
}
