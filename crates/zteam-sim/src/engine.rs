//! Session controller: the core of the game.
//!
//! `Session` owns the hecs ECS world, processes queued commands, runs the
//! top-level state machine and all per-tick systems, and produces
//! `SessionSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::VecDeque;

use glam::{Quat, Vec3};
use hecs::{Entity, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, error, info, trace};

use zteam_ai::perception::ScratchBuffer;
use zteam_ai::TowerBrain;
use zteam_core::commands::SessionCommand;
use zteam_core::components::{Health, NavAgent, RadiusDisplay, Transform};
use zteam_core::constants::*;
use zteam_core::enums::{DamageOutcome, GameState, Tag};
use zteam_core::error::ConfigError;
use zteam_core::events::GameEvent;
use zteam_core::state::SessionSnapshot;
use zteam_core::types::SimTime;

use crate::config::SimConfig;
use crate::entity_id;
use crate::spatial::SpatialHash;
use crate::spawner::RobotSpawner;
use crate::systems;
use crate::systems::hitbox::Hitbox;
use crate::world_setup;

/// The session. Owns the ECS world and all sim state.
pub struct Session {
    config: SimConfig,
    world: World,
    time: SimTime,
    state: GameState,
    rng: ChaCha8Rng,
    spawner: RobotSpawner,
    /// Live towers, in build order.
    towers: Vec<Entity>,
    player: Entity,
    build_mode: bool,
    index: SpatialHash,
    robot_scratch: ScratchBuffer,
    tower_scratch: ScratchBuffer,
    contact_scratch: ScratchBuffer,
    pickup_scratch: ScratchBuffer,
    command_queue: VecDeque<SessionCommand>,
    despawn_buffer: Vec<Entity>,
    events: Vec<GameEvent>,
    /// Set when a command named an unknown state; skips one state-machine step.
    state_fault: bool,
}

impl Session {
    /// Create a new session. The session starts in `Starting` and moves to
    /// `Playing` on its first tick.
    pub fn new(config: SimConfig) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            error!(%err, "invalid session config");
            return Err(err);
        }

        let mut world = World::new();
        let player = world_setup::spawn_player(&mut world, config.player_start);
        info!(seed = config.seed, max_robots = config.max_robots, "session created");

        Ok(Self {
            time: SimTime::default(),
            state: GameState::default(),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            spawner: RobotSpawner::from_config(&config),
            towers: Vec::new(),
            player,
            build_mode: false,
            index: SpatialHash::default(),
            robot_scratch: ScratchBuffer::new(ROBOT_SEARCH_CAPACITY),
            tower_scratch: ScratchBuffer::new(config.max_robots),
            contact_scratch: ScratchBuffer::new(HITBOX_CONTACT_CAPACITY),
            pickup_scratch: ScratchBuffer::new(ZBUCK_PICKUP_CAPACITY),
            command_queue: VecDeque::new(),
            despawn_buffer: Vec::new(),
            events: Vec::new(),
            state_fault: false,
            world,
            config,
        })
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SessionCommand) {
        self.command_queue.push_back(command);
    }

    /// Queue multiple commands.
    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SessionCommand>) {
        self.command_queue.extend(commands);
    }

    /// Advance by one fixed tick at the configured rate.
    pub fn tick(&mut self) -> SessionSnapshot {
        let dt = self.config.dt();
        self.advance(dt)
    }

    /// Advance by `dt` seconds and return the resulting snapshot.
    pub fn advance(&mut self, dt: f32) -> SessionSnapshot {
        let entry = self.state;
        self.process_commands();

        // An unknown state request skips the state machine for this tick.
        // A state entered by a command takes its first step on the next tick.
        if !std::mem::take(&mut self.state_fault) {
            match self.state {
                GameState::Playing => {
                    self.run_systems(dt);
                    self.time.advance(dt);
                }
                GameState::Starting if entry == GameState::Starting => {
                    self.set_state(GameState::Playing)
                }
                GameState::Ended if entry == GameState::Ended => self.reset_session(),
                GameState::Starting | GameState::Paused | GameState::Ended => {}
            }
        }

        self.snapshot()
    }

    fn snapshot(&mut self) -> SessionSnapshot {
        let events = std::mem::take(&mut self.events);
        systems::snapshot::build_snapshot(
            &self.world,
            &self.time,
            self.state,
            self.build_mode,
            &self.spawner,
            self.player,
            events,
        )
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> Entity {
        self.player
    }

    /// Live towers, in build order.
    pub fn towers(&self) -> &[Entity] {
        &self.towers
    }

    pub fn live_robots(&self) -> usize {
        self.spawner.live_count()
    }

    pub fn build_mode(&self) -> bool {
        self.build_mode
    }

    /// Move the state machine. No-op when already in `next`.
    pub fn set_state(&mut self, next: GameState) {
        if next == self.state {
            return;
        }
        info!(from = ?self.state, to = ?next, "session state changed");
        self.events.push(GameEvent::StateChanged {
            from: self.state,
            to: next,
        });
        self.state = next;
    }

    /// Move the state machine by numeric code.
    pub fn set_state_code(&mut self, code: u8) -> Result<(), ConfigError> {
        let next = GameState::try_from(code)?;
        self.set_state(next);
        Ok(())
    }

    /// Build a tower and register it. `orientation` only seeds the turret
    /// facing; the tower body is not rotated.
    pub fn spawn_tower(&mut self, position: Vec3, orientation: Quat) -> Entity {
        let tower = world_setup::spawn_tower(&mut self.world, position, orientation);
        self.towers.push(tower);
        debug!(tower = entity_id(tower), ?position, "tower built");
        self.events.push(GameEvent::TowerBuilt {
            id: entity_id(tower),
            position,
        });
        tower
    }

    /// Deregister a tower. Returns whether it was registered.
    pub fn remove_tower(&mut self, tower: Entity) -> bool {
        let before = self.towers.len();
        self.towers.retain(|&t| t != tower);
        self.towers.len() != before
    }

    /// Set a tower's health directly, clamped to `[0, TOWER_MAX_HEALTH]`.
    pub fn set_tower_health(&mut self, tower: Entity, value: i32) -> Option<DamageOutcome> {
        let outcome = self.world.get::<&mut TowerBrain>(tower).ok()?.set_health(value);
        systems::damage::sync_health_bar(&self.world, tower);
        Some(outcome)
    }

    /// Emit `count` currency drops around `center`, each launched at a random
    /// angle on the ground plane.
    pub fn spawn_zbucks(&mut self, count: u16, center: Vec3, value: u32) -> Vec<Entity> {
        let mut spawned = Vec::with_capacity(usize::from(count));
        for _ in 0..count {
            let angle_deg: f32 = self.rng.gen_range(0.0..360.0);
            let zbuck = world_setup::spawn_zbuck(&mut self.world, center, angle_deg, value);
            self.events.push(GameEvent::ZBuckSpawned {
                id: entity_id(zbuck),
                value,
                angle_deg,
            });
            spawned.push(zbuck);
        }
        spawned
    }

    /// Show or hide the range ring of every live tower.
    pub fn set_build_mode(&mut self, on: bool) {
        self.build_mode = on;
        for &tower in &self.towers {
            if let Ok(mut display) = self.world.get::<&mut RadiusDisplay>(tower) {
                display.active = on;
            }
        }
    }

    /// Spawn a robot now, if the population cap allows.
    pub fn spawn_robot(&mut self) -> Option<Entity> {
        match self.spawner.reserve(&mut self.rng) {
            Some(point) => Some(self.spawn_robot_at(point)),
            None => {
                trace!(live = self.spawner.live_count(), "robot spawn rejected at population cap");
                None
            }
        }
    }

    fn spawn_robot_at(&mut self, position: Vec3) -> Entity {
        let robot = world_setup::spawn_robot(&mut self.world, position, Some(self.player));
        debug!(robot = entity_id(robot), ?position, "robot spawned");
        self.events.push(GameEvent::RobotSpawned {
            id: entity_id(robot),
            position,
        });
        robot
    }

    /// Clear the board and return to `Starting`: every tower, robot and drop
    /// is removed, the spawner restarts and the player is restored.
    pub fn reset_session(&mut self) {
        let player = self.player;
        let doomed: Vec<Entity> = self
            .world
            .iter()
            .map(|entity_ref| entity_ref.entity())
            .filter(|&entity| entity != player)
            .collect();
        for entity in doomed {
            let _ = self.world.despawn(entity);
        }

        self.towers.clear();
        self.despawn_buffer.clear();
        self.index.clear();
        self.spawner.start();
        self.build_mode = false;
        self.time = SimTime::default();
        world_setup::reset_player(&mut self.world, player, self.config.player_start);

        info!("session reset");
        self.events.push(GameEvent::SessionReset);
        self.set_state(GameState::Starting);
    }

    /// Apply `amount` damage to any damageable entity and run the side effects
    /// of the outcome. Returns `None` when the target no longer exists.
    pub fn apply_damage(&mut self, target: Entity, amount: u16) -> Option<DamageOutcome> {
        let report = systems::damage::apply(&self.world, target, amount)?;

        match (report.kind, report.outcome) {
            (Tag::Robot, DamageOutcome::Killed) => {
                self.spawner.release();
                if let Ok((hitbox, agent)) = self
                    .world
                    .query_one_mut::<(&mut Hitbox, &mut NavAgent)>(target)
                {
                    hitbox.set_active(false);
                    agent.stopped = true;
                }
                debug!(robot = entity_id(target), live = self.spawner.live_count(), "robot killed");
                self.events.push(GameEvent::RobotKilled {
                    id: entity_id(target),
                    position: report.position,
                });
                self.spawn_zbucks(ROBOT_DROP_COUNT, report.position, ROBOT_DROP_VALUE);
            }
            (Tag::Tower, DamageOutcome::Killed) => {
                debug!(tower = entity_id(target), "tower destroyed");
            }
            (Tag::Player, DamageOutcome::Survived | DamageOutcome::Killed) => {
                let health = self
                    .world
                    .get::<&Health>(target)
                    .map(|h| h.current)
                    .unwrap_or(0);
                self.events.push(GameEvent::PlayerHit { health });
                if report.outcome == DamageOutcome::Killed {
                    info!("player killed");
                    self.set_state(GameState::Ended);
                }
            }
            _ => {}
        }

        Some(report.outcome)
    }

    /// Process all queued commands.
    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::SpawnTower {
                position,
                orientation,
            } => {
                self.spawn_tower(position, orientation);
            }
            SessionCommand::SetBuildMode { on } => self.set_build_mode(on),
            SessionCommand::MovePlayer { position } => {
                let position = self.config.clamp_to_bounds(position);
                if let Ok(transform) = self.world.query_one_mut::<&mut Transform>(self.player) {
                    transform.position = position;
                }
            }
            SessionCommand::Pause => {
                if self.state == GameState::Playing {
                    self.set_state(GameState::Paused);
                }
            }
            SessionCommand::Resume => {
                if self.state == GameState::Paused {
                    self.set_state(GameState::Playing);
                }
            }
            SessionCommand::EndSession => self.set_state(GameState::Ended),
            SessionCommand::SetStateCode { code } => {
                if let Err(err) = self.set_state_code(code) {
                    error!(%err, "ignoring state change");
                    self.state_fault = true;
                }
            }
            SessionCommand::SpawnRobot => {
                if self.state == GameState::Playing {
                    self.spawn_robot();
                }
            }
            SessionCommand::SpawnZBucks {
                count,
                position,
                value,
            } => {
                if self.state == GameState::Playing {
                    self.spawn_zbucks(count, position, value);
                }
            }
        }
    }

    /// Run all systems in order for one `Playing` tick.
    fn run_systems(&mut self, dt: f32) {
        // 1. Timed spawning
        if let Some(point) = self.spawner.update(dt, &mut self.rng) {
            self.spawn_robot_at(point);
        }

        // 2. Actor state machines against the current positions
        self.index.rebuild(&self.world);
        systems::robots::run(
            &mut self.world,
            &self.index,
            &mut self.robot_scratch,
            Some(self.player),
            dt,
            &mut self.despawn_buffer,
        );
        let report = systems::towers::run(
            &mut self.world,
            &self.index,
            &mut self.tower_scratch,
            dt,
            &mut self.despawn_buffer,
        );
        for shot in report.shots {
            self.events.push(GameEvent::ShotFired {
                tower: entity_id(shot.tower),
                target: entity_id(shot.target),
            });
            self.apply_damage(shot.target, TOWER_SHOT_DAMAGE);
        }
        for tower in report.removed {
            self.remove_tower(tower);
            self.events.push(GameEvent::TowerDestroyed {
                id: entity_id(tower),
            });
        }

        // 3. Movement
        systems::movement::run(&mut self.world, dt);
        systems::movement::fly_zbucks(&mut self.world, dt);

        // 4. Contacts at the new positions
        self.index.rebuild(&self.world);
        let contacts =
            systems::hitbox::run(&mut self.world, &self.index, &mut self.contact_scratch);
        for victim in contacts {
            self.apply_damage(victim, ROBOT_ATTACK_DAMAGE);
        }
        let collected = systems::zbucks::collect(
            &mut self.world,
            &self.index,
            &mut self.pickup_scratch,
            self.player,
            &mut self.despawn_buffer,
        );
        for (zbuck, value) in collected {
            self.events.push(GameEvent::ZBuckCollected {
                id: entity_id(zbuck),
                value,
            });
        }

        // 5. Cleanup
        systems::cleanup::run(&mut self.world, &mut self.despawn_buffer);
    }
}
