//! Robot (attacker) state machine.
//!
//! A robot walks toward its target, re-searching for the nearest tower every
//! half second, and attacks in three timed phases once it is close enough:
//! a charge that turns it toward the target, a lunge along the locked-in
//! direction with its hit volume live, and a short recovery.

use glam::{Quat, Vec3};
use hecs::Entity;

use zteam_core::components::Transform;
use zteam_core::constants::*;
use zteam_core::enums::{AttackPhase, DamageOutcome, RobotState, Tag};
use zteam_core::types::{flat_look_rotation, forward};

use crate::damage::Damageable;
use crate::perception::{Perception, TargetInfo};

/// Per-robot behaviour state. Stored as a component on robot entities.
#[derive(Debug, Clone, PartialEq)]
pub struct RobotBrain {
    pub state: RobotState,
    pub health: u16,
    /// Weak handle; may outlive the entity it points at.
    pub target: Option<Entity>,
    pub search_timer: f32,
    pub attack_timer: f32,
    /// Facing captured when the charge completes.
    pub attack_direction: Vec3,
}

/// Requests produced by one `advance` call, applied by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RobotOutput {
    pub rotation: Option<Quat>,
    pub destination: Option<Vec3>,
    pub stopped: Option<bool>,
    /// Velocity to apply this tick instead of path following.
    pub velocity: Option<Vec3>,
    pub hitbox_active: Option<bool>,
    /// The robot is done and its entity should be removed.
    pub despawn: bool,
}

impl RobotBrain {
    pub fn new(target: Option<Entity>) -> Self {
        Self {
            state: RobotState::Moving,
            health: ROBOT_MAX_HEALTH,
            target,
            search_timer: 0.0,
            attack_timer: 0.0,
            attack_direction: Vec3::Z,
        }
    }

    pub fn is_dying(&self) -> bool {
        self.state == RobotState::Dying
    }

    /// Run one tick of `dt` seconds.
    pub fn advance<P: Perception + ?Sized>(
        &mut self,
        dt: f32,
        body: &Transform,
        sense: &mut P,
    ) -> RobotOutput {
        let mut out = RobotOutput::default();
        match self.state {
            RobotState::Moving => self.advance_moving(dt, body, sense, &mut out),
            RobotState::Attacking(AttackPhase::Charging) => {
                self.advance_charging(dt, body, sense, &mut out)
            }
            RobotState::Attacking(AttackPhase::Performing) => self.advance_performing(dt, &mut out),
            RobotState::Attacking(AttackPhase::Recovery) => self.advance_recovery(dt, &mut out),
            RobotState::Dying => out.despawn = true,
        }
        out
    }

    fn advance_moving<P: Perception + ?Sized>(
        &mut self,
        dt: f32,
        body: &Transform,
        sense: &mut P,
        out: &mut RobotOutput,
    ) {
        self.search_timer += dt;
        self.attack_timer += dt;

        if self.search_timer >= ROBOT_SEARCH_INTERVAL_SECS {
            self.search_timer -= ROBOT_SEARCH_INTERVAL_SECS;
            if let Some(found) = sense.nearest(body.position, ROBOT_SEARCH_RADIUS, Tag::Tower) {
                self.target = Some(found);
                if let Some(info) = sense.locate(found) {
                    out.destination = Some(info.position);
                }
            }
        }

        let target = match self.target.and_then(|t| sense.locate(t)) {
            Some(info) => {
                if info.moveable {
                    out.destination = Some(info.position);
                }
                Some(info)
            }
            None => self.reacquire(body, sense, out),
        };

        let Some(target) = target else {
            return;
        };

        if self.attack_timer > ROBOT_ATTACK_COOLDOWN_SECS
            && body.position.distance_squared(target.position) <= ROBOT_ATTACK_RANGE_SQ
        {
            self.attack_timer = 0.0;
            self.state = RobotState::Attacking(AttackPhase::Charging);
            out.stopped = Some(true);
        }
    }

    fn advance_charging<P: Perception + ?Sized>(
        &mut self,
        dt: f32,
        body: &Transform,
        sense: &mut P,
        out: &mut RobotOutput,
    ) {
        self.attack_timer += dt;

        let target = match self.target.and_then(|t| sense.locate(t)) {
            Some(info) => Some(info),
            None => self.reacquire(body, sense, out),
        };

        let mut rotation = body.rotation;
        if let Some(look) = target.and_then(|info| flat_look_rotation(info.position - body.position)) {
            let t = (dt * ROBOT_CHARGE_ROTATION_SPEED).min(1.0);
            rotation = body.rotation.slerp(look, t);
            out.rotation = Some(rotation);
        }

        if self.attack_timer >= ROBOT_CHARGE_SECS {
            self.attack_direction = forward(rotation);
            self.attack_timer = 0.0;
            out.hitbox_active = Some(true);
            self.state = RobotState::Attacking(AttackPhase::Performing);
        }
    }

    fn advance_performing(&mut self, dt: f32, out: &mut RobotOutput) {
        self.attack_timer += dt;
        out.velocity = Some(self.attack_direction * ROBOT_LUNGE_SPEED);

        if self.attack_timer >= ROBOT_PERFORM_SECS {
            self.attack_timer = 0.0;
            out.hitbox_active = Some(false);
            self.state = RobotState::Attacking(AttackPhase::Recovery);
        }
    }

    fn advance_recovery(&mut self, dt: f32, out: &mut RobotOutput) {
        self.attack_timer += dt;

        if self.attack_timer >= ROBOT_RECOVERY_SECS {
            self.attack_timer = 0.0;
            self.state = RobotState::Moving;
            out.stopped = Some(false);
        }
    }

    /// The current target is gone: take the nearest tower, else the player,
    /// and head for it.
    fn reacquire<P: Perception + ?Sized>(
        &mut self,
        body: &Transform,
        sense: &mut P,
        out: &mut RobotOutput,
    ) -> Option<TargetInfo> {
        let next = sense
            .nearest(body.position, ROBOT_SEARCH_RADIUS, Tag::Tower)
            .or_else(|| sense.fallback());
        self.target = next;

        let info = next.and_then(|t| sense.locate(t));
        if let Some(info) = info {
            out.destination = Some(info.position);
        }
        info
    }
}

impl Damageable for RobotBrain {
    fn take_damage(&mut self, amount: u16) -> DamageOutcome {
        if self.is_dying() {
            return DamageOutcome::AlreadyDead;
        }
        self.health = self.health.saturating_sub(amount);
        if self.health < 1 {
            self.state = RobotState::Dying;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Survived
        }
    }
}
