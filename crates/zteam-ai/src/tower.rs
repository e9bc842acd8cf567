//! Tower (defender) state machine.

use glam::Vec3;
use hecs::Entity;

use zteam_core::constants::*;
use zteam_core::enums::{DamageOutcome, Tag, TowerState};

use crate::damage::Damageable;
use crate::perception::Perception;

/// Per-tower behaviour state. Stored as a component on tower entities.
#[derive(Debug, Clone, PartialEq)]
pub struct TowerBrain {
    pub state: TowerState,
    pub health: i32,
    pub target: Option<Entity>,
    pub tracking_target: bool,
    /// Also the muzzle-flash clock.
    pub since_last_shot: f32,
    pub retarget_timer: f32,
}

/// Requests produced by one `advance` call, applied by the host.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TowerOutput {
    /// Turn the turret toward this point.
    pub aim_at: Option<Vec3>,
    /// Apply a shot's damage to this entity.
    pub fire_at: Option<Entity>,
    pub muzzle_flash: Option<bool>,
    /// Deregister the tower and remove its entity.
    pub despawn: bool,
}

impl Default for TowerBrain {
    fn default() -> Self {
        Self {
            state: TowerState::Alive,
            health: TOWER_MAX_HEALTH,
            target: None,
            tracking_target: false,
            since_last_shot: 0.0,
            retarget_timer: 0.0,
        }
    }
}

impl TowerBrain {
    pub fn is_dying(&self) -> bool {
        self.state == TowerState::Dying
    }

    /// Run one tick of `dt` seconds for a tower standing at `position`.
    pub fn advance<P: Perception + ?Sized>(
        &mut self,
        dt: f32,
        position: Vec3,
        sense: &mut P,
    ) -> TowerOutput {
        let mut out = TowerOutput::default();
        match self.state {
            TowerState::Alive => self.advance_alive(dt, position, sense, &mut out),
            TowerState::Dying => out.despawn = true,
        }
        out
    }

    fn advance_alive<P: Perception + ?Sized>(
        &mut self,
        dt: f32,
        position: Vec3,
        sense: &mut P,
        out: &mut TowerOutput,
    ) {
        if self.retarget_timer > TOWER_RETARGET_INTERVAL_SECS {
            if let Some(found) = sense.nearest(position, TOWER_SEARCH_RADIUS, Tag::Robot) {
                self.acquire(found);
            }
        }

        match self.target.and_then(|t| sense.locate(t)) {
            None => match sense.nearest(position, TOWER_SEARCH_RADIUS, Tag::Robot) {
                Some(found) => self.acquire(found),
                None => {
                    self.target = None;
                    self.tracking_target = false;
                }
            },
            // Out of range: let go, search again next tick.
            Some(info) if position.distance_squared(info.position) > TOWER_SEARCH_RADIUS_SQ => {
                self.target = None;
            }
            Some(info) if info.moveable => {
                out.aim_at = Some(info.position);
                if self.since_last_shot > TOWER_SHOOT_COOLDOWN_SECS {
                    out.fire_at = self.target;
                    out.muzzle_flash = Some(true);
                    self.since_last_shot = 0.0;
                }
            }
            Some(_) => {}
        }

        if self.since_last_shot > TOWER_MUZZLE_FLASH_SECS {
            out.muzzle_flash = Some(false);
        }

        self.retarget_timer += dt;
        self.since_last_shot += dt;
    }

    fn acquire(&mut self, target: Entity) {
        self.target = Some(target);
        self.retarget_timer = 0.0;
        self.tracking_target = true;
    }

    /// Set health directly, clamped to `[0, TOWER_MAX_HEALTH]`.
    pub fn set_health(&mut self, value: i32) -> DamageOutcome {
        if self.is_dying() {
            return DamageOutcome::AlreadyDead;
        }
        self.health = value.clamp(0, TOWER_MAX_HEALTH);
        if self.health < 1 {
            self.state = TowerState::Dying;
            DamageOutcome::Killed
        } else {
            DamageOutcome::Survived
        }
    }
}

impl Damageable for TowerBrain {
    fn take_damage(&mut self, amount: u16) -> DamageOutcome {
        self.set_health(self.health - i32::from(amount))
    }
}
