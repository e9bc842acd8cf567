//! Damage as part of the targetable contract.

use zteam_core::components::Health;
use zteam_core::enums::DamageOutcome;

/// Anything that can be hit. `Killed` is reported exactly once per entity.
pub trait Damageable {
    fn take_damage(&mut self, amount: u16) -> DamageOutcome;
}

impl Damageable for Health {
    fn take_damage(&mut self, amount: u16) -> DamageOutcome {
        if self.current == 0 {
            return DamageOutcome::AlreadyDead;
        }
        self.current = self.current.saturating_sub(amount);
        if self.current < 1 {
            DamageOutcome::Killed
        } else {
            DamageOutcome::Survived
        }
    }
}
