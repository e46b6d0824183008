//! Per-entity status effect timers
//!
//! Every timer counts down monotonically and its effect clears the moment it
//! reaches zero.

use serde::{Deserialize, Serialize};

/// Strongest slow that can be applied (fraction of speed removed)
pub const MAX_SLOW: f32 = 0.8;
/// Seconds between poison damage ticks
pub const POISON_TICK_INTERVAL: f32 = 0.5;

/// Active timed effects on one entity
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub slow_timer: f32,
    /// Fraction of movement speed removed while slowed, in [0, MAX_SLOW]
    pub slow_amount: f32,
    pub freeze_timer: f32,
    pub poison_timer: f32,
    /// Damage dealt each poison tick
    pub poison_damage: f32,
    /// Time until the next poison tick
    pub poison_tick: f32,
    pub invulnerable_timer: f32,
}

impl StatusEffects {
    /// Apply a slow; a stronger slow replaces a weaker one, equal slows extend
    pub fn apply_slow(&mut self, amount: f32, duration: f32) {
        let amount = amount.clamp(0.0, MAX_SLOW);
        if amount > self.slow_amount || self.slow_timer <= 0.0 {
            self.slow_amount = amount;
            self.slow_timer = duration;
        } else if amount == self.slow_amount {
            self.slow_timer = self.slow_timer.max(duration);
        }
    }

    pub fn apply_freeze(&mut self, duration: f32) {
        self.freeze_timer = self.freeze_timer.max(duration);
    }

    /// Apply poison; refreshes duration and keeps the higher per-tick damage
    pub fn apply_poison(&mut self, damage_per_tick: f32, duration: f32) {
        if self.poison_timer <= 0.0 {
            self.poison_tick = POISON_TICK_INTERVAL;
        }
        self.poison_damage = self.poison_damage.max(damage_per_tick);
        self.poison_timer = self.poison_timer.max(duration);
    }

    pub fn grant_invulnerability(&mut self, duration: f32) {
        self.invulnerable_timer = self.invulnerable_timer.max(duration);
    }

    pub fn is_slowed(&self) -> bool {
        self.slow_timer > 0.0
    }

    pub fn is_frozen(&self) -> bool {
        self.freeze_timer > 0.0
    }

    pub fn is_poisoned(&self) -> bool {
        self.poison_timer > 0.0
    }

    pub fn is_invulnerable(&self) -> bool {
        self.invulnerable_timer > 0.0
    }

    /// Multiplier applied to movement speed (0 while frozen)
    pub fn speed_multiplier(&self) -> f32 {
        if self.is_frozen() {
            0.0
        } else if self.is_slowed() {
            1.0 - self.slow_amount
        } else {
            1.0
        }
    }

    /// Advance all timers; returns poison damage due this step
    pub fn update(&mut self, dt: f32) -> f32 {
        let mut poison_due = 0.0;

        if self.poison_timer > 0.0 {
            // Ticks only land while the poison is still running
            let active = dt.min(self.poison_timer);
            self.poison_tick -= active;
            while self.poison_tick <= 0.0 {
                poison_due += self.poison_damage;
                self.poison_tick += POISON_TICK_INTERVAL;
            }
        }

        self.slow_timer = (self.slow_timer - dt).max(0.0);
        self.freeze_timer = (self.freeze_timer - dt).max(0.0);
        self.poison_timer = (self.poison_timer - dt).max(0.0);
        self.invulnerable_timer = (self.invulnerable_timer - dt).max(0.0);

        if self.slow_timer == 0.0 {
            self.slow_amount = 0.0;
        }
        if self.poison_timer == 0.0 {
            self.poison_damage = 0.0;
            self.poison_tick = 0.0;
        }

        poison_due
    }
}
