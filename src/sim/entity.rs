//! Shared movable-entity data
//!
//! Player, enemies, items and projectiles all carry a `Body`. Collision and
//! damage helpers work against the `Movable` trait so they can be shared
//! between concrete kinds.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::status::StatusEffects;

/// Position, extent, health and timed effects of one entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Body {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    health: f32,
    pub max_health: f32,
    dead: bool,
    pub status: StatusEffects,
}

impl Body {
    pub fn new(pos: Vec2, radius: f32, max_health: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: radius.max(f32::EPSILON),
            health: max_health.max(0.0),
            max_health: max_health.max(0.0),
            dead: false,
            status: StatusEffects::default(),
        }
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_dead(&self) -> bool {
        self.dead
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0.0 {
            0.0
        } else {
            (self.health / self.max_health).clamp(0.0, 1.0)
        }
    }

    /// Deal damage; returns true if this hit killed the entity.
    /// Ignored while dead or invulnerable.
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if self.dead || self.status.is_invulnerable() || !(amount > 0.0) {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health <= 0.0 {
            self.dead = true;
            return true;
        }
        false
    }

    /// Restore health up to the maximum (no effect once dead)
    pub fn heal(&mut self, amount: f32) {
        if self.dead || !(amount > 0.0) {
            return;
        }
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Change maximum health, keeping current health within range
    pub fn set_max_health(&mut self, max_health: f32) {
        self.max_health = max_health.max(1.0);
        self.health = self.health.min(self.max_health);
    }

    /// Mark as dead without a damage source (e.g. expired pickups)
    pub fn kill(&mut self) {
        self.health = 0.0;
        self.dead = true;
    }

    pub fn integrate(&mut self, dt: f32) {
        self.pos += self.vel * dt;
    }
}

/// Anything carrying a `Body`
pub trait Movable {
    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    fn is_dead(&self) -> bool {
        self.body().is_dead()
    }
}

impl Movable for Body {
    fn body(&self) -> &Body {
        self
    }

    fn body_mut(&mut self) -> &mut Body {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_damage_kills_and_death_is_sticky() {
        let mut b = Body::new(Vec2::ZERO, 10.0, 20.0);
        assert!(!b.apply_damage(5.0));
        assert!(b.apply_damage(100.0));
        assert_eq!(b.health(), 0.0);
        assert!(b.is_dead());

        b.heal(50.0);
        assert!(b.is_dead());
        assert_eq!(b.health(), 0.0);
        assert!(!b.apply_damage(1.0));
    }

    #[test]
    fn test_invulnerable_ignores_damage() {
        let mut b = Body::new(Vec2::ZERO, 10.0, 20.0);
        b.status.grant_invulnerability(1.0);
        assert!(!b.apply_damage(50.0));
        assert_eq!(b.health(), 20.0);
    }

    #[test]
    fn test_nan_damage_ignored() {
        let mut b = Body::new(Vec2::ZERO, 10.0, 20.0);
        b.apply_damage(f32::NAN);
        assert_eq!(b.health(), 20.0);
    }

    proptest! {
        #[test]
        fn health_never_negative(hits in proptest::collection::vec(0.0f32..500.0, 0..20)) {
            let mut b = Body::new(Vec2::ZERO, 5.0, 100.0);
            let mut was_dead = false;
            for h in hits {
                b.apply_damage(h);
                prop_assert!(b.health() >= 0.0);
                prop_assert!(b.health() <= b.max_health);
                if was_dead {
                    prop_assert!(b.is_dead());
                }
                was_dead = b.is_dead();
            }
        }
    }
}
