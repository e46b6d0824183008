//! The player: movement, defense, weapons and the multiplier bundle

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Movable};
use super::progression::{PassiveKind, xp_threshold};
use super::weapon::{OwnerStats, Weapon, WeaponKind};
use crate::consts::*;

/// Multipliers accumulated from passives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub max_health_mult: f32,
    /// Health restored per second
    pub regen_per_sec: f32,
    pub speed_mult: f32,
    pub damage_mult: f32,
    pub cooldown_mult: f32,
    pub experience_mult: f32,
    pub pickup_mult: f32,
    pub area_mult: f32,
    /// Fraction of incoming damage ignored, capped at `MAX_DAMAGE_REDUCTION`
    pub damage_reduction: f32,
    pub bonus_weapon_slots: u32,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            max_health_mult: 1.0,
            regen_per_sec: 0.0,
            speed_mult: 1.0,
            damage_mult: 1.0,
            cooldown_mult: 1.0,
            experience_mult: 1.0,
            pickup_mult: 1.0,
            area_mult: 1.0,
            damage_reduction: 0.0,
            bonus_weapon_slots: 0,
        }
    }
}

/// What an incoming hit did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// Dead or invulnerable
    Ignored,
    /// A shield charge took the hit
    Absorbed,
    Wounded,
    Killed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    /// Unit vector of the last non-zero movement
    pub facing: Vec2,
    pub stats: PlayerStats,
    pub level: u32,
    pub experience: f32,
    pub experience_to_next: f32,
    /// Owned weapons, unique by kind, in acquisition order
    pub weapons: Vec<Weapon>,
    /// Every passive picked, repeats included
    pub passives: Vec<PassiveKind>,
    pub shield: u32,
    pub score: u64,
    pub kills: u32,
}

impl Movable for Player {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Player {
    pub fn new(pos: Vec2) -> Self {
        Self {
            body: Body::new(pos, PLAYER_RADIUS, PLAYER_MAX_HEALTH),
            facing: Vec2::X,
            stats: PlayerStats::default(),
            level: 1,
            experience: 0.0,
            experience_to_next: xp_threshold(1),
            weapons: vec![Weapon::new(WeaponKind::MagicBolt)],
            passives: Vec::new(),
            shield: 0,
            score: 0,
            kills: 0,
        }
    }

    pub fn max_weapon_slots(&self) -> usize {
        MAX_WEAPON_SLOTS + self.stats.bonus_weapon_slots as usize
    }

    pub fn has_free_weapon_slot(&self) -> bool {
        self.weapons.len() < self.max_weapon_slots()
    }

    pub fn weapon(&self, kind: WeaponKind) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.kind == kind)
    }

    /// Add a weapon, or upgrade the owned instance of that kind.
    /// Returns false if nothing changed (max level, or no free slot).
    pub fn acquire_weapon(&mut self, kind: WeaponKind) -> bool {
        if let Some(weapon) = self.weapons.iter_mut().find(|w| w.kind == kind) {
            let upgraded = weapon.upgrade();
            if upgraded {
                log::debug!("{} upgraded to level {}", kind.name(), weapon.level);
            }
            return upgraded;
        }
        if !self.has_free_weapon_slot() {
            return false;
        }
        log::debug!("{} acquired", kind.name());
        self.weapons.push(Weapon::new(kind));
        true
    }

    pub fn passive_stacks(&self, kind: PassiveKind) -> u32 {
        self.passives.iter().filter(|&&p| p == kind).count() as u32
    }

    pub fn pickup_radius(&self) -> f32 {
        PLAYER_PICKUP_RADIUS * self.stats.pickup_mult
    }

    pub fn move_speed(&self) -> f32 {
        PLAYER_SPEED * self.stats.speed_mult * self.body.status.speed_multiplier()
    }

    pub fn owner_stats(&self) -> OwnerStats {
        OwnerStats {
            pos: self.body.pos,
            facing: self.facing,
            damage_mult: self.stats.damage_mult,
            cooldown_mult: self.stats.cooldown_mult,
            area_mult: self.stats.area_mult,
        }
    }

    /// Move along `direction` (any length), then clamp inside the arena
    pub fn move_in(&mut self, direction: Vec2, dt: f32) {
        let dir = direction.normalize_or_zero();
        if dir != Vec2::ZERO {
            self.facing = dir;
        }
        self.body.vel = dir * self.move_speed();
        self.body.integrate(dt);
        self.clamp_to_arena();
    }

    pub fn clamp_to_arena(&mut self) {
        let r = self.body.radius;
        self.body.pos = self.body.pos.clamp(
            Vec2::splat(r),
            Vec2::new(ARENA_WIDTH - r, ARENA_HEIGHT - r),
        );
    }

    pub fn regenerate(&mut self, dt: f32) {
        if self.stats.regen_per_sec > 0.0 {
            self.body.heal(self.stats.regen_per_sec * dt);
        }
    }

    /// Resolve an incoming hit through invulnerability, shield and armor
    pub fn take_damage(&mut self, amount: f32) -> DamageOutcome {
        if self.body.is_dead() || self.body.status.is_invulnerable() || !(amount > 0.0) {
            return DamageOutcome::Ignored;
        }
        if self.shield > 0 {
            self.shield -= 1;
            self.body.status.grant_invulnerability(SHIELD_INVULNERABILITY);
            return DamageOutcome::Absorbed;
        }

        let reduction = self.stats.damage_reduction.clamp(0.0, MAX_DAMAGE_REDUCTION);
        let damage = (amount * (1.0 - reduction)).max(MIN_DAMAGE_TAKEN);
        if self.body.apply_damage(damage) {
            return DamageOutcome::Killed;
        }
        self.body.status.grant_invulnerability(HIT_INVULNERABILITY);
        DamageOutcome::Wounded
    }

    /// Recompute max health from the multiplier, healing by any increase
    pub fn refresh_max_health(&mut self) {
        let before = self.body.max_health;
        self.body.set_max_health(PLAYER_MAX_HEALTH * self.stats.max_health_mult);
        let gained = self.body.max_health - before;
        if gained > 0.0 {
            self.body.heal(gained);
        }
    }

    pub fn heal_fraction(&mut self, fraction: f32) {
        let amount = self.body.max_health * fraction;
        self.body.heal(amount);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Vec2::new(640.0, 360.0))
    }

    #[test]
    fn test_starts_with_magic_bolt() {
        let p = player();
        assert_eq!(p.weapons.len(), 1);
        assert_eq!(p.weapons[0].kind, WeaponKind::MagicBolt);
        assert_eq!(p.level, 1);
        assert_eq!(p.experience_to_next, 10.0);
    }

    #[test]
    fn test_shield_absorbs_hit() {
        let mut p = player();
        p.shield = 1;
        assert_eq!(p.take_damage(50.0), DamageOutcome::Absorbed);
        assert_eq!(p.body.health(), PLAYER_MAX_HEALTH);
        assert_eq!(p.shield, 0);
        assert!(p.body.status.is_invulnerable());
        assert_eq!(p.take_damage(50.0), DamageOutcome::Ignored);
    }

    #[test]
    fn test_armor_and_minimum_damage() {
        let mut p = player();
        p.stats.damage_reduction = 0.5;
        assert_eq!(p.take_damage(20.0), DamageOutcome::Wounded);
        assert_eq!(p.body.health(), 90.0);

        let mut p = player();
        p.stats.damage_reduction = 0.8;
        p.take_damage(0.5);
        assert_eq!(p.body.health(), PLAYER_MAX_HEALTH - MIN_DAMAGE_TAKEN);
    }

    #[test]
    fn test_invulnerable_after_wound() {
        let mut p = player();
        p.take_damage(10.0);
        assert_eq!(p.take_damage(10.0), DamageOutcome::Ignored);
        p.body.status.update(HIT_INVULNERABILITY + 0.01);
        assert_eq!(p.take_damage(10.0), DamageOutcome::Wounded);
        assert_eq!(p.body.health(), 80.0);
    }

    #[test]
    fn test_lethal_hit() {
        let mut p = player();
        assert_eq!(p.take_damage(500.0), DamageOutcome::Killed);
        assert!(p.body.is_dead());
    }

    #[test]
    fn test_duplicate_weapon_upgrades_instead_of_adding() {
        let mut p = player();
        assert!(p.acquire_weapon(WeaponKind::MagicBolt));
        assert_eq!(p.weapons.len(), 1);
        assert_eq!(p.weapons[0].level, 2);
    }

    #[test]
    fn test_slots_are_bounded() {
        let mut p = player();
        for kind in WeaponKind::ALL.iter().skip(1) {
            p.acquire_weapon(*kind);
        }
        assert_eq!(p.weapons.len(), MAX_WEAPON_SLOTS);

        p.stats.bonus_weapon_slots = 1;
        assert!(p.acquire_weapon(WeaponKind::PoisonPool));
        assert_eq!(p.weapons.len(), MAX_WEAPON_SLOTS + 1);
    }

    #[test]
    fn test_movement_clamped_and_sets_facing() {
        let mut p = Player::new(Vec2::new(20.0, 360.0));
        p.move_in(Vec2::new(-1.0, 0.0), 1.0);
        assert_eq!(p.body.pos.x, PLAYER_RADIUS);
        assert_eq!(p.facing, Vec2::new(-1.0, 0.0));

        p.move_in(Vec2::ZERO, 1.0);
        assert_eq!(p.facing, Vec2::new(-1.0, 0.0));
    }
}
