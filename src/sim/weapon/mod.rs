//! Player weapons
//!
//! Every weapon shares one contract: a cooldown that fires the weapon when it
//! runs out (and something is alive to shoot at), followed by advancing the
//! weapon's own projectiles and effects. Firing and hit resolution differ per
//! kind and live in `fire` and `effects`.

pub mod effects;
pub mod fire;
pub mod upgrades;

use glam::Vec2;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::HitShape;
use super::enemy::Enemy;
use super::item::Item;
use super::obstacle::{Container, Obstacle};
use crate::consts::MAX_WEAPON_LEVEL;
use crate::polar_to_cartesian;

pub use effects::{Effect, EffectView};
pub use upgrades::{Modifier, describe_level, level_modifiers};

/// The twelve weapon kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    /// Direct-fire bolt at the nearest enemy
    MagicBolt,
    /// Instant melee arc around the facing direction
    Slash,
    /// Random targets, hopping to nearby enemies
    ChainLightning,
    /// Straight piercing projectile
    Lance,
    /// Blades revolving around the player
    OrbitBlades,
    /// Short-lived line toward a random enemy
    Beam,
    /// Cone of pellets
    Scatter,
    /// Homing missile
    Seeker,
    /// Bolt that slows (and may freeze)
    FrostBolt,
    /// Expanding ring with knockback
    Nova,
    /// Out-and-back projectile
    Boomerang,
    /// Stationary poison area
    PoisonPool,
}

impl WeaponKind {
    pub const ALL: [WeaponKind; 12] = [
        WeaponKind::MagicBolt,
        WeaponKind::Slash,
        WeaponKind::ChainLightning,
        WeaponKind::Lance,
        WeaponKind::OrbitBlades,
        WeaponKind::Beam,
        WeaponKind::Scatter,
        WeaponKind::Seeker,
        WeaponKind::FrostBolt,
        WeaponKind::Nova,
        WeaponKind::Boomerang,
        WeaponKind::PoisonPool,
    ];

    /// (base damage, base cooldown seconds)
    pub fn base(self) -> (f32, f32) {
        match self {
            WeaponKind::MagicBolt => (10.0, 1.0),
            WeaponKind::Slash => (15.0, 1.2),
            WeaponKind::ChainLightning => (18.0, 1.6),
            WeaponKind::Lance => (20.0, 1.4),
            WeaponKind::OrbitBlades => (12.0, 0.5),
            WeaponKind::Beam => (25.0, 2.5),
            WeaponKind::Scatter => (8.0, 1.5),
            WeaponKind::Seeker => (22.0, 2.0),
            WeaponKind::FrostBolt => (8.0, 1.3),
            WeaponKind::Nova => (15.0, 3.0),
            WeaponKind::Boomerang => (14.0, 1.8),
            WeaponKind::PoisonPool => (4.0, 3.0),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::MagicBolt => "Magic Bolt",
            WeaponKind::Slash => "Slash",
            WeaponKind::ChainLightning => "Chain Lightning",
            WeaponKind::Lance => "Lance",
            WeaponKind::OrbitBlades => "Orbit Blades",
            WeaponKind::Beam => "Beam",
            WeaponKind::Scatter => "Scatter Shot",
            WeaponKind::Seeker => "Seeker",
            WeaponKind::FrostBolt => "Frost Bolt",
            WeaponKind::Nova => "Nova",
            WeaponKind::Boomerang => "Boomerang",
            WeaponKind::PoisonPool => "Poison Pool",
        }
    }
}

/// Per-weapon stats accumulated from the level table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponStats {
    pub damage_mult: f32,
    pub cooldown_mult: f32,
    pub area_mult: f32,
    pub duration_mult: f32,
    /// Projectiles, blades, beams or pools per firing
    pub projectiles: u32,
    /// Enemies a single projectile may hit before retiring
    pub pierce: u32,
    pub directions: u32,
    pub chain_hops: u32,
    pub targets: u32,
    pub slow_amount: f32,
    pub freeze_chance: f32,
}

impl WeaponStats {
    /// Level-1 stats for a kind
    pub fn base(kind: WeaponKind) -> Self {
        let mut stats = Self {
            damage_mult: 1.0,
            cooldown_mult: 1.0,
            area_mult: 1.0,
            duration_mult: 1.0,
            projectiles: 1,
            pierce: 1,
            directions: 1,
            chain_hops: 0,
            targets: 1,
            slow_amount: 0.0,
            freeze_chance: 0.0,
        };
        match kind {
            WeaponKind::Lance => stats.pierce = 2,
            WeaponKind::Scatter => stats.projectiles = 3,
            WeaponKind::FrostBolt => stats.slow_amount = 0.4,
            _ => {}
        }
        stats
    }

    pub fn apply(&mut self, modifier: Modifier) {
        match modifier {
            Modifier::Damage(x) => self.damage_mult *= x,
            Modifier::Cooldown(x) => self.cooldown_mult *= x,
            Modifier::Area(x) => self.area_mult *= x,
            Modifier::Duration(x) => self.duration_mult *= x,
            Modifier::Projectiles(n) => self.projectiles += n,
            Modifier::Pierce(n) => self.pierce += n,
            Modifier::Directions(n) => self.directions = (self.directions + n).min(4),
            Modifier::ChainHops(n) => self.chain_hops += n,
            Modifier::Targets(n) => self.targets += n,
            Modifier::Slow(x) => self.slow_amount += x,
            Modifier::FreezeChance(x) => self.freeze_chance = (self.freeze_chance + x).min(1.0),
        }
    }
}

/// Snapshot of the owner's stats handed to weapons each tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OwnerStats {
    pub pos: Vec2,
    /// Unit facing vector (last movement direction)
    pub facing: Vec2,
    pub damage_mult: f32,
    pub cooldown_mult: f32,
    pub area_mult: f32,
}

impl Default for OwnerStats {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            facing: Vec2::X,
            damage_mult: 1.0,
            cooldown_mult: 1.0,
            area_mult: 1.0,
        }
    }
}

/// Everything a weapon may read or damage during its update
pub struct CombatContext<'a> {
    pub enemies: &'a mut [Enemy],
    pub obstacles: &'a mut [Obstacle],
    pub containers: &'a mut [Container],
    /// Only chests are considered; other items are ignored
    pub items: &'a mut [Item],
    pub rng: &'a mut Pcg32,
}

impl CombatContext<'_> {
    pub fn any_enemy_alive(&self) -> bool {
        self.enemies.iter().any(|e| !e.body.is_dead())
    }
}

/// An owned weapon instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub level: u32,
    pub cooldown_timer: f32,
    pub base_damage: f32,
    pub base_cooldown: f32,
    pub stats: WeaponStats,
    /// Live projectiles and effects owned by this weapon
    pub effects: Vec<Effect>,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        let (base_damage, base_cooldown) = kind.base();
        Self {
            kind,
            level: 1,
            cooldown_timer: 0.0,
            base_damage,
            base_cooldown,
            stats: WeaponStats::base(kind),
            effects: Vec::new(),
        }
    }

    pub fn is_max_level(&self) -> bool {
        self.level >= MAX_WEAPON_LEVEL
    }

    /// Raise the level by one and fold in that level's modifiers.
    /// Returns false at max level.
    pub fn upgrade(&mut self) -> bool {
        if self.is_max_level() {
            return false;
        }
        self.level += 1;
        let before = self.stats.clone();
        for &modifier in level_modifiers(self.kind, self.level) {
            self.stats.apply(modifier);
        }
        if self.kind == WeaponKind::OrbitBlades {
            self.respace_blades(&before);
        }
        true
    }

    /// Rebuild a live blade set for new stats, keeping its rotation and center
    fn respace_blades(&mut self, before: &WeaponStats) {
        let Some(Effect::Blade(first)) = self.effects.first() else {
            return;
        };
        let center = first.pos - polar_to_cartesian(first.orbit_radius, first.phase());
        let angle = first.angle;
        let orbit_radius = first.orbit_radius * self.stats.area_mult / before.area_mult;
        let damage = first.damage * self.stats.damage_mult / before.damage_mult;
        self.effects = fire::blade_set(self.stats.projectiles.max(1), angle, orbit_radius, damage, center);
    }

    pub fn effective_damage(&self, owner: &OwnerStats) -> f32 {
        self.base_damage * self.stats.damage_mult * owner.damage_mult
    }

    pub fn effective_cooldown(&self, owner: &OwnerStats) -> f32 {
        self.base_cooldown * self.stats.cooldown_mult * owner.cooldown_mult
    }

    pub fn area(&self, owner: &OwnerStats) -> f32 {
        self.stats.area_mult * owner.area_mult
    }

    /// One tick of the weapon contract
    pub fn update(&mut self, dt: f32, owner: &OwnerStats, ctx: &mut CombatContext) {
        self.cooldown_timer = (self.cooldown_timer - dt).max(0.0);
        if self.cooldown_timer <= 0.0 && ctx.any_enemy_alive() {
            fire::fire(self, owner, ctx);
            self.cooldown_timer = self.effective_cooldown(owner);
        }

        self.effects.retain_mut(|effect| effect.update(dt, owner, ctx));
    }
}

/// Index of the nearest live enemy to `pos`
pub fn nearest_enemy(enemies: &[Enemy], pos: Vec2) -> Option<usize> {
    nearest_enemy_excluding(enemies, pos, f32::INFINITY, &[])
}

/// Index of the nearest live enemy within `radius` whose id is not excluded
pub fn nearest_enemy_excluding(
    enemies: &[Enemy],
    pos: Vec2,
    radius: f32,
    exclude: &[u32],
) -> Option<usize> {
    enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.body.is_dead() && !exclude.contains(&e.id))
        .map(|(i, e)| (i, e.body.pos.distance_squared(pos)))
        .filter(|&(_, d)| d <= radius * radius)
        .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(i, _)| i)
}

/// Up to `count` distinct live enemy indices chosen at random
pub fn random_enemies(enemies: &[Enemy], rng: &mut Pcg32, count: usize) -> Vec<usize> {
    use rand::seq::IndexedRandom;

    let alive: Vec<usize> = enemies
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.body.is_dead())
        .map(|(i, _)| i)
        .collect();
    alive.choose_multiple(rng, count).copied().collect()
}

/// Damage every live enemy touched by `shape` that is not already in `hit`.
///
/// Stops after `limit` hits. Returns the struck indices in enemy order.
pub fn strike_enemies(
    shape: &HitShape,
    damage: f32,
    hit: &mut Vec<u32>,
    enemies: &mut [Enemy],
    limit: u32,
) -> Vec<usize> {
    let mut struck = Vec::new();
    for (i, enemy) in enemies.iter_mut().enumerate() {
        if struck.len() as u32 >= limit {
            break;
        }
        if enemy.body.is_dead() || hit.contains(&enemy.id) {
            continue;
        }
        if shape.hits(enemy.body.pos, enemy.body.radius) {
            enemy.body.apply_damage(damage);
            hit.push(enemy.id);
            struck.push(i);
        }
    }
    struck
}

/// Damage containers and open chests touched by `shape`.
///
/// Containers are struck once per `hit` set. Returns how many props were
/// struck, counting every chest this call opened.
pub fn strike_props(
    shape: &HitShape,
    damage: f32,
    hit: &mut Vec<u32>,
    containers: &mut [Container],
    items: &mut [Item],
) -> u32 {
    let mut struck = 0;
    for container in containers.iter_mut() {
        if container.is_broken() || hit.contains(&container.id) {
            continue;
        }
        if shape.hits(container.pos, container.radius) {
            container.apply_damage(damage);
            hit.push(container.id);
            struck += 1;
        }
    }
    for item in items.iter_mut() {
        if item.is_closed_chest() && shape.hits(item.body.pos, item.body.radius) && item.open_chest() {
            log::debug!("Chest {} opened by weapon", item.id);
            struck += 1;
        }
    }
    struck
}
