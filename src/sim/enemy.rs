//! Enemy kinds, stat scaling and boss attacks

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{blocking_obstacle_at, circles_overlap};
use super::entity::{Body, Movable};
use super::obstacle::Obstacle;
use crate::consts::OFFSCREEN_MARGIN;
use crate::{heading, in_arena, polar_to_cartesian};

/// Seconds between boss radial bursts
pub const BOSS_ATTACK_INTERVAL: f32 = 3.0;
pub const BOSS_BURST_COUNT: usize = 12;
/// Seconds between mini-boss aimed volleys
pub const MINI_BOSS_ATTACK_INTERVAL: f32 = 2.5;
pub const MINI_BOSS_VOLLEY_COUNT: usize = 3;
const MINI_BOSS_VOLLEY_SPREAD: f32 = 0.25;

pub const ENEMY_PROJECTILE_SPEED: f32 = 160.0;
pub const ENEMY_PROJECTILE_RADIUS: f32 = 6.0;
pub const ENEMY_PROJECTILE_LIFETIME: f32 = 5.0;
/// Boss projectile damage as a fraction of the owner's contact damage
const PROJECTILE_DAMAGE_RATIO: f32 = 0.6;

/// Enemy kinds; the first six are the normal tiers in pool order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    Grunt,
    Runner,
    Brute,
    Swarmer,
    Stalker,
    Wraith,
    MiniBoss,
    Boss,
}

/// Base stats for one enemy kind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyParams {
    pub max_health: f32,
    pub damage: f32,
    pub speed: f32,
    pub radius: f32,
    pub experience: u32,
}

impl EnemyKind {
    /// Normal tiers in the order the spawn pool unlocks them
    pub const NORMAL: [EnemyKind; 6] = [
        EnemyKind::Grunt,
        EnemyKind::Runner,
        EnemyKind::Brute,
        EnemyKind::Swarmer,
        EnemyKind::Stalker,
        EnemyKind::Wraith,
    ];

    pub fn params(self) -> EnemyParams {
        let (max_health, damage, speed, radius, experience) = match self {
            EnemyKind::Grunt => (20.0, 8.0, 70.0, 12.0, 1),
            EnemyKind::Runner => (12.0, 6.0, 120.0, 10.0, 1),
            EnemyKind::Brute => (60.0, 15.0, 50.0, 18.0, 3),
            EnemyKind::Swarmer => (8.0, 4.0, 100.0, 8.0, 1),
            EnemyKind::Stalker => (35.0, 12.0, 90.0, 13.0, 2),
            EnemyKind::Wraith => (45.0, 14.0, 105.0, 14.0, 3),
            EnemyKind::MiniBoss => (600.0, 20.0, 60.0, 30.0, 25),
            EnemyKind::Boss => (2500.0, 30.0, 55.0, 44.0, 100),
        };
        EnemyParams {
            max_health,
            damage,
            speed,
            radius,
            experience,
        }
    }

    pub fn is_boss(self) -> bool {
        self == EnemyKind::Boss
    }

    /// Boss or mini-boss: has its own attack schedule and drops a chest
    pub fn is_elite(self) -> bool {
        matches!(self, EnemyKind::Boss | EnemyKind::MiniBoss)
    }

    fn attack_interval(self) -> Option<f32> {
        match self {
            EnemyKind::Boss => Some(BOSS_ATTACK_INTERVAL),
            EnemyKind::MiniBoss => Some(MINI_BOSS_ATTACK_INTERVAL),
            _ => None,
        }
    }
}

/// Time-based stat multipliers for newly spawned enemies
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyScaling {
    pub health: f32,
    pub damage: f32,
    pub speed: f32,
}

impl EnemyScaling {
    /// Health grows linearly, damage with the square root of the same
    /// factor, speed up to a 1.5x ceiling
    pub fn at(elapsed_secs: f32) -> Self {
        let minutes = elapsed_secs.max(0.0) / 60.0;
        let factor = 1.0 + 0.25 * minutes;
        Self {
            health: factor,
            damage: factor.sqrt(),
            speed: (1.0 + 0.05 * minutes).min(1.5),
        }
    }
}

impl Default for EnemyScaling {
    fn default() -> Self {
        Self::at(0.0)
    }
}

/// A projectile fired by a boss or mini-boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyProjectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub lifetime: f32,
}

/// A hostile entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub body: Body,
    pub damage: f32,
    pub speed: f32,
    pub experience: u32,
    /// Countdown to the next attack (bosses and mini-bosses only)
    pub attack_timer: f32,
    pub projectiles: Vec<EnemyProjectile>,
}

impl Movable for Enemy {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Enemy {
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, scaling: EnemyScaling) -> Self {
        let p = kind.params();
        Self {
            id,
            kind,
            body: Body::new(pos, p.radius, p.max_health * scaling.health),
            damage: p.damage * scaling.damage,
            speed: p.speed * scaling.speed,
            experience: p.experience,
            attack_timer: kind.attack_interval().unwrap_or(0.0),
            projectiles: Vec::new(),
        }
    }

    /// Chase the player, honoring slow and freeze
    pub fn update_movement(&mut self, dt: f32, target: Vec2) {
        let dir = (target - self.body.pos).normalize_or_zero();
        let speed = self.speed * self.body.status.speed_multiplier();
        self.body.vel = dir * speed;
        self.body.integrate(dt);
    }

    /// Contact damage is suspended while frozen
    pub fn can_contact_attack(&self) -> bool {
        !self.body.is_dead() && !self.body.status.is_frozen()
    }

    /// Advance the boss attack schedule; fires when the timer runs out.
    /// Status effects never pause this timer.
    pub fn update_attack(&mut self, dt: f32, target: Vec2) {
        let Some(interval) = self.kind.attack_interval() else {
            return;
        };
        if self.body.is_dead() {
            return;
        }
        self.attack_timer -= dt;
        if self.attack_timer > 0.0 {
            return;
        }
        self.attack_timer += interval;

        let damage = self.damage * PROJECTILE_DAMAGE_RATIO;
        match self.kind {
            EnemyKind::Boss => {
                for i in 0..BOSS_BURST_COUNT {
                    let theta = i as f32 * std::f32::consts::TAU / BOSS_BURST_COUNT as f32;
                    self.push_projectile(theta, damage);
                }
            }
            EnemyKind::MiniBoss => {
                let aim = heading(target - self.body.pos);
                let half = (MINI_BOSS_VOLLEY_COUNT as f32 - 1.0) / 2.0;
                for i in 0..MINI_BOSS_VOLLEY_COUNT {
                    let theta = aim + (i as f32 - half) * MINI_BOSS_VOLLEY_SPREAD;
                    self.push_projectile(theta, damage);
                }
            }
            _ => {}
        }
        log::debug!("{:?} {} fired, {} projectiles live", self.kind, self.id, self.projectiles.len());
    }

    fn push_projectile(&mut self, theta: f32, damage: f32) {
        self.projectiles.push(EnemyProjectile {
            pos: self.body.pos,
            vel: polar_to_cartesian(ENEMY_PROJECTILE_SPEED, theta),
            radius: ENEMY_PROJECTILE_RADIUS,
            damage,
            lifetime: ENEMY_PROJECTILE_LIFETIME,
        });
    }

    /// Move owned projectiles; returns the damage of every projectile that
    /// reached the player this step. Each projectile hits at most once.
    pub fn update_projectiles(
        &mut self,
        dt: f32,
        player_pos: Vec2,
        player_radius: f32,
        obstacles: &[Obstacle],
    ) -> Vec<f32> {
        let mut hits = Vec::new();
        self.projectiles.retain_mut(|p| {
            p.pos += p.vel * dt;
            p.lifetime -= dt;
            if p.lifetime <= 0.0 || !in_arena(p.pos, OFFSCREEN_MARGIN) {
                return false;
            }
            if blocking_obstacle_at(obstacles, p.pos, p.radius).is_some() {
                return false;
            }
            if circles_overlap(p.pos, p.radius, player_pos, player_radius) {
                hits.push(p.damage);
                return false;
            }
            true
        });
        hits
    }
}
