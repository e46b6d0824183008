//! Static scenery: obstacles and destructible containers

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Damage a bramble deals to an overlapping player per interval
pub const HAZARD_DAMAGE: f32 = 5.0;
/// Seconds between hazard damage ticks
pub const HAZARD_INTERVAL: f32 = 1.0;
pub const PILLAR_HEALTH: f32 = 60.0;
pub const CONTAINER_HEALTH: f32 = 30.0;
pub const CONTAINER_RADIUS: f32 = 14.0;

/// Obstacle types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Blocks movement, never destroyed
    Rock,
    /// Blocks movement, broken by projectiles
    Pillar,
    /// Walkable thorns that hurt the player periodically
    Bramble,
}

/// A static obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub radius: f32,
    /// `None` for indestructible obstacles
    pub health: Option<f32>,
    /// Time until the next hazard tick (brambles only)
    pub hazard_timer: f32,
}

impl Obstacle {
    pub fn new(id: u32, kind: ObstacleKind, pos: Vec2, radius: f32) -> Self {
        let health = match kind {
            ObstacleKind::Pillar => Some(PILLAR_HEALTH),
            ObstacleKind::Rock | ObstacleKind::Bramble => None,
        };
        Self {
            id,
            kind,
            pos,
            radius,
            health,
            hazard_timer: 0.0,
        }
    }

    pub fn blocks_movement(&self) -> bool {
        self.kind != ObstacleKind::Bramble
    }

    pub fn is_hazard(&self) -> bool {
        self.kind == ObstacleKind::Bramble
    }

    /// Damage a destructible obstacle; indestructible ones ignore it
    pub fn apply_damage(&mut self, amount: f32) {
        if let Some(hp) = self.health.as_mut() {
            *hp = (*hp - amount).max(0.0);
        }
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(self.health, Some(hp) if hp <= 0.0)
    }

    /// Advance the hazard timer while the player overlaps; returns damage due
    pub fn tick_hazard(&mut self, dt: f32, overlapping: bool) -> f32 {
        if !self.is_hazard() {
            return 0.0;
        }
        if !overlapping {
            self.hazard_timer = 0.0;
            return 0.0;
        }
        self.hazard_timer -= dt;
        if self.hazard_timer <= 0.0 {
            self.hazard_timer += HAZARD_INTERVAL;
            return HAZARD_DAMAGE;
        }
        0.0
    }
}

/// A breakable container that yields one consumable
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Container {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
}

impl Container {
    pub fn new(id: u32, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            radius: CONTAINER_RADIUS,
            health: CONTAINER_HEALTH,
        }
    }

    pub fn apply_damage(&mut self, amount: f32) {
        self.health = (self.health - amount.max(0.0)).max(0.0);
    }

    pub fn is_broken(&self) -> bool {
        self.health <= 0.0
    }
}
