//! Pickups: experience orbs, chests and consumables

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::entity::{Body, Movable};

pub const ORB_RADIUS: f32 = 6.0;
pub const CHEST_RADIUS: f32 = 14.0;
pub const CONSUMABLE_RADIUS: f32 = 10.0;
/// Acceleration of a magnetized item toward the player (px/s²)
pub const MAGNET_ACCEL: f32 = 900.0;
pub const MAGNET_MAX_SPEED: f32 = 600.0;

/// Consumable effects dropped by containers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConsumableKind {
    /// Restore 30% of max health
    Heal,
    /// Pull every experience orb to the player
    Magnet,
    /// Damage every enemy on the field
    Bomb,
    /// One shield charge
    Shield,
    /// Freeze every enemy
    Freeze,
}

impl ConsumableKind {
    pub const ALL: [ConsumableKind; 5] = [
        ConsumableKind::Heal,
        ConsumableKind::Magnet,
        ConsumableKind::Bomb,
        ConsumableKind::Shield,
        ConsumableKind::Freeze,
    ];

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        *Self::ALL.choose(rng).unwrap_or(&ConsumableKind::Heal)
    }
}

/// Chest rarity, drawn by weight when the chest drops
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChestTier {
    Common,
    Rare,
    Legendary,
}

impl ChestTier {
    const WEIGHTS: [(ChestTier, u32); 3] = [
        (ChestTier::Common, 70),
        (ChestTier::Rare, 25),
        (ChestTier::Legendary, 5),
    ];

    pub fn roll<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let total: u32 = Self::WEIGHTS.iter().map(|(_, w)| w).sum();
        let mut roll = rng.random_range(0..total);
        for (tier, weight) in Self::WEIGHTS {
            if roll < weight {
                return tier;
            }
            roll -= weight;
        }
        ChestTier::Common
    }

    pub fn bonus_score(self) -> u64 {
        match self {
            ChestTier::Common => 100,
            ChestTier::Rare => 300,
            ChestTier::Legendary => 1000,
        }
    }

    /// Fraction of max health restored on opening
    pub fn heal_fraction(self) -> f32 {
        match self {
            ChestTier::Legendary => 0.25,
            _ => 0.0,
        }
    }
}

/// Item payload
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    ExperienceOrb { value: u32 },
    Chest { open: bool, tier: ChestTier },
    Consumable(ConsumableKind),
}

/// A pickup lying in the arena
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub id: u32,
    pub kind: ItemKind,
    pub body: Body,
    /// Once set, the item homes on the player until collected
    pub magnetized: bool,
}

impl Movable for Item {
    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Item {
    pub fn orb(id: u32, pos: Vec2, value: u32) -> Self {
        Self::new(id, ItemKind::ExperienceOrb { value }, pos, ORB_RADIUS)
    }

    pub fn chest(id: u32, pos: Vec2, tier: ChestTier) -> Self {
        Self::new(id, ItemKind::Chest { open: false, tier }, pos, CHEST_RADIUS)
    }

    pub fn consumable(id: u32, pos: Vec2, kind: ConsumableKind) -> Self {
        Self::new(id, ItemKind::Consumable(kind), pos, CONSUMABLE_RADIUS)
    }

    fn new(id: u32, kind: ItemKind, pos: Vec2, radius: f32) -> Self {
        Self {
            id,
            kind,
            body: Body::new(pos, radius, 1.0),
            magnetized: false,
        }
    }

    pub fn is_chest(&self) -> bool {
        matches!(self.kind, ItemKind::Chest { .. })
    }

    pub fn is_closed_chest(&self) -> bool {
        matches!(self.kind, ItemKind::Chest { open: false, .. })
    }

    /// Chests are never picked up; they are consumed when a weapon opens them
    pub fn is_collectible(&self) -> bool {
        !self.is_chest() && !self.body.is_dead()
    }

    /// Open a closed chest. Returns true only for the closed -> open transition.
    pub fn open_chest(&mut self) -> bool {
        if let ItemKind::Chest { open, .. } = &mut self.kind {
            if !*open {
                *open = true;
                return true;
            }
        }
        false
    }

    /// Home toward the player once magnetized or inside the pickup radius
    pub fn update_magnet(&mut self, dt: f32, player_pos: Vec2, pickup_radius: f32) {
        if self.is_chest() {
            return;
        }
        if !self.magnetized && self.body.pos.distance(player_pos) <= pickup_radius {
            self.magnetized = true;
        }
        if !self.magnetized {
            return;
        }
        let dir = (player_pos - self.body.pos).normalize_or_zero();
        self.body.vel = (self.body.vel + dir * MAGNET_ACCEL * dt).clamp_length_max(MAGNET_MAX_SPEED);
        self.body.integrate(dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_chest_opens_exactly_once_and_is_never_collectible() {
        let mut chest = Item::chest(1, Vec2::ZERO, ChestTier::Rare);
        assert!(!chest.is_collectible());
        assert!(chest.open_chest());
        assert!(!chest.open_chest());
        assert!(!chest.is_collectible());
        assert!(!chest.is_closed_chest());
    }

    #[test]
    fn test_open_on_non_chest_is_noop() {
        let mut orb = Item::orb(1, Vec2::ZERO, 3);
        assert!(!orb.open_chest());
        assert!(orb.is_collectible());
    }

    #[test]
    fn test_magnet_pulls_inside_radius_only() {
        let player = Vec2::new(100.0, 100.0);
        let mut near = Item::orb(1, Vec2::new(150.0, 100.0), 1);
        let mut far = Item::orb(2, Vec2::new(400.0, 100.0), 1);
        near.update_magnet(0.1, player, 80.0);
        far.update_magnet(0.1, player, 80.0);
        assert!(near.magnetized);
        assert!(near.body.pos.x < 150.0);
        assert!(!far.magnetized);
        assert_eq!(far.body.pos.x, 400.0);
    }

    #[test]
    fn test_chest_tier_roll_is_seeded() {
        let mut a = Pcg32::seed_from_u64(7);
        let mut b = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            assert_eq!(ChestTier::roll(&mut a), ChestTier::roll(&mut b));
        }
    }
}
