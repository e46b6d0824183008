//! Experience, level-ups and reward choices

use rand::seq::SliceRandom;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::item::ChestTier;
use super::player::Player;
use super::weapon::{WeaponKind, describe_level};
use crate::consts::{MAX_BONUS_WEAPON_SLOTS, MAX_DAMAGE_REDUCTION};

/// Choices offered per reward event
pub const CHOICE_COUNT: usize = 3;
/// Fraction of max health restored per level gained
pub const LEVEL_UP_HEAL: f32 = 0.1;
/// Lowest cooldown multiplier Haste can reach
pub const MIN_COOLDOWN_MULT: f32 = 0.4;

/// Experience needed to advance from `level`
pub fn xp_threshold(level: u32) -> f32 {
    (10.0 * 1.25f32.powi(level.max(1) as i32 - 1)).round()
}

/// Add experience (scaled by the player's multiplier) and apply every
/// level-up it pays for. Returns the number of levels gained.
pub fn gain_experience(player: &mut Player, amount: f32) -> u32 {
    if !(amount > 0.0) {
        return 0;
    }
    player.experience += amount * player.stats.experience_mult;

    let mut levels = 0;
    while player.experience >= player.experience_to_next {
        player.experience -= player.experience_to_next;
        player.level += 1;
        player.experience_to_next = xp_threshold(player.level);
        player.heal_fraction(LEVEL_UP_HEAL);
        levels += 1;
    }
    levels
}

/// Stackable passive upgrades
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassiveKind {
    Vitality,
    Recovery,
    Swiftness,
    Might,
    Haste,
    Wisdom,
    Attraction,
    Amplify,
    Armor,
    Arsenal,
}

impl PassiveKind {
    pub const ALL: [PassiveKind; 10] = [
        PassiveKind::Vitality,
        PassiveKind::Recovery,
        PassiveKind::Swiftness,
        PassiveKind::Might,
        PassiveKind::Haste,
        PassiveKind::Wisdom,
        PassiveKind::Attraction,
        PassiveKind::Amplify,
        PassiveKind::Armor,
        PassiveKind::Arsenal,
    ];

    pub fn name(self) -> &'static str {
        match self {
            PassiveKind::Vitality => "Vitality",
            PassiveKind::Recovery => "Recovery",
            PassiveKind::Swiftness => "Swiftness",
            PassiveKind::Might => "Might",
            PassiveKind::Haste => "Haste",
            PassiveKind::Wisdom => "Wisdom",
            PassiveKind::Attraction => "Attraction",
            PassiveKind::Amplify => "Amplify",
            PassiveKind::Armor => "Armor",
            PassiveKind::Arsenal => "Arsenal",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PassiveKind::Vitality => "Max health x1.2",
            PassiveKind::Recovery => "+0.5 health per second",
            PassiveKind::Swiftness => "+10% move speed",
            PassiveKind::Might => "Damage x1.1",
            PassiveKind::Haste => "Cooldowns x0.92",
            PassiveKind::Wisdom => "+15% experience",
            PassiveKind::Attraction => "+25% pickup radius",
            PassiveKind::Amplify => "+10% weapon area",
            PassiveKind::Armor => "+8% damage reduction",
            PassiveKind::Arsenal => "+1 weapon slot",
        }
    }

    /// Whether another stack would have no effect
    pub fn is_capped(self, player: &Player) -> bool {
        let stats = &player.stats;
        match self {
            PassiveKind::Armor => stats.damage_reduction >= MAX_DAMAGE_REDUCTION - 1e-4,
            PassiveKind::Arsenal => stats.bonus_weapon_slots >= MAX_BONUS_WEAPON_SLOTS,
            PassiveKind::Haste => stats.cooldown_mult <= MIN_COOLDOWN_MULT + 1e-4,
            _ => false,
        }
    }

    /// Stack one more of this passive onto the player
    pub fn apply(self, player: &mut Player) {
        let stats = &mut player.stats;
        match self {
            PassiveKind::Vitality => stats.max_health_mult *= 1.2,
            PassiveKind::Recovery => stats.regen_per_sec += 0.5,
            PassiveKind::Swiftness => stats.speed_mult += 0.1,
            PassiveKind::Might => stats.damage_mult *= 1.1,
            PassiveKind::Haste => {
                stats.cooldown_mult = (stats.cooldown_mult * 0.92).max(MIN_COOLDOWN_MULT);
            }
            PassiveKind::Wisdom => stats.experience_mult += 0.15,
            PassiveKind::Attraction => stats.pickup_mult += 0.25,
            PassiveKind::Amplify => stats.area_mult += 0.1,
            PassiveKind::Armor => {
                stats.damage_reduction = (stats.damage_reduction + 0.08).min(MAX_DAMAGE_REDUCTION);
            }
            PassiveKind::Arsenal => {
                stats.bonus_weapon_slots = (stats.bonus_weapon_slots + 1).min(MAX_BONUS_WEAPON_SLOTS);
            }
        }
        if self == PassiveKind::Vitality {
            player.refresh_max_health();
        }
        player.passives.push(self);
    }
}

/// What triggered a reward event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardSource {
    LevelUp,
    Chest(ChestTier),
}

/// One offered upgrade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardChoice {
    Weapon(WeaponKind),
    Passive(PassiveKind),
}

impl RewardChoice {
    pub fn title(&self) -> &'static str {
        match self {
            RewardChoice::Weapon(kind) => kind.name(),
            RewardChoice::Passive(kind) => kind.name(),
        }
    }

    /// Card text: new weapon, next weapon level's changes, or passive effect
    pub fn describe(&self, player: &Player) -> String {
        match self {
            RewardChoice::Weapon(kind) => match player.weapon(*kind) {
                Some(w) => format!(
                    "Level {}: {}",
                    w.level + 1,
                    describe_level(*kind, w.level + 1).join(", ")
                ),
                None => "New weapon".to_string(),
            },
            RewardChoice::Passive(kind) => kind.description().to_string(),
        }
    }

    /// Whether picking this would change anything for `player`
    pub fn is_eligible(&self, player: &Player) -> bool {
        match self {
            RewardChoice::Weapon(kind) => match player.weapon(*kind) {
                Some(w) => !w.is_max_level(),
                None => player.has_free_weapon_slot(),
            },
            RewardChoice::Passive(kind) => !kind.is_capped(player),
        }
    }
}

/// Up to three distinct eligible choices in random order.
/// Empty when nothing can be improved.
pub fn generate_choices(player: &Player, rng: &mut Pcg32) -> Vec<RewardChoice> {
    let mut pool: Vec<RewardChoice> = WeaponKind::ALL
        .iter()
        .map(|&k| RewardChoice::Weapon(k))
        .chain(PassiveKind::ALL.iter().map(|&k| RewardChoice::Passive(k)))
        .filter(|c| c.is_eligible(player))
        .collect();
    pool.shuffle(rng);
    pool.truncate(CHOICE_COUNT);
    pool
}

/// Apply a selected choice. Returns false if it had no effect.
pub fn apply_choice(player: &mut Player, choice: RewardChoice) -> bool {
    match choice {
        RewardChoice::Weapon(kind) => player.acquire_weapon(kind),
        RewardChoice::Passive(kind) => {
            if kind.is_capped(player) {
                return false;
            }
            kind.apply(player);
            true
        }
    }
}
