//! Level-gated weapon modifiers
//!
//! Each weapon kind maps levels 2..=5 to a list of modifiers. Leveling a
//! weapon folds that level's modifiers into its `WeaponStats`; nothing is
//! special-cased per weapon type outside this table.

use serde::{Deserialize, Serialize};

use super::WeaponKind;

/// One structural or numeric change unlocked by a level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Modifier {
    /// Multiply damage
    Damage(f32),
    /// Multiply cooldown
    Cooldown(f32),
    /// Multiply size (range, radius, width)
    Area(f32),
    /// Multiply effect duration
    Duration(f32),
    /// Additional projectiles, blades, beams or pools
    Projectiles(u32),
    /// Additional enemies a projectile may pass through
    Pierce(u32),
    /// Additional slash directions
    Directions(u32),
    /// Additional chain hops
    ChainHops(u32),
    /// Additional primary targets
    Targets(u32),
    /// Raise slow magnitude
    Slow(f32),
    /// Chance to freeze on hit
    FreezeChance(f32),
}

/// Modifiers unlocked when `kind` reaches `level`
pub fn level_modifiers(kind: WeaponKind, level: u32) -> &'static [Modifier] {
    use Modifier::*;
    use WeaponKind::*;

    match (kind, level) {
        (MagicBolt, 2) => &[Damage(1.25)],
        (MagicBolt, 3) => &[Projectiles(1)],
        (MagicBolt, 4) => &[Damage(1.25)],
        (MagicBolt, 5) => &[Cooldown(0.8)],

        (Slash, 2) => &[Damage(1.3)],
        (Slash, 3) => &[Directions(1)],
        (Slash, 4) => &[Directions(1), Area(1.15)],
        (Slash, 5) => &[Directions(1), Damage(1.2)],

        (ChainLightning, 2) => &[ChainHops(1)],
        (ChainLightning, 3) => &[ChainHops(1), Damage(1.2)],
        (ChainLightning, 4) => &[Targets(1)],
        (ChainLightning, 5) => &[ChainHops(1), Damage(1.3)],

        (Lance, 2) => &[Damage(1.3)],
        (Lance, 3) => &[Pierce(1)],
        (Lance, 4) => &[Pierce(1), Cooldown(0.9)],
        (Lance, 5) => &[Pierce(2), Damage(1.25)],

        (OrbitBlades, 2) => &[Damage(1.3)],
        (OrbitBlades, 3) => &[Projectiles(1)],
        (OrbitBlades, 4) => &[Area(1.2)],
        (OrbitBlades, 5) => &[Projectiles(1), Damage(1.2)],

        (Beam, 2) => &[Damage(1.25)],
        (Beam, 3) => &[Area(1.5)],
        (Beam, 4) => &[Projectiles(1)],
        (Beam, 5) => &[Damage(1.5), Duration(1.3)],

        (Scatter, 2) => &[Damage(1.2)],
        (Scatter, 3) => &[Projectiles(2)],
        (Scatter, 4) => &[Cooldown(0.85)],
        (Scatter, 5) => &[Projectiles(2), Damage(1.2)],

        (Seeker, 2) => &[Damage(1.3)],
        (Seeker, 3) => &[Projectiles(1)],
        (Seeker, 4) => &[Cooldown(0.85)],
        (Seeker, 5) => &[Projectiles(1), Damage(1.25)],

        (FrostBolt, 2) => &[Damage(1.25)],
        (FrostBolt, 3) => &[Slow(0.1), Duration(1.25)],
        (FrostBolt, 4) => &[Projectiles(1)],
        (FrostBolt, 5) => &[FreezeChance(0.2)],

        (Nova, 2) => &[Damage(1.25)],
        (Nova, 3) => &[Area(1.25)],
        (Nova, 4) => &[Cooldown(0.85)],
        (Nova, 5) => &[Damage(1.5), Area(1.15)],

        (Boomerang, 2) => &[Damage(1.25)],
        (Boomerang, 3) => &[Projectiles(1)],
        (Boomerang, 4) => &[Area(1.25)],
        (Boomerang, 5) => &[Projectiles(1), Damage(1.2)],

        (PoisonPool, 2) => &[Damage(1.3)],
        (PoisonPool, 3) => &[Area(1.25)],
        (PoisonPool, 4) => &[Duration(1.3)],
        (PoisonPool, 5) => &[Projectiles(1), Damage(1.2)],

        _ => &[],
    }
}

/// Short human-readable summary of what reaching `level` grants
pub fn describe_level(kind: WeaponKind, level: u32) -> Vec<String> {
    level_modifiers(kind, level)
        .iter()
        .map(|m| match *m {
            Modifier::Damage(x) => format!("Damage x{x:.2}"),
            Modifier::Cooldown(x) => format!("Cooldown x{x:.2}"),
            Modifier::Area(x) => format!("Area x{x:.2}"),
            Modifier::Duration(x) => format!("Duration x{x:.2}"),
            Modifier::Projectiles(n) => format!("+{n} projectile(s)"),
            Modifier::Pierce(n) => format!("+{n} pierce"),
            Modifier::Directions(n) => format!("+{n} direction(s)"),
            Modifier::ChainHops(n) => format!("+{n} chain"),
            Modifier::Targets(n) => format!("+{n} target(s)"),
            Modifier::Slow(x) => format!("Slow +{:.0}%", x * 100.0),
            Modifier::FreezeChance(x) => format!("{:.0}% freeze chance", x * 100.0),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::MAX_WEAPON_LEVEL;

    #[test]
    fn test_every_weapon_has_every_level() {
        for kind in WeaponKind::ALL {
            assert!(level_modifiers(kind, 1).is_empty());
            for level in 2..=MAX_WEAPON_LEVEL {
                assert!(
                    !level_modifiers(kind, level).is_empty(),
                    "{kind:?} has no modifiers at level {level}"
                );
            }
            assert!(level_modifiers(kind, MAX_WEAPON_LEVEL + 1).is_empty());
        }
    }

    #[test]
    fn test_describe_level() {
        let lines = describe_level(WeaponKind::Lance, 5);
        assert_eq!(lines, vec!["+2 pierce".to_string(), "Damage x1.25".to_string()]);
    }
}
