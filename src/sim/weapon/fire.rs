//! Per-kind firing
//!
//! Instant weapons (slash, chain lightning) resolve their hits here and leave
//! only a visual trace behind. Everything else spawns effects that resolve
//! their own hits as they update.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use rand::Rng;

use super::effects::{
    Beam, Blade, Boomerang, Chill, Effect, Lightning, Pool, Projectile, Pulse, Seeker, Swing,
};
use super::{
    CombatContext, OwnerStats, Weapon, WeaponKind, nearest_enemy, nearest_enemy_excluding,
    random_enemies, strike_enemies, strike_props,
};
use crate::sim::collision::HitShape;
use crate::{heading, normalize_angle, polar_to_cartesian};

const BOLT_SPEED: f32 = 420.0;
const BOLT_RADIUS: f32 = 6.0;
const BOLT_LIFETIME: f32 = 2.0;
/// Angle between sibling projectiles of one volley
const BOLT_SPREAD: f32 = 0.15;

const SLASH_RANGE: f32 = 90.0;
const SLASH_HALF_ARC: f32 = PI / 3.0;
/// Offsets from the facing angle, unlocked one per direction
const SLASH_OFFSETS: [f32; 4] = [0.0, PI, FRAC_PI_2, -FRAC_PI_2];
const FLASH_LIFETIME: f32 = 0.15;

const CHAIN_RADIUS: f32 = 150.0;
/// Damage multiplier applied per hop
const CHAIN_FALLOFF: f32 = 0.6;
/// Props within this distance of an arc are struck by it
const CHAIN_ARC_HALF_WIDTH: f32 = 8.0;

const LANCE_SPEED: f32 = 500.0;
const LANCE_RADIUS: f32 = 8.0;
const LANCE_LIFETIME: f32 = 2.0;

const ORBIT_RADIUS: f32 = 70.0;

const BEAM_LENGTH: f32 = 420.0;
const BEAM_HALF_WIDTH: f32 = 6.0;
const BEAM_DURATION: f32 = 0.5;

const SCATTER_HALF_CONE: f32 = 0.3;
const SCATTER_SPEED: f32 = 380.0;
const SCATTER_RADIUS: f32 = 4.0;
const SCATTER_LIFETIME: f32 = 0.6;

const SEEKER_LAUNCH_SPEED: f32 = 180.0;
const SEEKER_RADIUS: f32 = 7.0;
const SEEKER_LIFETIME: f32 = 4.0;

const FROST_SLOW_DURATION: f32 = 2.0;

const NOVA_RADIUS: f32 = 150.0;
const NOVA_LIFETIME: f32 = 0.6;

const BOOMERANG_SPEED: f32 = 350.0;
const BOOMERANG_RADIUS: f32 = 10.0;
const BOOMERANG_RANGE: f32 = 250.0;
const BOOMERANG_SPREAD: f32 = 0.3;

const POOL_RADIUS: f32 = 50.0;
const POOL_LIFETIME: f32 = 4.0;

/// Angles of a volley of `count` centered on `aim`
fn fan(aim: f32, count: u32, step: f32) -> impl Iterator<Item = f32> {
    let half = (count.max(1) as f32 - 1.0) / 2.0;
    (0..count.max(1)).map(move |i| aim + (i as f32 - half) * step)
}

/// `count` blades evenly spaced around `center`, sharing one rotation phase
pub fn blade_set(count: u32, angle: f32, orbit_radius: f32, damage: f32, center: Vec2) -> Vec<Effect> {
    (0..count)
        .map(|index| {
            let mut blade = Blade {
                index,
                count,
                angle,
                orbit_radius,
                damage,
                pos: center,
            };
            blade.pos = center + polar_to_cartesian(orbit_radius, blade.phase());
            Effect::Blade(blade)
        })
        .collect()
}

/// Aim angle from the owner to the nearest live enemy, else the facing
fn aim_at_nearest(owner: &OwnerStats, ctx: &CombatContext) -> f32 {
    nearest_enemy(ctx.enemies, owner.pos)
        .map(|i| heading(ctx.enemies[i].body.pos - owner.pos))
        .unwrap_or_else(|| heading(owner.facing))
}

pub fn fire(weapon: &mut Weapon, owner: &OwnerStats, ctx: &mut CombatContext) {
    let damage = weapon.effective_damage(owner);
    let area = weapon.area(owner);
    let stats = weapon.stats.clone();
    log::trace!("{:?} L{} firing", weapon.kind, weapon.level);

    match weapon.kind {
        WeaponKind::MagicBolt | WeaponKind::Lance | WeaponKind::FrostBolt => {
            let (speed, radius, lifetime) = match weapon.kind {
                WeaponKind::Lance => (LANCE_SPEED, LANCE_RADIUS, LANCE_LIFETIME),
                _ => (BOLT_SPEED, BOLT_RADIUS, BOLT_LIFETIME),
            };
            let chill = (weapon.kind == WeaponKind::FrostBolt).then(|| Chill {
                amount: stats.slow_amount,
                duration: FROST_SLOW_DURATION * stats.duration_mult,
                freeze_chance: stats.freeze_chance,
            });
            let aim = aim_at_nearest(owner, ctx);
            for theta in fan(aim, stats.projectiles, BOLT_SPREAD) {
                weapon.effects.push(Effect::Projectile(Projectile {
                    pos: owner.pos,
                    vel: polar_to_cartesian(speed, theta),
                    radius: radius * area,
                    damage,
                    lifetime,
                    pierce: stats.pierce,
                    chill,
                    hit: Vec::new(),
                }));
            }
        }
        WeaponKind::Scatter => {
            let aim = aim_at_nearest(owner, ctx);
            for _ in 0..stats.projectiles {
                let theta = aim + ctx.rng.random_range(-SCATTER_HALF_CONE..=SCATTER_HALF_CONE);
                weapon.effects.push(Effect::Projectile(Projectile {
                    pos: owner.pos,
                    vel: polar_to_cartesian(SCATTER_SPEED, theta),
                    radius: SCATTER_RADIUS * area,
                    damage,
                    lifetime: SCATTER_LIFETIME * stats.duration_mult,
                    pierce: stats.pierce,
                    chill: None,
                    hit: Vec::new(),
                }));
            }
        }
        WeaponKind::Seeker => {
            let aim = aim_at_nearest(owner, ctx);
            let target = nearest_enemy(ctx.enemies, owner.pos).map(|i| ctx.enemies[i].id);
            for theta in fan(aim, stats.projectiles, BOLT_SPREAD * 2.0) {
                weapon.effects.push(Effect::Seeker(Seeker {
                    pos: owner.pos,
                    vel: polar_to_cartesian(SEEKER_LAUNCH_SPEED, theta),
                    radius: SEEKER_RADIUS,
                    damage,
                    lifetime: SEEKER_LIFETIME,
                    target,
                }));
            }
        }
        WeaponKind::Slash => {
            let facing = heading(owner.facing);
            let range = SLASH_RANGE * area;
            // One swing never hits the same target twice, even where arcs overlap
            let mut hit = Vec::new();
            for offset in SLASH_OFFSETS.iter().take(stats.directions as usize) {
                let facing = normalize_angle(facing + offset);
                let shape = HitShape::Sector {
                    origin: owner.pos,
                    facing,
                    range,
                    half_arc: SLASH_HALF_ARC,
                };
                strike_enemies(&shape, damage, &mut hit, ctx.enemies, u32::MAX);
                strike_props(&shape, damage, &mut hit, ctx.containers, ctx.items);
                weapon.effects.push(Effect::Swing(Swing {
                    origin: owner.pos,
                    facing,
                    range,
                    half_arc: SLASH_HALF_ARC,
                    lifetime: FLASH_LIFETIME,
                }));
            }
        }
        WeaponKind::ChainLightning => {
            let mut hit = Vec::new();
            for primary in random_enemies(ctx.enemies, ctx.rng, stats.targets as usize) {
                let enemy = &mut ctx.enemies[primary];
                if hit.contains(&enemy.id) {
                    continue;
                }
                enemy.body.apply_damage(damage);
                hit.push(enemy.id);
                let mut points = vec![owner.pos, enemy.body.pos];
                let mut from = enemy.body.pos;
                let mut hop_damage = damage;
                for _ in 0..stats.chain_hops {
                    hop_damage *= CHAIN_FALLOFF;
                    let Some(next) = nearest_enemy_excluding(ctx.enemies, from, CHAIN_RADIUS * area, &hit)
                    else {
                        break;
                    };
                    let enemy = &mut ctx.enemies[next];
                    enemy.body.apply_damage(hop_damage);
                    hit.push(enemy.id);
                    from = enemy.body.pos;
                    points.push(from);
                }
                for arc in points.windows(2) {
                    let shape = HitShape::Segment {
                        start: arc[0],
                        end: arc[1],
                        half_width: CHAIN_ARC_HALF_WIDTH,
                    };
                    strike_props(&shape, damage, &mut hit, ctx.containers, ctx.items);
                }
                weapon.effects.push(Effect::Lightning(Lightning {
                    points,
                    lifetime: FLASH_LIFETIME,
                }));
            }
        }
        WeaponKind::OrbitBlades => {
            let count = stats.projectiles.max(1);
            let orbit_radius = ORBIT_RADIUS * area;
            let blades_match = weapon.effects.len() == count as usize
                && weapon.effects.iter().all(|e| matches!(e, Effect::Blade(_)));
            if blades_match {
                // Existing set keeps spinning; refresh for passive changes
                for effect in &mut weapon.effects {
                    if let Effect::Blade(blade) = effect {
                        blade.damage = damage;
                        blade.orbit_radius = orbit_radius;
                    }
                }
            } else {
                weapon.effects = blade_set(count, 0.0, orbit_radius, damage, owner.pos);
            }
        }
        WeaponKind::Beam => {
            for target in random_enemies(ctx.enemies, ctx.rng, stats.projectiles as usize) {
                let dir = (ctx.enemies[target].body.pos - owner.pos)
                    .try_normalize()
                    .unwrap_or(owner.facing);
                weapon.effects.push(Effect::Beam(Beam {
                    start: owner.pos,
                    end: owner.pos + dir * BEAM_LENGTH * area,
                    half_width: BEAM_HALF_WIDTH * area,
                    damage,
                    lifetime: BEAM_DURATION * stats.duration_mult,
                    hit: Vec::new(),
                }));
            }
        }
        WeaponKind::Nova => {
            weapon.effects.push(Effect::Pulse(Pulse {
                center: owner.pos,
                radius: 0.0,
                max_radius: NOVA_RADIUS * area,
                elapsed: 0.0,
                lifetime: NOVA_LIFETIME,
                damage,
                hit: Vec::new(),
            }));
        }
        WeaponKind::Boomerang => {
            let aim = aim_at_nearest(owner, ctx);
            for theta in fan(aim, stats.projectiles, BOOMERANG_SPREAD) {
                weapon.effects.push(Effect::Boomerang(Boomerang {
                    pos: owner.pos,
                    dir: polar_to_cartesian(1.0, theta),
                    speed: BOOMERANG_SPEED,
                    radius: BOOMERANG_RADIUS * area,
                    damage,
                    traveled: 0.0,
                    max_distance: BOOMERANG_RANGE * area,
                    returning: false,
                    age: 0.0,
                    hit: Vec::new(),
                }));
            }
        }
        WeaponKind::PoisonPool => {
            for target in random_enemies(ctx.enemies, ctx.rng, stats.projectiles as usize) {
                weapon.effects.push(Effect::Pool(Pool {
                    pos: ctx.enemies[target].body.pos,
                    radius: POOL_RADIUS * area,
                    lifetime: POOL_LIFETIME * stats.duration_mult,
                    tick_timer: 0.0,
                    poison_damage: damage,
                }));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::angle_between;
    use crate::sim::enemy::{Enemy, EnemyKind, EnemyScaling};
    use crate::sim::obstacle::{CONTAINER_HEALTH, Container};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::TAU;

    fn grunt(id: u32, x: f32, y: f32) -> Enemy {
        Enemy::new(id, EnemyKind::Grunt, Vec2::new(x, y), EnemyScaling::default())
    }

    fn owner() -> OwnerStats {
        OwnerStats {
            pos: Vec2::new(640.0, 360.0),
            ..Default::default()
        }
    }

    fn fire_once(weapon: &mut Weapon, enemies: &mut [Enemy]) {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ctx = CombatContext {
            enemies,
            obstacles: &mut [],
            containers: &mut [],
            items: &mut [],
            rng: &mut rng,
        };
        fire(weapon, &owner(), &mut ctx);
    }

    fn leveled(kind: WeaponKind, level: u32) -> Weapon {
        let mut w = Weapon::new(kind);
        while w.level < level && w.upgrade() {}
        w
    }

    #[test]
    fn test_every_kind_fires_something() {
        for kind in WeaponKind::ALL {
            let mut w = Weapon::new(kind);
            let mut enemies = vec![grunt(1, 700.0, 360.0)];
            fire_once(&mut w, &mut enemies);
            let resolved = !w.effects.is_empty() || enemies[0].body.health() < enemies[0].body.max_health;
            assert!(resolved, "{kind:?} did nothing");
        }
    }

    #[test]
    fn test_magic_bolt_second_projectile_at_level_3() {
        let mut w = leveled(WeaponKind::MagicBolt, 3);
        fire_once(&mut w, &mut [grunt(1, 700.0, 360.0)]);
        assert_eq!(w.effects.len(), 2);
    }

    #[test]
    fn test_magic_bolt_pair_fans_at_fixed_angle() {
        let mut w = leveled(WeaponKind::MagicBolt, 3);
        // Straight to the right of the owner: aim is 0
        fire_once(&mut w, &mut [grunt(1, 700.0, 360.0)]);
        let mut headings: Vec<f32> = w
            .effects
            .iter()
            .map(|e| match e {
                Effect::Projectile(p) => heading(p.vel),
                other => panic!("unexpected effect {other:?}"),
            })
            .collect();
        headings.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(headings.len(), 2);
        assert!((headings[0] + BOLT_SPREAD / 2.0).abs() < 1e-4);
        assert!((headings[1] - BOLT_SPREAD / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_scatter_pellets_stay_in_cone() {
        let mut w = leveled(WeaponKind::Scatter, 5);
        let mut enemies = vec![grunt(1, 640.0, 100.0)];
        let aim = heading(enemies[0].body.pos - owner().pos);
        for seed in 0..10 {
            w.effects.clear();
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut ctx = CombatContext {
                enemies: &mut enemies,
                obstacles: &mut [],
                containers: &mut [],
                items: &mut [],
                rng: &mut rng,
            };
            fire(&mut w, &owner(), &mut ctx);
            assert_eq!(w.effects.len(), w.stats.projectiles as usize);
            for effect in &w.effects {
                let Effect::Projectile(p) = effect else {
                    panic!("scatter should fire projectiles")
                };
                assert!(angle_between(heading(p.vel), aim) <= SCATTER_HALF_CONE + 1e-4);
            }
        }
    }

    #[test]
    fn test_chain_arc_breaks_container_in_its_path() {
        let mut w = Weapon::new(WeaponKind::ChainLightning);
        let mut enemies = vec![grunt(1, 800.0, 360.0)];
        let mut containers = vec![Container::new(2, Vec2::new(720.0, 360.0))];
        let mut rng = Pcg32::seed_from_u64(5);
        let mut ctx = CombatContext {
            enemies: &mut enemies,
            obstacles: &mut [],
            containers: &mut containers,
            items: &mut [],
            rng: &mut rng,
        };
        fire(&mut w, &owner(), &mut ctx);
        let damage = w.effective_damage(&owner());
        assert_eq!(containers[0].health, CONTAINER_HEALTH - damage);
    }

    #[test]
    fn test_slash_back_direction_unlocks_at_level_3() {
        // Owner faces +x; enemy directly behind
        let mut base = Weapon::new(WeaponKind::Slash);
        let mut enemies = vec![grunt(1, 580.0, 360.0)];
        fire_once(&mut base, &mut enemies);
        assert_eq!(enemies[0].body.health(), enemies[0].body.max_health);

        let mut w = leveled(WeaponKind::Slash, 3);
        fire_once(&mut w, &mut enemies);
        assert!(enemies[0].body.health() < enemies[0].body.max_health);
        assert_eq!(w.effects.len(), 2);
    }

    #[test]
    fn test_slash_overlapping_arcs_hit_once() {
        let mut w = leveled(WeaponKind::Slash, 5);
        // Between the forward and up arcs
        let mut enemies = vec![grunt(1, 680.0, 320.0)];
        fire_once(&mut w, &mut enemies);
        let expected = enemies[0].body.max_health - w.effective_damage(&owner());
        assert!((enemies[0].body.health() - expected.max(0.0)).abs() < 1e-3);
    }

    #[test]
    fn test_chain_lightning_hops_with_falloff() {
        let mut w = leveled(WeaponKind::ChainLightning, 2);
        // Boss-sized health so nothing dies
        let mut enemies = vec![
            Enemy::new(1, EnemyKind::Boss, Vec2::new(700.0, 360.0), EnemyScaling::default()),
            Enemy::new(2, EnemyKind::Boss, Vec2::new(780.0, 360.0), EnemyScaling::default()),
        ];
        fire_once(&mut w, &mut enemies);
        let losses: Vec<f32> = enemies
            .iter()
            .map(|e| e.body.max_health - e.body.health())
            .collect();
        let mut sorted = losses.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap());
        let damage = w.effective_damage(&owner());
        assert!((sorted[1] - damage).abs() < 1e-3);
        assert!((sorted[0] - damage * CHAIN_FALLOFF).abs() < 1e-3);
    }

    #[test]
    fn test_orbit_blades_level_5_evenly_spaced() {
        let mut w = leveled(WeaponKind::OrbitBlades, 5);
        fire_once(&mut w, &mut [grunt(1, 900.0, 360.0)]);
        let phases: Vec<f32> = w
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::Blade(b) => Some(b.phase()),
                _ => None,
            })
            .collect();
        assert_eq!(phases.len(), 3);
        for i in 0..3 {
            for j in (i + 1)..3 {
                assert!((angle_between(phases[i], phases[j]) - TAU / 3.0).abs() < 1e-4);
            }
        }

        // Firing again keeps the same set
        fire_once(&mut w, &mut [grunt(1, 900.0, 360.0)]);
        assert_eq!(w.effects.len(), 3);
    }

    #[test]
    fn test_pool_lands_on_enemy() {
        let mut w = Weapon::new(WeaponKind::PoisonPool);
        fire_once(&mut w, &mut [grunt(1, 800.0, 200.0)]);
        match &w.effects[0] {
            Effect::Pool(pool) => assert_eq!(pool.pos, Vec2::new(800.0, 200.0)),
            other => panic!("unexpected effect {other:?}"),
        }
    }

    #[test]
    fn test_frost_bolt_carries_chill() {
        let mut w = leveled(WeaponKind::FrostBolt, 5);
        fire_once(&mut w, &mut [grunt(1, 700.0, 360.0)]);
        assert_eq!(w.effects.len(), 2);
        for effect in &w.effects {
            let Effect::Projectile(p) = effect else {
                panic!("frost bolt should fire projectiles")
            };
            let chill = p.chill.expect("chill");
            assert!((chill.amount - 0.5).abs() < 1e-6);
            assert!((chill.freeze_chance - 0.2).abs() < 1e-6);
        }
    }
}
