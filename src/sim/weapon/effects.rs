//! Transient projectiles and area effects owned by weapons
//!
//! Each variant advances itself, checks the arena bounds and obstacles the
//! way its weapon dictates, then resolves hits. `update` returns false once
//! the effect should be dropped.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::{CombatContext, OwnerStats, nearest_enemy, strike_enemies, strike_props};
use crate::consts::OFFSCREEN_MARGIN;
use crate::sim::collision::{HitShape, blocking_obstacle_at};
use crate::sim::enemy::Enemy;
use crate::{in_arena, normalize_angle, polar_to_cartesian};

/// Freeze applied by a successful freeze roll
pub const FREEZE_DURATION: f32 = 1.5;

pub const SEEKER_MAX_SPEED: f32 = 300.0;
/// Fraction of the velocity error corrected per second
pub const SEEKER_TURN_RATE: f32 = 4.0;

pub const BLADE_RADIUS: f32 = 10.0;
pub const BLADE_HALF_ARC: f32 = 0.3;
/// Radians per second
pub const ORBIT_ANGULAR_SPEED: f32 = 3.0;
/// Seconds of continuous overlap that deal one full hit of damage
pub const ORBIT_DAMAGE_PERIOD: f32 = 0.5;

/// Half-thickness of the pulse's leading edge
pub const PULSE_BAND: f32 = 12.0;
pub const PULSE_KNOCKBACK: f32 = 40.0;

pub const BOOMERANG_MAX_LIFETIME: f32 = 3.0;
pub const BOOMERANG_CATCH_RADIUS: f32 = 20.0;

pub const POOL_TICK_INTERVAL: f32 = 0.5;
pub const POOL_POISON_DURATION: f32 = 2.0;

/// On-hit slow, optionally escalating to a freeze
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Chill {
    pub amount: f32,
    pub duration: f32,
    pub freeze_chance: f32,
}

impl Chill {
    fn apply(&self, enemy: &mut Enemy, rng: &mut Pcg32) {
        enemy.body.status.apply_slow(self.amount, self.duration);
        if self.freeze_chance > 0.0 && rng.random::<f32>() < self.freeze_chance {
            enemy.body.status.apply_freeze(FREEZE_DURATION);
        }
    }
}

/// Straight-flying projectile with a pierce budget
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub lifetime: f32,
    /// Remaining hits before retiring
    pub pierce: u32,
    pub chill: Option<Chill>,
    pub hit: Vec<u32>,
}

impl Projectile {
    fn update(&mut self, dt: f32, ctx: &mut CombatContext) -> bool {
        self.pos += self.vel * dt;
        self.lifetime -= dt;
        if self.lifetime <= 0.0 || !in_arena(self.pos, OFFSCREEN_MARGIN) {
            return false;
        }
        if let Some(i) = blocking_obstacle_at(ctx.obstacles, self.pos, self.radius) {
            ctx.obstacles[i].apply_damage(self.damage);
            return false;
        }

        let shape = HitShape::Circle {
            center: self.pos,
            radius: self.radius,
        };
        let props = strike_props(&shape, self.damage, &mut self.hit, ctx.containers, ctx.items);
        self.pierce = self.pierce.saturating_sub(props);
        if self.pierce == 0 {
            return false;
        }

        let struck = strike_enemies(&shape, self.damage, &mut self.hit, ctx.enemies, self.pierce);
        if let Some(chill) = self.chill {
            for &i in &struck {
                chill.apply(&mut ctx.enemies[i], ctx.rng);
            }
        }
        self.pierce = self.pierce.saturating_sub(struck.len() as u32);
        self.pierce > 0
    }
}

/// Homing missile; retires on its first hit
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seeker {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub damage: f32,
    pub lifetime: f32,
    /// Enemy id being chased
    pub target: Option<u32>,
}

impl Seeker {
    fn target_pos(&self, enemies: &[Enemy]) -> Option<Vec2> {
        let id = self.target?;
        enemies
            .iter()
            .find(|e| e.id == id && !e.body.is_dead())
            .map(|e| e.body.pos)
    }

    fn update(&mut self, dt: f32, ctx: &mut CombatContext) -> bool {
        let mut target = self.target_pos(ctx.enemies);
        if target.is_none() {
            self.target = nearest_enemy(ctx.enemies, self.pos).map(|i| ctx.enemies[i].id);
            target = self.target_pos(ctx.enemies);
        }
        if let Some(target) = target {
            let desired = (target - self.pos).normalize_or_zero() * SEEKER_MAX_SPEED;
            self.vel += (desired - self.vel) * (SEEKER_TURN_RATE * dt).min(1.0);
            self.vel = self.vel.clamp_length_max(SEEKER_MAX_SPEED);
        }

        self.pos += self.vel * dt;
        self.lifetime -= dt;
        if self.lifetime <= 0.0 || !in_arena(self.pos, OFFSCREEN_MARGIN) {
            return false;
        }
        if let Some(i) = blocking_obstacle_at(ctx.obstacles, self.pos, self.radius) {
            ctx.obstacles[i].apply_damage(self.damage);
            return false;
        }

        let shape = HitShape::Circle {
            center: self.pos,
            radius: self.radius,
        };
        let mut hit = Vec::new();
        if strike_props(&shape, self.damage, &mut hit, ctx.containers, ctx.items) > 0 {
            return false;
        }
        strike_enemies(&shape, self.damage, &mut hit, ctx.enemies, 1).is_empty()
    }
}

/// Visual trace of an instant melee swing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Swing {
    pub origin: Vec2,
    pub facing: f32,
    pub range: f32,
    pub half_arc: f32,
    pub lifetime: f32,
}

/// Visual trace of an instant lightning chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lightning {
    pub points: Vec<Vec2>,
    pub lifetime: f32,
}

/// One blade of an orbiting set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Blade {
    pub index: u32,
    pub count: u32,
    /// Shared rotation phase of the whole set
    pub angle: f32,
    pub orbit_radius: f32,
    pub damage: f32,
    pub pos: Vec2,
}

impl Blade {
    /// Angle of this blade around the owner
    pub fn phase(&self) -> f32 {
        normalize_angle(self.angle + self.index as f32 * TAU / self.count.max(1) as f32)
    }

    fn update(&mut self, dt: f32, owner: &OwnerStats, ctx: &mut CombatContext) -> bool {
        self.angle = normalize_angle(self.angle + ORBIT_ANGULAR_SPEED * dt);
        let phase = self.phase();
        self.pos = owner.pos + polar_to_cartesian(self.orbit_radius, phase);

        let shape = HitShape::Sector {
            origin: owner.pos,
            facing: phase,
            range: self.orbit_radius + BLADE_RADIUS,
            half_arc: BLADE_HALF_ARC,
        };
        let damage = self.damage * dt / ORBIT_DAMAGE_PERIOD;
        // Rate-based damage: every overlapping target is hit every tick
        strike_enemies(&shape, damage, &mut Vec::new(), ctx.enemies, u32::MAX);
        strike_props(&shape, damage, &mut Vec::new(), ctx.containers, ctx.items);
        true
    }
}

/// Fixed line hitting everything it crosses once during its lifetime
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beam {
    pub start: Vec2,
    pub end: Vec2,
    pub half_width: f32,
    pub damage: f32,
    pub lifetime: f32,
    pub hit: Vec<u32>,
}

impl Beam {
    fn update(&mut self, dt: f32, ctx: &mut CombatContext) -> bool {
        let shape = HitShape::Segment {
            start: self.start,
            end: self.end,
            half_width: self.half_width,
        };
        strike_enemies(&shape, self.damage, &mut self.hit, ctx.enemies, u32::MAX);
        strike_props(&shape, self.damage, &mut self.hit, ctx.containers, ctx.items);
        self.lifetime -= dt;
        self.lifetime > 0.0
    }
}

/// Ring expanding from zero to `max_radius` over `lifetime`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pulse {
    pub center: Vec2,
    pub radius: f32,
    pub max_radius: f32,
    pub elapsed: f32,
    pub lifetime: f32,
    pub damage: f32,
    pub hit: Vec<u32>,
}

impl Pulse {
    fn update(&mut self, dt: f32, ctx: &mut CombatContext) -> bool {
        let prev = self.radius;
        self.elapsed += dt;
        self.radius = self.max_radius * (self.elapsed / self.lifetime).min(1.0);

        let shape = HitShape::Ring {
            center: self.center,
            inner: (prev - PULSE_BAND).max(0.0),
            outer: self.radius + PULSE_BAND,
        };
        for i in strike_enemies(&shape, self.damage, &mut self.hit, ctx.enemies, u32::MAX) {
            let enemy = &mut ctx.enemies[i];
            if !enemy.kind.is_elite() {
                enemy.body.pos += (enemy.body.pos - self.center).normalize_or_zero() * PULSE_KNOCKBACK;
            }
        }
        strike_props(&shape, self.damage, &mut self.hit, ctx.containers, ctx.items);
        self.elapsed < self.lifetime
    }
}

/// Out-and-back projectile; hits each enemy at most once per leg
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boomerang {
    pub pos: Vec2,
    pub dir: Vec2,
    pub speed: f32,
    pub radius: f32,
    pub damage: f32,
    pub traveled: f32,
    pub max_distance: f32,
    pub returning: bool,
    pub age: f32,
    pub hit: Vec<u32>,
}

impl Boomerang {
    fn turn_back(&mut self) {
        self.returning = true;
        self.hit.clear();
    }

    fn update(&mut self, dt: f32, owner: &OwnerStats, ctx: &mut CombatContext) -> bool {
        self.age += dt;
        if self.age >= BOOMERANG_MAX_LIFETIME {
            return false;
        }

        let step = self.speed * dt;
        if self.returning {
            let to_owner = owner.pos - self.pos;
            if to_owner.length() <= step.max(BOOMERANG_CATCH_RADIUS) {
                return false;
            }
            self.pos += to_owner.normalize_or_zero() * step;
        } else {
            self.pos += self.dir * step;
            self.traveled += step;
            if self.traveled >= self.max_distance
                || blocking_obstacle_at(ctx.obstacles, self.pos, self.radius).is_some()
            {
                self.turn_back();
            }
        }

        let shape = HitShape::Circle {
            center: self.pos,
            radius: self.radius,
        };
        strike_enemies(&shape, self.damage, &mut self.hit, ctx.enemies, u32::MAX);
        strike_props(&shape, self.damage, &mut self.hit, ctx.containers, ctx.items);
        true
    }
}

/// Stationary area re-applying poison on a fixed interval
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pool {
    pub pos: Vec2,
    pub radius: f32,
    pub lifetime: f32,
    pub tick_timer: f32,
    /// Poison damage per poison tick
    pub poison_damage: f32,
}

impl Pool {
    fn update(&mut self, dt: f32, ctx: &mut CombatContext) -> bool {
        self.tick_timer -= dt;
        if self.tick_timer <= 0.0 {
            self.tick_timer += POOL_TICK_INTERVAL;
            let shape = HitShape::Circle {
                center: self.pos,
                radius: self.radius,
            };
            for enemy in ctx.enemies.iter_mut().filter(|e| !e.body.is_dead()) {
                if shape.hits(enemy.body.pos, enemy.body.radius) {
                    enemy.body.status.apply_poison(self.poison_damage, POOL_POISON_DURATION);
                }
            }
            // Props take each poison tick's damage directly
            strike_props(&shape, self.poison_damage, &mut Vec::new(), ctx.containers, ctx.items);
        }
        self.lifetime -= dt;
        self.lifetime > 0.0
    }
}

/// Anything a weapon leaves in the world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Effect {
    Projectile(Projectile),
    Seeker(Seeker),
    Swing(Swing),
    Lightning(Lightning),
    Blade(Blade),
    Beam(Beam),
    Pulse(Pulse),
    Boomerang(Boomerang),
    Pool(Pool),
}

impl Effect {
    /// Advance one step; false means the effect is spent
    pub fn update(&mut self, dt: f32, owner: &OwnerStats, ctx: &mut CombatContext) -> bool {
        match self {
            Effect::Projectile(p) => p.update(dt, ctx),
            Effect::Seeker(s) => s.update(dt, ctx),
            Effect::Swing(Swing { lifetime, .. }) | Effect::Lightning(Lightning { lifetime, .. }) => {
                *lifetime -= dt;
                *lifetime > 0.0
            }
            Effect::Blade(b) => b.update(dt, owner, ctx),
            Effect::Beam(b) => b.update(dt, ctx),
            Effect::Pulse(p) => p.update(dt, ctx),
            Effect::Boomerang(b) => b.update(dt, owner, ctx),
            Effect::Pool(p) => p.update(dt, ctx),
        }
    }

    /// What a renderer needs to draw this effect
    pub fn view(&self) -> EffectView {
        match self {
            Effect::Projectile(p) => EffectView::Projectile {
                pos: p.pos,
                radius: p.radius,
                chilled: p.chill.is_some(),
            },
            Effect::Seeker(s) => EffectView::Projectile {
                pos: s.pos,
                radius: s.radius,
                chilled: false,
            },
            Effect::Swing(s) => EffectView::Arc {
                origin: s.origin,
                facing: s.facing,
                range: s.range,
                half_arc: s.half_arc,
            },
            Effect::Lightning(l) => EffectView::Chain {
                points: l.points.clone(),
            },
            Effect::Blade(b) => EffectView::Blade {
                pos: b.pos,
                radius: BLADE_RADIUS,
            },
            Effect::Beam(b) => EffectView::Beam {
                start: b.start,
                end: b.end,
                half_width: b.half_width,
            },
            Effect::Pulse(p) => EffectView::Ring {
                center: p.center,
                radius: p.radius,
            },
            Effect::Boomerang(b) => EffectView::Blade {
                pos: b.pos,
                radius: b.radius,
            },
            Effect::Pool(p) => EffectView::Pool {
                pos: p.pos,
                radius: p.radius,
            },
        }
    }
}

/// Render-facing description of a live effect
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum EffectView {
    Projectile { pos: Vec2, radius: f32, chilled: bool },
    Blade { pos: Vec2, radius: f32 },
    Arc { origin: Vec2, facing: f32, range: f32, half_arc: f32 },
    Chain { points: Vec<Vec2> },
    Beam { start: Vec2, end: Vec2, half_width: f32 },
    Ring { center: Vec2, radius: f32 },
    Pool { pos: Vec2, radius: f32 },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::{EnemyKind, EnemyScaling};
    use crate::sim::item::{ChestTier, Item};
    use crate::sim::obstacle::{CONTAINER_HEALTH, Container, Obstacle, ObstacleKind};
    use rand::SeedableRng;

    fn grunt(id: u32, x: f32, y: f32) -> Enemy {
        Enemy::new(id, EnemyKind::Grunt, Vec2::new(x, y), EnemyScaling::default())
    }

    fn run(effect: &mut Effect, enemies: &mut [Enemy], obstacles: &mut [Obstacle], steps: usize) -> bool {
        let mut rng = Pcg32::seed_from_u64(9);
        let owner = OwnerStats {
            pos: Vec2::new(100.0, 360.0),
            ..Default::default()
        };
        let mut alive = true;
        for _ in 0..steps {
            let mut ctx = CombatContext {
                enemies: &mut *enemies,
                obstacles: &mut *obstacles,
                containers: &mut [],
                items: &mut [],
                rng: &mut rng,
            };
            alive = effect.update(1.0 / 60.0, &owner, &mut ctx);
            if !alive {
                break;
            }
        }
        alive
    }

    fn bolt(pierce: u32) -> Effect {
        Effect::Projectile(Projectile {
            pos: Vec2::new(100.0, 360.0),
            vel: Vec2::new(400.0, 0.0),
            radius: 6.0,
            damage: 5.0,
            lifetime: 2.0,
            pierce,
            chill: None,
            hit: vec![],
        })
    }

    #[test]
    fn test_projectile_pierce_budget() {
        let mut enemies = vec![grunt(1, 200.0, 360.0), grunt(2, 260.0, 360.0), grunt(3, 320.0, 360.0)];
        let mut effect = bolt(2);
        assert!(!run(&mut effect, &mut enemies, &mut [], 120));
        assert!(enemies[0].body.health() < enemies[0].body.max_health);
        assert!(enemies[1].body.health() < enemies[1].body.max_health);
        assert_eq!(enemies[2].body.health(), enemies[2].body.max_health);
    }

    #[test]
    fn test_projectile_never_double_hits() {
        // A slow bolt overlaps the same enemy for many ticks
        let mut enemies = vec![grunt(1, 130.0, 360.0)];
        let mut effect = Effect::Projectile(Projectile {
            vel: Vec2::new(30.0, 0.0),
            ..match bolt(5) {
                Effect::Projectile(p) => p,
                _ => unreachable!(),
            }
        });
        run(&mut effect, &mut enemies, &mut [], 60);
        assert_eq!(enemies[0].body.health(), enemies[0].body.max_health - 5.0);
    }

    #[test]
    fn test_projectile_breaks_on_pillar() {
        let mut obstacles = vec![Obstacle::new(1, ObstacleKind::Pillar, Vec2::new(200.0, 360.0), 20.0)];
        let mut enemies = vec![grunt(1, 300.0, 360.0)];
        let mut effect = bolt(1);
        assert!(!run(&mut effect, &mut enemies, &mut obstacles, 120));
        assert_eq!(obstacles[0].health, Some(55.0));
        assert_eq!(enemies[0].body.health(), enemies[0].body.max_health);
    }

    #[test]
    fn test_seeker_retargets_when_target_dies() {
        let mut enemies = vec![grunt(1, 200.0, 360.0), grunt(2, 100.0, 600.0)];
        let mut effect = Effect::Seeker(Seeker {
            pos: Vec2::new(100.0, 360.0),
            vel: Vec2::new(100.0, 0.0),
            radius: 6.0,
            damage: 5.0,
            lifetime: 4.0,
            target: Some(1),
        });
        run(&mut effect, &mut enemies, &mut [], 1);
        enemies[0].body.kill();
        run(&mut effect, &mut enemies, &mut [], 1);
        let Effect::Seeker(seeker) = &effect else {
            unreachable!()
        };
        assert_eq!(seeker.target, Some(2));
        // Now bending toward the new target below
        assert!(seeker.vel.y > 0.0);
    }

    #[test]
    fn test_seeker_retires_on_first_hit() {
        let mut enemies = vec![grunt(1, 200.0, 360.0), grunt(2, 205.0, 360.0)];
        let mut effect = Effect::Seeker(Seeker {
            pos: Vec2::new(100.0, 360.0),
            vel: Vec2::new(300.0, 0.0),
            radius: 6.0,
            damage: 5.0,
            lifetime: 4.0,
            target: Some(1),
        });
        assert!(!run(&mut effect, &mut enemies, &mut [], 120));
        let damaged = enemies
            .iter()
            .filter(|e| e.body.health() < e.body.max_health)
            .count();
        assert_eq!(damaged, 1);
    }

    #[test]
    fn test_pulse_hits_once_and_knocks_back() {
        let mut enemies = vec![grunt(1, 160.0, 360.0)];
        let mut effect = Effect::Pulse(Pulse {
            center: Vec2::new(100.0, 360.0),
            radius: 0.0,
            max_radius: 150.0,
            elapsed: 0.0,
            lifetime: 0.6,
            damage: 4.0,
            hit: vec![],
        });
        assert!(!run(&mut effect, &mut enemies, &mut [], 60));
        assert_eq!(enemies[0].body.health(), enemies[0].body.max_health - 4.0);
        assert!((enemies[0].body.pos.x - (160.0 + PULSE_KNOCKBACK)).abs() < 1e-3);
    }

    #[test]
    fn test_boomerang_bounces_off_rock_and_hits_each_leg() {
        let mut obstacles = vec![Obstacle::new(1, ObstacleKind::Rock, Vec2::new(260.0, 360.0), 20.0)];
        let mut enemies = vec![grunt(1, 180.0, 360.0)];
        let mut effect = Effect::Boomerang(Boomerang {
            pos: Vec2::new(100.0, 360.0),
            dir: Vec2::X,
            speed: 350.0,
            radius: 10.0,
            damage: 3.0,
            traveled: 0.0,
            max_distance: 250.0,
            returning: false,
            age: 0.0,
            hit: vec![],
        });
        assert!(!run(&mut effect, &mut enemies, &mut obstacles, 180));
        assert_eq!(enemies[0].body.health(), enemies[0].body.max_health - 6.0);
    }

    #[test]
    fn test_pool_poisons_overlapping_enemies() {
        let mut enemies = vec![grunt(1, 100.0, 360.0), grunt(2, 400.0, 360.0)];
        let mut effect = Effect::Pool(Pool {
            pos: Vec2::new(100.0, 360.0),
            radius: 50.0,
            lifetime: 4.0,
            tick_timer: 0.0,
            poison_damage: 2.0,
        });
        run(&mut effect, &mut enemies, &mut [], 1);
        assert!(enemies[0].body.status.is_poisoned());
        assert!(!enemies[1].body.status.is_poisoned());
    }

    #[test]
    fn test_beam_hits_each_enemy_once_per_lifetime() {
        let mut enemies = vec![grunt(1, 200.0, 360.0), grunt(2, 300.0, 360.0), grunt(3, 300.0, 500.0)];
        let mut effect = Effect::Beam(Beam {
            start: Vec2::new(100.0, 360.0),
            end: Vec2::new(500.0, 360.0),
            half_width: 6.0,
            damage: 5.0,
            lifetime: 0.5,
            hit: vec![],
        });
        // Both enemies sit on the line for every tick of the beam
        assert!(!run(&mut effect, &mut enemies, &mut [], 60));
        assert_eq!(enemies[0].body.health(), enemies[0].body.max_health - 5.0);
        assert_eq!(enemies[1].body.health(), enemies[1].body.max_health - 5.0);
        assert_eq!(enemies[2].body.health(), enemies[2].body.max_health);
    }

    #[test]
    fn test_blade_damage_scales_with_overlap_time() {
        let owner = Vec2::new(100.0, 360.0);
        let dt = 1.0 / 60.0;
        // Where the blade points after its first step
        let at = owner + polar_to_cartesian(70.0, ORBIT_ANGULAR_SPEED * dt);
        let mut enemies = vec![grunt(1, at.x, at.y)];
        let mut effect = Effect::Blade(Blade {
            index: 0,
            count: 1,
            angle: 0.0,
            orbit_radius: 70.0,
            damage: 10.0,
            pos: owner,
        });
        let per_tick = 10.0 * dt / ORBIT_DAMAGE_PERIOD;

        assert!(run(&mut effect, &mut enemies, &mut [], 1));
        let loss = enemies[0].body.max_health - enemies[0].body.health();
        assert!((loss - per_tick).abs() < 1e-4);

        // Still inside the arc for five more ticks
        run(&mut effect, &mut enemies, &mut [], 5);
        let loss = enemies[0].body.max_health - enemies[0].body.health();
        assert!((loss - 6.0 * per_tick).abs() < 1e-3);
    }

    #[test]
    fn test_pool_tick_damages_containers() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut containers = vec![Container::new(5, Vec2::new(110.0, 360.0))];
        let mut effect = Effect::Pool(Pool {
            pos: Vec2::new(100.0, 360.0),
            radius: 50.0,
            lifetime: 4.0,
            tick_timer: 0.0,
            poison_damage: CONTAINER_HEALTH,
        });
        let mut ctx = CombatContext {
            enemies: &mut [],
            obstacles: &mut [],
            containers: &mut containers,
            items: &mut [],
            rng: &mut rng,
        };
        effect.update(1.0 / 60.0, &OwnerStats::default(), &mut ctx);
        assert!(containers[0].is_broken());
    }

    #[test]
    fn test_seeker_retires_on_opening_chest() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut items = vec![Item::chest(5, Vec2::new(140.0, 360.0), ChestTier::Common)];
        let mut effect = Effect::Seeker(Seeker {
            pos: Vec2::new(100.0, 360.0),
            vel: Vec2::new(200.0, 0.0),
            radius: 6.0,
            damage: 5.0,
            lifetime: 4.0,
            target: None,
        });
        let mut alive = true;
        for _ in 0..60 {
            let mut ctx = CombatContext {
                enemies: &mut [],
                obstacles: &mut [],
                containers: &mut [],
                items: &mut items,
                rng: &mut rng,
            };
            alive = effect.update(1.0 / 60.0, &OwnerStats::default(), &mut ctx);
            if !alive {
                break;
            }
        }
        assert!(!alive);
        assert!(!items[0].is_closed_chest());
        let Effect::Seeker(seeker) = &effect else {
            unreachable!()
        };
        assert!(seeker.pos.x < 150.0);
    }

    #[test]
    fn test_chill_slows_and_certain_freeze() {
        let mut enemies = vec![grunt(1, 200.0, 360.0)];
        let mut effect = Effect::Projectile(Projectile {
            chill: Some(Chill {
                amount: 0.4,
                duration: 2.0,
                freeze_chance: 1.0,
            }),
            ..match bolt(1) {
                Effect::Projectile(p) => p,
                _ => unreachable!(),
            }
        });
        run(&mut effect, &mut enemies, &mut [], 60);
        assert!(enemies[0].body.status.is_slowed());
        assert!(enemies[0].body.status.is_frozen());
    }
}
