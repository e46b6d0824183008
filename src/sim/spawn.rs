//! Spawn director: enemy waves, boss events, stage rotation and containers
//!
//! The director only holds timers and flags. The functions here read and
//! write the collections on `GameState` and draw from its seeded RNG.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind, EnemyScaling};
use super::obstacle::{Container, Obstacle, ObstacleKind};
use super::state::{GameEvent, GameState};
use crate::consts::*;

/// Rejected spawn positions before falling back to an unchecked one
pub const SAFE_SPAWN_ATTEMPTS: usize = 10;
/// Gap kept between a new enemy and any obstacle or container
pub const SPAWN_CLEARANCE: f32 = 24.0;

pub const MINI_BOSS_WINDOW: (f32, f32) = (120.0, 130.0);
/// Boss never arrives earlier than this
pub const MIN_BOSS_TIME: f32 = 30.0;
/// Boss arrives this long before the session ends
pub const BOSS_LEAD_TIME: f32 = 60.0;

/// Spawn rate multiplier gained per stage rotation
pub const STAGE_RATE_GROWTH: f32 = 1.15;
pub const MIN_OBSTACLES: u32 = 5;
pub const MAX_OBSTACLES: u32 = 10;
/// No obstacle is generated within this distance of the player
pub const OBSTACLE_PLAYER_CLEARANCE: f32 = 150.0;
const OBSTACLE_EDGE_MARGIN: f32 = 60.0;
const OBSTACLE_PLACE_ATTEMPTS: usize = 30;

pub const MAX_CONTAINERS: usize = 3;
pub const CONTAINER_INTERVAL: (f32, f32) = (8.0, 15.0);
const CONTAINER_PLAYER_CLEARANCE: f32 = 100.0;

/// Time-keyed spawn state for one session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpawnDirector {
    pub spawn_timer: f32,
    pub container_timer: f32,
    /// Visual stage theme; wraps after the last stage
    pub stage_index: usize,
    /// Stages reached so far, counting the start stage. Never wraps and
    /// gates the late-game enemy pool.
    pub stages_reached: usize,
    /// Time spent in the current stage
    pub stage_time: f32,
    /// Stage was fixed by settings; rotation disabled
    pub stage_pinned: bool,
    pub rate_mult: f32,
    pub boss_time: f32,
    pub mini_boss_spawned: bool,
    pub boss_spawned: bool,
}

impl SpawnDirector {
    pub fn new(duration_secs: f32, start_stage: Option<usize>) -> Self {
        Self {
            spawn_timer: 0.0,
            container_timer: CONTAINER_INTERVAL.0,
            stage_index: start_stage.unwrap_or(0),
            stages_reached: start_stage.unwrap_or(0),
            stage_time: 0.0,
            stage_pinned: start_stage.is_some(),
            rate_mult: 1.0,
            boss_time: boss_time(duration_secs),
            mini_boss_spawned: false,
            boss_spawned: false,
        }
    }
}

impl Default for SpawnDirector {
    fn default() -> Self {
        Self::new(DEFAULT_DURATION_SECS, None)
    }
}

pub fn boss_time(duration_secs: f32) -> f32 {
    (duration_secs - BOSS_LEAD_TIME).max(MIN_BOSS_TIME)
}

/// Normal kinds that may spawn at this point of the session.
///
/// `stages_reached` is the unwrapped stage count, so the pool never shrinks.
pub fn enemy_pool(elapsed: f32, stages_reached: usize) -> &'static [EnemyKind] {
    let count = if elapsed < 60.0 {
        1
    } else if elapsed < 180.0 {
        (2 + ((elapsed - 60.0) / 40.0) as usize).min(4)
    } else {
        (4 + stages_reached).min(EnemyKind::NORMAL.len())
    };
    &EnemyKind::NORMAL[..count]
}

/// Seconds between spawns
pub fn spawn_interval(elapsed: f32, rate_mult: f32) -> f32 {
    let base = if elapsed < 60.0 {
        1.5
    } else if elapsed < 180.0 {
        0.8
    } else {
        0.4
    };
    base / rate_mult.max(1.0)
}

/// Maximum concurrently alive normal enemies
pub fn enemy_cap(elapsed: f32) -> usize {
    match elapsed {
        t if t < 60.0 => 30,
        t if t < 180.0 => 60,
        t if t < 300.0 => 100,
        _ => 150,
    }
}

/// A point on the arena boundary
fn perimeter_point<R: Rng + ?Sized>(rng: &mut R) -> Vec2 {
    match rng.random_range(0..4) {
        0 => Vec2::new(rng.random_range(0.0..ARENA_WIDTH), 0.0),
        1 => Vec2::new(rng.random_range(0.0..ARENA_WIDTH), ARENA_HEIGHT),
        2 => Vec2::new(0.0, rng.random_range(0.0..ARENA_HEIGHT)),
        _ => Vec2::new(ARENA_WIDTH, rng.random_range(0.0..ARENA_HEIGHT)),
    }
}

fn is_clear(pos: Vec2, radius: f32, obstacles: &[Obstacle], containers: &[Container]) -> bool {
    let blocked_by = |center: Vec2, r: f32| pos.distance(center) < r + radius + SPAWN_CLEARANCE;
    !obstacles.iter().any(|o| blocked_by(o.pos, o.radius))
        && !containers.iter().any(|c| blocked_by(c.pos, c.radius))
}

/// Perimeter position clear of obstacles and containers; best effort
pub fn safe_spawn_position(state: &mut GameState, radius: f32) -> Vec2 {
    for _ in 0..SAFE_SPAWN_ATTEMPTS {
        let pos = perimeter_point(&mut state.rng);
        if is_clear(pos, radius, &state.obstacles, &state.containers) {
            return pos;
        }
    }
    log::warn!("No clear spawn position after {SAFE_SPAWN_ATTEMPTS} attempts, spawning unchecked");
    perimeter_point(&mut state.rng)
}

pub fn spawn_enemy(state: &mut GameState, kind: EnemyKind) -> u32 {
    let radius = kind.params().radius;
    let pos = safe_spawn_position(state, radius);
    let id = state.next_entity_id();
    state
        .enemies
        .push(Enemy::new(id, kind, pos, EnemyScaling::at(state.elapsed)));
    id
}

/// Replace the obstacle layout, keeping clear of the player
pub fn regenerate_obstacles(state: &mut GameState) {
    state.obstacles.clear();
    let count = state.rng.random_range(MIN_OBSTACLES..=MAX_OBSTACLES);
    let player_pos = state.player.body.pos;

    for _ in 0..count {
        let kind = match state.rng.random_range(0..10) {
            0..5 => ObstacleKind::Rock,
            5..8 => ObstacleKind::Pillar,
            _ => ObstacleKind::Bramble,
        };
        let radius = state.rng.random_range(20.0..40.0);
        let pos = obstacle_position(state, radius, player_pos);
        let id = state.next_entity_id();
        state.obstacles.push(Obstacle::new(id, kind, pos, radius));
    }
    log::debug!("Generated {} obstacles for stage {}", count, state.director.stage_index);
}

fn obstacle_position(state: &mut GameState, radius: f32, player_pos: Vec2) -> Vec2 {
    let far_enough = |pos: Vec2| pos.distance(player_pos) >= OBSTACLE_PLAYER_CLEARANCE + radius;
    for _ in 0..OBSTACLE_PLACE_ATTEMPTS {
        let pos = Vec2::new(
            state
                .rng
                .random_range(OBSTACLE_EDGE_MARGIN..ARENA_WIDTH - OBSTACLE_EDGE_MARGIN),
            state
                .rng
                .random_range(OBSTACLE_EDGE_MARGIN..ARENA_HEIGHT - OBSTACLE_EDGE_MARGIN),
        );
        let overlaps = state
            .obstacles
            .iter()
            .any(|o| pos.distance(o.pos) < o.radius + radius);
        if far_enough(pos) && !overlaps {
            return pos;
        }
    }
    // Corner furthest from the player always satisfies the clearance
    [
        Vec2::new(OBSTACLE_EDGE_MARGIN, OBSTACLE_EDGE_MARGIN),
        Vec2::new(ARENA_WIDTH - OBSTACLE_EDGE_MARGIN, OBSTACLE_EDGE_MARGIN),
        Vec2::new(OBSTACLE_EDGE_MARGIN, ARENA_HEIGHT - OBSTACLE_EDGE_MARGIN),
        Vec2::new(
            ARENA_WIDTH - OBSTACLE_EDGE_MARGIN,
            ARENA_HEIGHT - OBSTACLE_EDGE_MARGIN,
        ),
    ]
    .into_iter()
    .max_by(|a, b| {
        a.distance_squared(player_pos)
            .partial_cmp(&b.distance_squared(player_pos))
            .unwrap_or(std::cmp::Ordering::Equal)
    })
    .unwrap_or(Vec2::ZERO)
}

fn spawn_container(state: &mut GameState) {
    let player_pos = state.player.body.pos;
    for _ in 0..SAFE_SPAWN_ATTEMPTS {
        let pos = Vec2::new(
            state
                .rng
                .random_range(OBSTACLE_EDGE_MARGIN..ARENA_WIDTH - OBSTACLE_EDGE_MARGIN),
            state
                .rng
                .random_range(OBSTACLE_EDGE_MARGIN..ARENA_HEIGHT - OBSTACLE_EDGE_MARGIN),
        );
        if pos.distance(player_pos) >= CONTAINER_PLAYER_CLEARANCE
            && is_clear(pos, 0.0, &state.obstacles, &state.containers)
        {
            let id = state.next_entity_id();
            state.containers.push(Container::new(id, pos));
            return;
        }
    }
    log::warn!("No clear container position, skipping");
}

fn rotate_stage(state: &mut GameState) {
    let director = &mut state.director;
    director.stage_time = 0.0;
    director.stage_index = (director.stage_index + 1) % STAGE_COUNT;
    director.stages_reached += 1;
    director.rate_mult *= STAGE_RATE_GROWTH;
    log::info!(
        "Stage {} begins at {:.1}s (spawn rate x{:.2})",
        director.stage_index,
        state.elapsed,
        director.rate_mult
    );
    let stage = director.stage_index;
    regenerate_obstacles(state);
    state.events.push(GameEvent::StageChanged { stage });
}

/// One tick of the spawn policy
pub fn update(state: &mut GameState, dt: f32) {
    let elapsed = state.elapsed;

    if !state.director.stage_pinned {
        state.director.stage_time += dt;
        if state.director.stage_time >= STAGE_DURATION_SECS {
            rotate_stage(state);
        }
    }

    state.director.spawn_timer -= dt;
    if state.director.spawn_timer <= 0.0 {
        state.director.spawn_timer = spawn_interval(elapsed, state.director.rate_mult);
        let alive = state
            .enemies
            .iter()
            .filter(|e| !e.kind.is_elite() && !e.body.is_dead())
            .count();
        if alive < enemy_cap(elapsed) {
            let pool = enemy_pool(elapsed, state.director.stages_reached);
            let kind = pool[state.rng.random_range(0..pool.len())];
            spawn_enemy(state, kind);
        }
    }

    if !state.director.mini_boss_spawned
        && elapsed >= MINI_BOSS_WINDOW.0
        && elapsed < MINI_BOSS_WINDOW.1
    {
        state.director.mini_boss_spawned = true;
        let id = spawn_enemy(state, EnemyKind::MiniBoss);
        log::info!("Mini-boss {id} spawned at {elapsed:.1}s");
        state.events.push(GameEvent::MiniBossSpawned);
    }

    if !state.director.boss_spawned && elapsed >= state.director.boss_time {
        state.director.boss_spawned = true;
        let id = spawn_enemy(state, EnemyKind::Boss);
        log::info!("Boss {id} spawned at {elapsed:.1}s");
        state.events.push(GameEvent::BossSpawned);
    }

    state.director.container_timer -= dt;
    if state.director.container_timer <= 0.0 {
        state.director.container_timer = state
            .rng
            .random_range(CONTAINER_INTERVAL.0..=CONTAINER_INTERVAL.1);
        if state.containers.len() < MAX_CONTAINERS {
            spawn_container(state);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::SessionSettings;

    fn playing_state(seed: u64) -> GameState {
        let mut state = GameState::new(seed);
        state.init(SessionSettings::default());
        state
    }

    #[test]
    fn test_pool_widens_over_time() {
        assert_eq!(enemy_pool(0.0, 0), &[EnemyKind::Grunt]);
        assert_eq!(enemy_pool(60.0, 0).len(), 2);
        assert_eq!(enemy_pool(179.0, 0).len(), 4);
        assert_eq!(enemy_pool(200.0, 0).len(), 4);
        assert_eq!(enemy_pool(200.0, 1).len(), 5);
        assert_eq!(enemy_pool(200.0, 4).len(), 6);
    }

    #[test]
    fn test_interval_and_cap_schedule() {
        assert_eq!(spawn_interval(0.0, 1.0), 1.5);
        assert_eq!(spawn_interval(100.0, 1.0), 0.8);
        assert!((spawn_interval(400.0, 2.0) - 0.2).abs() < 1e-6);
        assert_eq!(enemy_cap(0.0), 30);
        assert_eq!(enemy_cap(60.0), 60);
        assert_eq!(enemy_cap(200.0), 100);
        assert_eq!(enemy_cap(301.0), 150);
    }

    #[test]
    fn test_boss_time() {
        assert_eq!(boss_time(600.0), 540.0);
        assert_eq!(boss_time(60.0), 30.0);
        assert_eq!(boss_time(30.0), 30.0);
    }

    #[test]
    fn test_obstacles_in_bounds_and_clear_of_player() {
        for seed in 0..20 {
            let mut state = playing_state(seed);
            regenerate_obstacles(&mut state);
            let n = state.obstacles.len() as u32;
            assert!((MIN_OBSTACLES..=MAX_OBSTACLES).contains(&n));
            for o in &state.obstacles {
                assert!(o.pos.distance(state.player.body.pos) >= OBSTACLE_PLAYER_CLEARANCE);
            }
        }
    }

    #[test]
    fn test_spawned_enemy_on_perimeter_and_clear() {
        let mut state = playing_state(3);
        for _ in 0..20 {
            spawn_enemy(&mut state, EnemyKind::Grunt);
        }
        for e in &state.enemies {
            let p = e.body.pos;
            let on_edge = p.x == 0.0 || p.y == 0.0 || p.x == ARENA_WIDTH || p.y == ARENA_HEIGHT;
            assert!(on_edge);
        }
    }

    #[test]
    fn test_spawns_keep_clearance_from_props() {
        let mut state = playing_state(3);
        for i in 0..MAX_CONTAINERS {
            let id = state.next_entity_id();
            let x = 300.0 + i as f32 * 300.0;
            state.containers.push(Container::new(id, Vec2::new(x, 40.0)));
        }
        for _ in 0..50 {
            let id = spawn_enemy(&mut state, EnemyKind::Brute);
            let e = state.enemies.iter().find(|e| e.id == id).expect("spawned");
            for o in &state.obstacles {
                assert!(e.body.pos.distance(o.pos) >= o.radius + e.body.radius + SPAWN_CLEARANCE);
            }
            for c in &state.containers {
                assert!(e.body.pos.distance(c.pos) >= c.radius + e.body.radius + SPAWN_CLEARANCE);
            }
        }
    }

    #[test]
    fn test_spawn_falls_back_when_no_clear_position() {
        let mut state = playing_state(4);
        let id = state.next_entity_id();
        let center = Vec2::new(ARENA_WIDTH, ARENA_HEIGHT) / 2.0;
        state.obstacles = vec![Obstacle::new(id, ObstacleKind::Rock, center, ARENA_WIDTH)];
        assert!(!is_clear(Vec2::ZERO, 12.0, &state.obstacles, &state.containers));

        let pos = safe_spawn_position(&mut state, 12.0);
        let on_edge = pos.x == 0.0 || pos.y == 0.0 || pos.x == ARENA_WIDTH || pos.y == ARENA_HEIGHT;
        assert!(on_edge);
    }

    #[test]
    fn test_pool_survives_stage_wraparound() {
        let mut state = playing_state(6);
        state.director.stage_index = STAGE_COUNT - 1;
        state.director.stages_reached = STAGE_COUNT - 1;
        state.director.stage_time = STAGE_DURATION_SECS - 0.01;
        state.elapsed = 599.99;
        let before = enemy_pool(state.elapsed, state.director.stages_reached).len();

        update(&mut state, 0.02);
        assert_eq!(state.director.stage_index, 0);
        assert_eq!(state.director.stages_reached, STAGE_COUNT);
        let after = enemy_pool(state.elapsed, state.director.stages_reached).len();
        assert_eq!(before, EnemyKind::NORMAL.len());
        assert_eq!(after, EnemyKind::NORMAL.len());
    }

    #[test]
    fn test_containers_capped() {
        let mut state = playing_state(8);
        for _ in 0..(60.0 * 60.0) as usize {
            state.director.container_timer = 0.0;
            update(&mut state, 1.0 / 60.0);
            assert!(state.containers.len() <= MAX_CONTAINERS);
        }
    }

    #[test]
    fn test_pinned_stage_never_rotates() {
        let mut state = GameState::new(1);
        state.init(SessionSettings::new(600.0, Some(2)));
        for _ in 0..3000 {
            state.elapsed += 0.1;
            update(&mut state, 0.1);
        }
        assert_eq!(state.director.stage_index, 2);
        assert_eq!(state.director.rate_mult, 1.0);
    }
}
