//! Game state and session lifecycle
//!
//! `GameState` owns every collection and timer of a session. `init` rebuilds
//! all of it from the settings and seed, so nothing survives a reset.

use std::collections::VecDeque;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::enemy::{Enemy, EnemyKind};
use super::item::{ChestTier, ConsumableKind, Item};
use super::obstacle::{Container, Obstacle};
use super::player::Player;
use super::progression::{RewardChoice, RewardSource};
use super::spawn::{self, SpawnDirector};
use super::tick::{TickInput, tick};
use crate::consts::*;
use crate::settings::SessionSettings;

/// Level-up card layout (arena coordinates)
pub const CARD_WIDTH: f32 = 220.0;
pub const CARD_HEIGHT: f32 = 300.0;
pub const CARD_GAP: f32 = 40.0;

/// State machine phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for `start`
    Menu,
    Playing,
    Paused,
    /// Simulation frozen while a reward is chosen
    LevelUp,
    GameOver,
    Victory,
}

impl GamePhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::GameOver | GamePhase::Victory)
    }
}

/// Notable things that happened during the last tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemyKilled { kind: EnemyKind },
    PlayerHit,
    ShieldAbsorbed,
    LevelUp { level: u32 },
    ChestOpened { tier: ChestTier },
    ContainerBroken,
    ConsumableUsed { kind: ConsumableKind },
    MiniBossSpawned,
    BossSpawned,
    StageChanged { stage: usize },
    Victory,
    GameOver,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed re-applied on every `init`
    pub seed: u64,
    pub rng: Pcg32,
    /// Settings of the running session
    pub settings: SessionSettings,
    /// Stored by `set_settings`, consumed by the next `reset`
    pending_settings: SessionSettings,
    pub phase: GamePhase,
    /// Session time in seconds (advances only while playing)
    pub elapsed: f32,
    pub time_ticks: u64,
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub items: Vec<Item>,
    pub obstacles: Vec<Obstacle>,
    pub containers: Vec<Container>,
    pub director: SpawnDirector,
    /// Reward events waiting to be presented
    pub pending_rewards: VecDeque<RewardSource>,
    /// Reward being chosen in `LevelUp`
    pub reward_source: Option<RewardSource>,
    pub choices: Vec<RewardChoice>,
    pub highlighted: usize,
    /// Cleared at the start of every tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// Create a session in the menu with default settings
    pub fn new(seed: u64) -> Self {
        let settings = SessionSettings::default();
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings: settings.clone(),
            pending_settings: settings.clone(),
            phase: GamePhase::Menu,
            elapsed: 0.0,
            time_ticks: 0,
            player: Player::new(arena_center()),
            enemies: Vec::new(),
            items: Vec::new(),
            obstacles: Vec::new(),
            containers: Vec::new(),
            director: SpawnDirector::default(),
            pending_rewards: VecDeque::new(),
            reward_source: None,
            choices: Vec::new(),
            highlighted: 0,
            events: Vec::new(),
            next_id: 1,
        };
        state.init(settings);
        state
    }

    /// Reset every collection and timer to session start
    pub fn init(&mut self, settings: SessionSettings) {
        let settings = settings.sanitized();

        self.rng = Pcg32::seed_from_u64(self.seed);
        self.phase = GamePhase::Menu;
        self.elapsed = 0.0;
        self.time_ticks = 0;
        self.next_id = 1;
        self.player = Player::new(arena_center());
        self.enemies.clear();
        self.items.clear();
        self.obstacles.clear();
        self.containers.clear();
        self.director = SpawnDirector::new(settings.duration_seconds, settings.start_stage_index);
        self.pending_rewards.clear();
        self.reward_source = None;
        self.choices.clear();
        self.highlighted = 0;
        self.events.clear();

        self.pending_settings = settings.clone();
        self.settings = settings;
        spawn::regenerate_obstacles(self);

        log::info!(
            "Session initialized: seed={}, duration={}s, stage={}",
            self.seed,
            self.settings.duration_seconds,
            match self.settings.start_stage_index {
                Some(stage) => format!("{stage} (pinned)"),
                None => "0 (rotating)".to_string(),
            }
        );
    }

    /// Re-initialize with the stored settings
    pub fn reset(&mut self) {
        self.init(self.pending_settings.clone());
    }

    /// Store settings for the next `reset`; invalid fields fall back to defaults
    pub fn set_settings(&mut self, duration_seconds: f32, start_stage_index: Option<usize>) {
        self.pending_settings = SessionSettings::new(duration_seconds, start_stage_index).sanitized();
    }

    pub fn pending_settings(&self) -> &SessionSettings {
        &self.pending_settings
    }

    /// Menu -> playing; ignored in any other phase
    pub fn start(&mut self) {
        if self.phase == GamePhase::Menu {
            self.phase = GamePhase::Playing;
            log::info!("Session started");
        }
    }

    /// Advance by a host frame. The step is clamped to `MAX_FRAME_DT`.
    pub fn advance(&mut self, elapsed_ms: f32, input: &TickInput) {
        let dt = if elapsed_ms.is_finite() {
            (elapsed_ms / 1000.0).clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        tick(self, input, dt);
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn remaining(&self) -> f32 {
        (self.settings.duration_seconds - self.elapsed).max(0.0)
    }

    pub fn stage_index(&self) -> usize {
        self.director.stage_index
    }

    /// Live boss, if one is on the field
    pub fn boss(&self) -> Option<&Enemy> {
        self.enemies
            .iter()
            .find(|e| e.kind.is_boss() && !e.body.is_dead())
    }

    /// Card under `pointer`, among the current choices
    pub fn card_at(&self, pointer: Vec2) -> Option<usize> {
        (0..self.choices.len()).find(|&i| {
            let (min, max) = card_rect(i, self.choices.len());
            pointer.cmpge(min).all() && pointer.cmple(max).all()
        })
    }
}

pub fn arena_center() -> Vec2 {
    Vec2::new(ARENA_WIDTH / 2.0, ARENA_HEIGHT / 2.0)
}

/// Bounds of card `index` of `count`, centered in the arena
pub fn card_rect(index: usize, count: usize) -> (Vec2, Vec2) {
    let count = count.max(1) as f32;
    let total = count * CARD_WIDTH + (count - 1.0) * CARD_GAP;
    let left = (ARENA_WIDTH - total) / 2.0 + index as f32 * (CARD_WIDTH + CARD_GAP);
    let top = (ARENA_HEIGHT - CARD_HEIGHT) / 2.0;
    (
        Vec2::new(left, top),
        Vec2::new(left + CARD_WIDTH, top + CARD_HEIGHT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_in_menu() {
        let state = GameState::new(1);
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.elapsed, 0.0);
        assert!(!state.obstacles.is_empty());
        assert_eq!(state.player.body.pos, arena_center());
    }

    #[test]
    fn test_init_clears_everything() {
        let mut state = GameState::new(1);
        state.start();
        for _ in 0..600 {
            state.advance(16.0, &TickInput::default());
        }
        assert!(state.elapsed > 0.0);
        assert!(!state.enemies.is_empty());

        state.init(SessionSettings::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.elapsed, 0.0);
        assert!(state.enemies.is_empty());
        assert!(state.items.is_empty());
        assert!(state.containers.is_empty());
        assert_eq!(state.director.spawn_timer, 0.0);
        assert_eq!(state.player.level, 1);
    }

    #[test]
    fn test_same_seed_same_layout() {
        let a = GameState::new(42);
        let b = GameState::new(42);
        let pa: Vec<Vec2> = a.obstacles.iter().map(|o| o.pos).collect();
        let pb: Vec<Vec2> = b.obstacles.iter().map(|o| o.pos).collect();
        assert_eq!(pa, pb);
    }

    #[test]
    fn test_set_settings_applies_on_reset() {
        let mut state = GameState::new(1);
        state.set_settings(90.0, Some(3));
        assert_eq!(state.settings.duration_seconds, DEFAULT_DURATION_SECS);
        state.reset();
        assert_eq!(state.settings.duration_seconds, 90.0);
        assert_eq!(state.stage_index(), 3);
        assert!(state.director.stage_pinned);
    }

    #[test]
    fn test_invalid_settings_fall_back() {
        let mut state = GameState::new(1);
        state.set_settings(-5.0, Some(99));
        state.reset();
        assert_eq!(state.settings, SessionSettings::default());
    }

    #[test]
    fn test_advance_clamps_dt() {
        let mut state = GameState::new(1);
        state.start();
        state.advance(5_000.0, &TickInput::default());
        assert!((state.elapsed - MAX_FRAME_DT).abs() < 1e-6);
        state.advance(f32::NAN, &TickInput::default());
        assert!((state.elapsed - MAX_FRAME_DT).abs() < 1e-6);
    }

    #[test]
    fn test_card_layout() {
        let (min0, _) = card_rect(0, 3);
        let (min1, _) = card_rect(1, 3);
        let (_, max2) = card_rect(2, 3);
        assert_eq!(min0, Vec2::new(270.0, 210.0));
        assert_eq!(min1.x, 530.0);
        assert_eq!(max2.x, 1010.0);
    }
}
