//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time advances only through `GameState::advance` / `tick`
//! - Seeded RNG only
//! - Stable iteration order (insertion order, removals via `retain`)
//! - No rendering or platform dependencies

pub mod collision;
pub mod enemy;
pub mod entity;
pub mod item;
pub mod obstacle;
pub mod player;
pub mod progression;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod status;
pub mod tick;
pub mod weapon;

pub use collision::{HitShape, circles_overlap, resolve_obstacles, separation};
pub use enemy::{Enemy, EnemyKind, EnemyScaling};
pub use entity::{Body, Movable};
pub use item::{ChestTier, ConsumableKind, Item, ItemKind};
pub use obstacle::{Container, Obstacle, ObstacleKind};
pub use player::{DamageOutcome, Player, PlayerStats};
pub use progression::{PassiveKind, RewardChoice, RewardSource, xp_threshold};
pub use snapshot::Snapshot;
pub use spawn::SpawnDirector;
pub use state::{GameEvent, GamePhase, GameState};
pub use status::StatusEffects;
pub use tick::{TickInput, select_choice, tick};
pub use weapon::{Effect, EffectView, Weapon, WeaponKind};
