//! Swarm Survival - a top-down survival-combat simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, weapons, collisions, spawning, progression)
//! - `settings`: Session settings with validation and fallback

pub mod settings;
pub mod sim;

pub use settings::{SessionSettings, SettingsError};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Largest time step a single `advance` may simulate (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Nominal display refresh step used by the headless driver
    pub const FRAME_DT: f32 = 1.0 / 60.0;

    /// Arena dimensions (origin top-left)
    pub const ARENA_WIDTH: f32 = 1280.0;
    pub const ARENA_HEIGHT: f32 = 720.0;
    /// Projectiles further than this outside the arena are retired
    pub const OFFSCREEN_MARGIN: f32 = 100.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 16.0;
    pub const PLAYER_SPEED: f32 = 180.0;
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const PLAYER_PICKUP_RADIUS: f32 = 80.0;
    /// Invulnerability after a hit absorbed by a shield charge
    pub const SHIELD_INVULNERABILITY: f32 = 0.5;
    /// Invulnerability after a hit that cost health
    pub const HIT_INVULNERABILITY: f32 = 1.0;
    pub const MIN_DAMAGE_TAKEN: f32 = 1.0;
    pub const MAX_DAMAGE_REDUCTION: f32 = 0.8;

    /// Weapon slots
    pub const MAX_WEAPON_SLOTS: usize = 6;
    pub const MAX_BONUS_WEAPON_SLOTS: u32 = 2;
    pub const MAX_WEAPON_LEVEL: u32 = 5;

    /// Session defaults
    pub const DEFAULT_DURATION_SECS: f32 = 600.0;
    pub const MIN_DURATION_SECS: f32 = 30.0;
    pub const MAX_DURATION_SECS: f32 = 3600.0;

    /// Stages rotate every `STAGE_DURATION_SECS` unless pinned
    pub const STAGE_COUNT: usize = 5;
    pub const STAGE_DURATION_SECS: f32 = 120.0;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Absolute angular difference between two angles, in [0, π]
#[inline]
pub fn angle_between(a: f32, b: f32) -> f32 {
    normalize_angle(a - b).abs()
}

/// Convert polar (r, theta) to cartesian offset (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Heading of a vector in radians (0 for the zero vector)
#[inline]
pub fn heading(v: Vec2) -> f32 {
    if v.length_squared() < f32::EPSILON {
        0.0
    } else {
        v.y.atan2(v.x)
    }
}

/// Check whether a point lies inside the arena grown by `margin` on every side
#[inline]
pub fn in_arena(pos: Vec2, margin: f32) -> bool {
    pos.x >= -margin
        && pos.y >= -margin
        && pos.x <= consts::ARENA_WIDTH + margin
        && pos.y <= consts::ARENA_HEIGHT + margin
}
