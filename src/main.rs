//! Swarm Survival headless runner
//!
//! Plays one session with a simple autopilot and prints a JSON summary.
//!
//! Usage: `swarm-survival [settings.json] [--seed N]`

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use serde::Serialize;

use swarm_survival::SessionSettings;
use swarm_survival::consts::*;
use swarm_survival::sim::{GamePhase, GameState, TickInput, WeaponKind};

const DEFAULT_SEED: u64 = 12345;
/// Enemies further away than this are ignored when fleeing
const THREAT_RADIUS: f32 = 220.0;
/// Distance from a wall at which the autopilot steers back in
const WALL_MARGIN: f32 = 80.0;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RunSummary {
    seed: u64,
    outcome: GamePhase,
    elapsed: f32,
    level: u32,
    score: u64,
    kills: u32,
    weapons: Vec<(WeaponKind, u32)>,
    passives: usize,
}

/// Play one headless session and print a JSON summary
#[derive(Debug, Parser)]
#[command(name = "swarm-survival", version)]
struct Cli {
    /// Session settings JSON (`durationSeconds`, `startStageIndex`)
    settings: Option<PathBuf>,
    /// Seed for the session RNG
    #[arg(long)]
    seed: Option<u64>,
}

/// Flee nearby enemies, stay off the walls, always take the first card
fn autopilot(state: &GameState) -> TickInput {
    match state.phase {
        GamePhase::Menu | GamePhase::LevelUp => {
            return TickInput {
                confirm: true,
                ..Default::default()
            };
        }
        GamePhase::Playing => {}
        _ => return TickInput::default(),
    }

    let pos = state.player.body.pos;
    let mut away = Vec2::ZERO;
    for enemy in &state.enemies {
        let delta = pos - enemy.body.pos;
        let dist = delta.length();
        if dist < THREAT_RADIUS {
            away += delta.normalize_or_zero() * (THREAT_RADIUS - dist);
        }
    }
    if pos.x < WALL_MARGIN {
        away.x += WALL_MARGIN;
    }
    if pos.x > ARENA_WIDTH - WALL_MARGIN {
        away.x -= WALL_MARGIN;
    }
    if pos.y < WALL_MARGIN {
        away.y += WALL_MARGIN;
    }
    if pos.y > ARENA_HEIGHT - WALL_MARGIN {
        away.y -= WALL_MARGIN;
    }

    let threshold = away.length() * 0.3;
    TickInput {
        left: away.x < -threshold,
        right: away.x > threshold,
        up: away.y < -threshold,
        down: away.y > threshold,
        ..Default::default()
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let seed = cli.seed.unwrap_or(DEFAULT_SEED);
    let settings = match &cli.settings {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("failed to read settings at {}", path.display()))?;
            SessionSettings::from_json(&json)
        }
        None => SessionSettings::default(),
    };

    let mut state = GameState::new(seed);
    state.init(settings);
    log::info!("Swarm Survival (headless) starting, seed {seed}");

    let frame_ms = FRAME_DT * 1000.0;
    while !state.phase.is_terminal() {
        let input = autopilot(&state);
        state.advance(frame_ms, &input);
    }

    let summary = RunSummary {
        seed,
        outcome: state.phase,
        elapsed: state.elapsed,
        level: state.player.level,
        score: state.player.score,
        kills: state.player.kills,
        weapons: state
            .player
            .weapons
            .iter()
            .map(|w| (w.kind, w.level))
            .collect(),
        passives: state.player.passives.len(),
    };
    let json = serde_json::to_string_pretty(&summary).context("failed to serialize run summary")?;
    println!("{json}");
    Ok(())
}
