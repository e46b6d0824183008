//! Per-frame simulation tick
//!
//! Phase handling first, then (only while playing) one pass of every
//! subsystem in a fixed order. Removals are done with `retain` after each
//! pass so no entry is skipped while a collection shrinks.

use glam::Vec2;

use super::collision::{circles_overlap, push_out, resolve_obstacles};
use super::enemy::EnemyKind;
use super::item::{ChestTier, ConsumableKind, Item, ItemKind};
use super::player::DamageOutcome;
use super::progression::{RewardSource, apply_choice, gain_experience, generate_choices};
use super::spawn;
use super::state::{GameEvent, GamePhase, GameState};
use super::weapon::CombatContext;

/// Bomb damage to normal enemies and mini-bosses
pub const BOMB_DAMAGE: f32 = 50.0;
/// Bomb damage to a boss, as a fraction of its max health
pub const BOMB_BOSS_FRACTION: f32 = 0.1;
pub const FREEZE_CONSUMABLE_DURATION: f32 = 3.0;
pub const HEAL_CONSUMABLE_FRACTION: f32 = 0.3;
/// Score per point of experience on a kill
pub const KILL_SCORE_PER_XP: u64 = 10;

/// Logical input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    /// Pointer position in arena coordinates
    pub pointer: Option<Vec2>,
    /// Primary click/tap this tick
    pub click: bool,
    /// Pause toggle
    pub pause: bool,
    pub confirm: bool,
    pub choice_left: bool,
    pub choice_right: bool,
}

impl TickInput {
    /// Movement direction from the four flags (not normalized; y grows down)
    pub fn move_vector(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Advance the game state by one step of `dt` seconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.events.clear();

    match state.phase {
        GamePhase::Menu => {
            if input.confirm {
                state.start();
            }
            return;
        }
        GamePhase::Paused => {
            if input.pause {
                state.phase = GamePhase::Playing;
                log::debug!("Resumed");
            }
            return;
        }
        GamePhase::LevelUp => {
            handle_choice_input(state, input);
            return;
        }
        GamePhase::GameOver | GamePhase::Victory => return,
        GamePhase::Playing => {
            if input.pause {
                state.phase = GamePhase::Paused;
                log::debug!("Paused");
                return;
            }
        }
    }

    state.time_ticks += 1;
    state.elapsed += dt;

    update_status_effects(state, dt);
    update_player(state, input, dt);
    update_weapons(state, dt);
    resolve_props(state);
    spawn::update(state, dt);
    update_enemies(state, dt);
    sweep_dead_enemies(state);
    update_items(state, dt);

    if check_session_end(state) {
        return;
    }
    present_next_reward(state);
}

fn update_status_effects(state: &mut GameState, dt: f32) {
    let poison = state.player.body.status.update(dt);
    if poison > 0.0 {
        state.player.take_damage(poison);
    }
    for enemy in &mut state.enemies {
        let poison = enemy.body.status.update(dt);
        if poison > 0.0 {
            enemy.body.apply_damage(poison);
        }
    }
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let player = &mut state.player;
    player.regenerate(dt);
    player.move_in(input.move_vector(), dt);
    resolve_obstacles(player, &state.obstacles);
    player.clamp_to_arena();

    let mut hazard_damage = 0.0;
    for obstacle in state.obstacles.iter_mut().filter(|o| o.is_hazard()) {
        let overlapping = circles_overlap(player.body.pos, player.body.radius, obstacle.pos, obstacle.radius);
        hazard_damage += obstacle.tick_hazard(dt, overlapping);
    }
    if hazard_damage > 0.0 {
        let outcome = player.take_damage(hazard_damage);
        record_player_hit(&mut state.events, outcome);
    }
}

fn update_weapons(state: &mut GameState, dt: f32) {
    let owner = state.player.owner_stats();
    let mut ctx = CombatContext {
        enemies: &mut state.enemies,
        obstacles: &mut state.obstacles,
        containers: &mut state.containers,
        items: &mut state.items,
        rng: &mut state.rng,
    };
    for weapon in &mut state.player.weapons {
        weapon.update(dt, &owner, &mut ctx);
    }
}

/// Broken containers drop a consumable, opened chests become rewards,
/// destroyed obstacles disappear
fn resolve_props(state: &mut GameState) {
    let broken: Vec<Vec2> = state
        .containers
        .iter()
        .filter(|c| c.is_broken())
        .map(|c| c.pos)
        .collect();
    state.containers.retain(|c| !c.is_broken());
    for pos in broken {
        let kind = ConsumableKind::random(&mut state.rng);
        let id = state.next_entity_id();
        state.items.push(Item::consumable(id, pos, kind));
        state.events.push(GameEvent::ContainerBroken);
        log::debug!("Container broke, dropped {kind:?}");
    }

    let opened: Vec<ChestTier> = state
        .items
        .iter()
        .filter_map(|item| match item.kind {
            ItemKind::Chest { open: true, tier } => Some(tier),
            _ => None,
        })
        .collect();
    state
        .items
        .retain(|item| !matches!(item.kind, ItemKind::Chest { open: true, .. }));
    for tier in opened {
        state.player.score += tier.bonus_score();
        state.player.heal_fraction(tier.heal_fraction());
        state.pending_rewards.push_back(RewardSource::Chest(tier));
        state.events.push(GameEvent::ChestOpened { tier });
        log::debug!("{tier:?} chest opened");
    }

    state.obstacles.retain(|o| !o.is_destroyed());
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let player_pos = state.player.body.pos;
    let player_radius = state.player.body.radius;

    for enemy in &mut state.enemies {
        if enemy.body.is_dead() {
            continue;
        }
        enemy.update_movement(dt, player_pos);
        resolve_obstacles(enemy, &state.obstacles);

        if enemy.can_contact_attack()
            && circles_overlap(enemy.body.pos, enemy.body.radius, player_pos, player_radius)
        {
            let outcome = state.player.take_damage(enemy.damage);
            record_player_hit(&mut state.events, outcome);
        }
        // The player is never displaced by enemies
        push_out(enemy, player_pos, player_radius);

        enemy.update_attack(dt, player_pos);
        for damage in enemy.update_projectiles(dt, player_pos, player_radius, &state.obstacles) {
            let outcome = state.player.take_damage(damage);
            record_player_hit(&mut state.events, outcome);
        }
    }
}

fn record_player_hit(events: &mut Vec<GameEvent>, outcome: DamageOutcome) {
    match outcome {
        DamageOutcome::Absorbed => events.push(GameEvent::ShieldAbsorbed),
        DamageOutcome::Wounded | DamageOutcome::Killed => events.push(GameEvent::PlayerHit),
        DamageOutcome::Ignored => {}
    }
}

/// Score, drops and removal for every enemy that died this tick
fn sweep_dead_enemies(state: &mut GameState) {
    let dead: Vec<(EnemyKind, Vec2, u32)> = state
        .enemies
        .iter()
        .filter(|e| e.body.is_dead())
        .map(|e| (e.kind, e.body.pos, e.experience))
        .collect();
    state.enemies.retain(|e| !e.body.is_dead());

    for (kind, pos, experience) in dead {
        state.player.kills += 1;
        state.player.score += KILL_SCORE_PER_XP * experience as u64;
        let id = state.next_entity_id();
        let drop = if kind.is_elite() {
            let tier = ChestTier::roll(&mut state.rng);
            log::info!("{kind:?} defeated, dropped a {tier:?} chest");
            Item::chest(id, pos, tier)
        } else {
            Item::orb(id, pos, experience)
        };
        state.items.push(drop);
        state.events.push(GameEvent::EnemyKilled { kind });
    }
}

fn update_items(state: &mut GameState, dt: f32) {
    let player_pos = state.player.body.pos;
    let player_radius = state.player.body.radius;
    let pickup_radius = state.player.pickup_radius();

    let mut collected = Vec::new();
    for item in &mut state.items {
        item.update_magnet(dt, player_pos, pickup_radius);
        if item.is_collectible()
            && circles_overlap(item.body.pos, item.body.radius, player_pos, player_radius)
        {
            item.body.kill();
            collected.push(item.kind);
        }
    }
    state.items.retain(|item| item.is_chest() || !item.body.is_dead());

    for kind in collected {
        match kind {
            ItemKind::ExperienceOrb { value } => {
                let levels = gain_experience(&mut state.player, value as f32);
                for _ in 0..levels {
                    state.pending_rewards.push_back(RewardSource::LevelUp);
                }
                if levels > 0 {
                    log::info!("Reached level {}", state.player.level);
                    state.events.push(GameEvent::LevelUp {
                        level: state.player.level,
                    });
                }
            }
            ItemKind::Consumable(consumable) => apply_consumable(state, consumable),
            ItemKind::Chest { .. } => {}
        }
    }
}

fn apply_consumable(state: &mut GameState, kind: ConsumableKind) {
    match kind {
        ConsumableKind::Heal => state.player.heal_fraction(HEAL_CONSUMABLE_FRACTION),
        ConsumableKind::Magnet => {
            for item in state
                .items
                .iter_mut()
                .filter(|i| matches!(i.kind, ItemKind::ExperienceOrb { .. }))
            {
                item.magnetized = true;
            }
        }
        ConsumableKind::Bomb => {
            for enemy in &mut state.enemies {
                let damage = if enemy.kind.is_boss() {
                    enemy.body.max_health * BOMB_BOSS_FRACTION
                } else {
                    BOMB_DAMAGE
                };
                enemy.body.apply_damage(damage);
            }
        }
        ConsumableKind::Shield => state.player.shield += 1,
        ConsumableKind::Freeze => {
            for enemy in &mut state.enemies {
                enemy.body.status.apply_freeze(FREEZE_CONSUMABLE_DURATION);
            }
        }
    }
    state.events.push(GameEvent::ConsumableUsed { kind });
    log::debug!("Used {kind:?}");
}

/// Game over on death, victory once the duration is reached
fn check_session_end(state: &mut GameState) -> bool {
    if state.player.body.is_dead() {
        state.phase = GamePhase::GameOver;
        state.events.push(GameEvent::GameOver);
        log::info!(
            "Game over at {:.1}s: level {}, score {}, kills {}",
            state.elapsed,
            state.player.level,
            state.player.score,
            state.player.kills
        );
        return true;
    }
    if state.elapsed >= state.settings.duration_seconds {
        state.phase = GamePhase::Victory;
        state.events.push(GameEvent::Victory);
        log::info!(
            "Victory at {:.1}s: level {}, score {}, kills {}",
            state.elapsed,
            state.player.level,
            state.player.score,
            state.player.kills
        );
        return true;
    }
    false
}

/// Move to `LevelUp` for the next queued reward that has any choices
fn present_next_reward(state: &mut GameState) {
    while let Some(source) = state.pending_rewards.pop_front() {
        let choices = generate_choices(&state.player, &mut state.rng);
        if choices.is_empty() {
            log::debug!("Nothing left to offer for {source:?}, skipping");
            continue;
        }
        state.choices = choices;
        state.reward_source = Some(source);
        state.highlighted = 0;
        state.phase = GamePhase::LevelUp;
        return;
    }
}

fn handle_choice_input(state: &mut GameState, input: &TickInput) {
    let count = state.choices.len();
    if count == 0 {
        state.phase = GamePhase::Playing;
        return;
    }
    if input.choice_left {
        state.highlighted = (state.highlighted + count - 1) % count;
    }
    if input.choice_right {
        state.highlighted = (state.highlighted + 1) % count;
    }

    let clicked = if input.click {
        input.pointer.and_then(|p| state.card_at(p))
    } else {
        None
    };
    let selected = clicked.or(input.confirm.then_some(state.highlighted));
    if let Some(index) = selected {
        select_choice(state, index);
    }
}

/// Apply choice `index` and resume play (or present the next queued reward)
pub fn select_choice(state: &mut GameState, index: usize) {
    if state.phase != GamePhase::LevelUp {
        return;
    }
    let Some(&choice) = state.choices.get(index) else {
        return;
    };
    apply_choice(&mut state.player, choice);
    log::debug!("Picked {}", choice.title());

    state.choices.clear();
    state.reward_source = None;
    state.highlighted = 0;
    state.phase = GamePhase::Playing;
    present_next_reward(state);
}
