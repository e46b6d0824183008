//! Read-only view of a session for renderers and UI

use glam::Vec2;
use serde::Serialize;

use super::enemy::EnemyKind;
use super::item::ItemKind;
use super::obstacle::ObstacleKind;
use super::progression::{RewardChoice, RewardSource};
use super::state::{GamePhase, GameState};
use super::weapon::{EffectView, WeaponKind};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeaponView {
    pub kind: WeaponKind,
    pub level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub pos: Vec2,
    pub radius: f32,
    pub facing: Vec2,
    pub health: f32,
    pub max_health: f32,
    pub level: u32,
    pub experience: f32,
    pub experience_to_next: f32,
    pub score: u64,
    pub kills: u32,
    pub shield: u32,
    pub invulnerable: bool,
    pub weapons: Vec<WeaponView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub radius: f32,
    pub health_fraction: f32,
    pub frozen: bool,
    pub slowed: bool,
    pub poisoned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectileView {
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: u32,
    pub kind: ItemKind,
    pub pos: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ObstacleView {
    pub id: u32,
    pub kind: ObstacleKind,
    pub pos: Vec2,
    pub radius: f32,
    pub health: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContainerView {
    pub id: u32,
    pub pos: Vec2,
    pub radius: f32,
    pub health: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceView {
    pub choice: RewardChoice,
    pub title: String,
    pub description: String,
}

/// Everything a render/UI layer reads each frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub phase: GamePhase,
    pub elapsed: f32,
    pub remaining: f32,
    pub stage: usize,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub enemy_projectiles: Vec<ProjectileView>,
    pub effects: Vec<EffectView>,
    pub items: Vec<ItemView>,
    pub obstacles: Vec<ObstacleView>,
    pub containers: Vec<ContainerView>,
    /// Health fraction of the live boss
    pub boss_health: Option<f32>,
    pub reward_source: Option<RewardSource>,
    pub choices: Vec<ChoiceView>,
    pub highlighted: usize,
}

impl GameState {
    pub fn snapshot(&self) -> Snapshot {
        let player = &self.player;
        Snapshot {
            phase: self.phase,
            elapsed: self.elapsed,
            remaining: self.remaining(),
            stage: self.stage_index(),
            player: PlayerView {
                pos: player.body.pos,
                radius: player.body.radius,
                facing: player.facing,
                health: player.body.health(),
                max_health: player.body.max_health,
                level: player.level,
                experience: player.experience,
                experience_to_next: player.experience_to_next,
                score: player.score,
                kills: player.kills,
                shield: player.shield,
                invulnerable: player.body.status.is_invulnerable(),
                weapons: player
                    .weapons
                    .iter()
                    .map(|w| WeaponView {
                        kind: w.kind,
                        level: w.level,
                    })
                    .collect(),
            },
            enemies: self
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind,
                    pos: e.body.pos,
                    radius: e.body.radius,
                    health_fraction: e.body.health_fraction(),
                    frozen: e.body.status.is_frozen(),
                    slowed: e.body.status.is_slowed(),
                    poisoned: e.body.status.is_poisoned(),
                })
                .collect(),
            enemy_projectiles: self
                .enemies
                .iter()
                .flat_map(|e| &e.projectiles)
                .map(|p| ProjectileView {
                    pos: p.pos,
                    radius: p.radius,
                })
                .collect(),
            effects: player
                .weapons
                .iter()
                .flat_map(|w| &w.effects)
                .map(|effect| effect.view())
                .collect(),
            items: self
                .items
                .iter()
                .map(|i| ItemView {
                    id: i.id,
                    kind: i.kind,
                    pos: i.body.pos,
                    radius: i.body.radius,
                })
                .collect(),
            obstacles: self
                .obstacles
                .iter()
                .map(|o| ObstacleView {
                    id: o.id,
                    kind: o.kind,
                    pos: o.pos,
                    radius: o.radius,
                    health: o.health,
                })
                .collect(),
            containers: self
                .containers
                .iter()
                .map(|c| ContainerView {
                    id: c.id,
                    pos: c.pos,
                    radius: c.radius,
                    health: c.health,
                })
                .collect(),
            boss_health: self.boss().map(|b| b.body.health_fraction()),
            reward_source: self.reward_source,
            choices: self
                .choices
                .iter()
                .map(|c| ChoiceView {
                    choice: *c,
                    title: c.title().to_string(),
                    description: c.describe(player),
                })
                .collect(),
            highlighted: self.highlighted,
        }
    }
}
