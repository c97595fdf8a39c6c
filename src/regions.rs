//! Selection, interactive regions and status panels
//!
//! Everything here is derived from current state with pure functions. The
//! presentation layer draws from these values and input handling hit-tests
//! against the same values, so neither depends on the other.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::distance;
use crate::settings::SelectionPolicy;
use crate::sim::{EnemyKind, GameState, TowerKind};

/// The entity currently under inspection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selection {
    Tower(u32),
    Enemy(u32),
}

/// Axis-aligned rectangle in field coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Strict interior test
    pub fn contains(&self, p: DVec2) -> bool {
        p.x > self.x && p.x < self.x + self.w && p.y > self.y && p.y < self.y + self.h
    }
}

/// Upgrade control shown for a selected tower
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpgradeButton {
    pub tower: u32,
    pub rect: Rect,
    /// None once the tower is at max level
    pub cost: Option<i64>,
    pub enabled: bool,
}

/// Status panel rectangle
pub fn status_panel_rect() -> Rect {
    Rect {
        x: STATUS_X,
        y: STATUS_Y,
        w: STATUS_W,
        h: STATUS_H,
    }
}

/// Derive the upgrade control for the current selection, if any
pub fn upgrade_button(state: &GameState, selection: Option<Selection>) -> Option<UpgradeButton> {
    let Some(Selection::Tower(id)) = selection else {
        return None;
    };
    let stats = state.tower(id)?.stats();
    let cost = stats.upgrade_cost();
    Some(UpgradeButton {
        tower: id,
        rect: Rect {
            x: STATUS_X + 20.0,
            y: STATUS_Y + STATUS_H,
            w: UPGRADE_BUTTON_W,
            h: UPGRADE_BUTTON_H,
        },
        cost,
        enabled: cost.is_some_and(|c| state.ledger >= c),
    })
}

/// Resolve a click to an entity
pub fn pick(state: &GameState, point: DVec2, policy: SelectionPolicy) -> Option<Selection> {
    let towers = state
        .towers
        .iter()
        .map(|t| (Selection::Tower(t.id), distance(point, t.pos), TOWER_PICK_RADIUS));
    let enemies = state
        .enemies
        .iter()
        .map(|e| (Selection::Enemy(e.id), distance(point, e.pos), ENEMY_PICK_RADIUS));
    let hits = towers.chain(enemies).filter(|(_, d, r)| d < r);

    match policy {
        SelectionPolicy::LastMatch => hits.last().map(|(sel, _, _)| sel),
        SelectionPolicy::Nearest => hits
            .fold(None::<(Selection, f64)>, |best, (sel, d, _)| match best {
                Some((_, bd)) if bd <= d => best,
                _ => Some((sel, d)),
            })
            .map(|(sel, _)| sel),
    }
}

/// What the tower panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TowerStatus {
    pub id: u32,
    pub kind: TowerKind,
    pub level: u32,
    pub range: f64,
    pub damage: Option<f64>,
    /// (amount, seconds)
    pub income: Option<(i64, u64)>,
    pub slow: Option<f64>,
    pub poison: Option<f64>,
    pub desc: &'static str,
    pub upgrade_cost: Option<i64>,
    /// Match second the tower was placed at
    pub placed_at: u64,
}

/// What the enemy panel shows
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnemyStatus {
    pub id: u32,
    pub kind: EnemyKind,
    pub hp: f64,
    pub max_hp: f64,
    pub speed: f64,
    pub poison: f64,
    pub desc: &'static str,
}

pub fn tower_status(state: &GameState, id: u32) -> Option<TowerStatus> {
    let tower = state.tower(id)?;
    let stats = tower.stats();
    Some(TowerStatus {
        id,
        kind: tower.kind,
        level: tower.level,
        range: stats.range.unwrap_or(0.0),
        damage: stats.damage,
        income: stats.income_amount.zip(stats.income_interval),
        slow: stats.slow,
        poison: stats.poison,
        desc: tower.kind.base().desc,
        upgrade_cost: stats.upgrade_cost(),
        placed_at: tower.placed_tick / TICKS_PER_SECOND,
    })
}

pub fn enemy_status(state: &GameState, id: u32) -> Option<EnemyStatus> {
    let enemy = state.enemy(id)?;
    Some(EnemyStatus {
        id,
        kind: enemy.kind,
        hp: enemy.hp.ceil(),
        max_hp: enemy.max_hp.ceil(),
        speed: enemy.current_speed(),
        poison: enemy.poison,
        desc: enemy.kind.base().desc,
    })
}
