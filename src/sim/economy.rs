//! Tower stats, leveling and ledger spending
//!
//! Stats are never stored on a tower: they are derived from `(kind, level)`
//! every time they are needed, so an upgrade takes effect on the very next
//! lookup.

use glam::DVec2;
use thiserror::Error;

use super::actions::Action;
use super::state::{GameState, Tower, TowerKind};
use crate::consts::*;
use crate::distance;

/// Lowest slow multiplier leveling can reach
pub const SLOW_FLOOR: f64 = 0.05;
/// Shortest income interval leveling can reach
pub const INCOME_INTERVAL_FLOOR: u64 = 1;

/// Why a spend operation was refused. Nothing is mutated on rejection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActionRejected {
    #[error("need {needed} but ledger holds {available}")]
    InsufficientFunds { needed: i64, available: i64 },
    #[error("too close to tower {neighbor}")]
    TooClose { neighbor: u32 },
    #[error("tower {id} is already at max level")]
    LevelMaxed { id: u32 },
    #[error("no tower with id {id}")]
    UnknownTower { id: u32 },
    #[error("match is over")]
    GameOver,
}

/// Stats a tower kind has at level 1. `None` means the kind lacks the stat.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseStats {
    pub cost: i64,
    /// Ticks between enemy interactions
    pub rate: u64,
    pub damage: Option<f64>,
    pub range: Option<f64>,
    pub slow: Option<f64>,
    pub slow_ticks: Option<u32>,
    /// Seconds between income payouts
    pub income_interval: Option<u64>,
    pub income_amount: Option<i64>,
    pub poison: Option<f64>,
    pub desc: &'static str,
}

impl TowerKind {
    pub fn base(&self) -> BaseStats {
        let none = BaseStats {
            cost: 7,
            rate: TICKS_PER_SECOND,
            damage: None,
            range: None,
            slow: None,
            slow_ticks: None,
            income_interval: None,
            income_amount: None,
            poison: None,
            desc: "",
        };
        match self {
            TowerKind::Normal => BaseStats {
                damage: Some(1.0),
                range: Some(80.0),
                desc: "Deals damage every second",
                ..none
            },
            TowerKind::Producer => BaseStats {
                income_interval: Some(5),
                income_amount: Some(1),
                desc: "Refills the ledger",
                ..none
            },
            TowerKind::Stone => BaseStats {
                rate: TICKS_PER_SECOND / 5,
                range: Some(60.0),
                slow: Some(0.5),
                slow_ticks: Some(120),
                desc: "Slows enemies down",
                ..none
            },
            TowerKind::Venom => BaseStats {
                rate: TICKS_PER_SECOND / 2,
                range: Some(70.0),
                poison: Some(0.01),
                desc: "Poison that never wears off",
                ..none
            },
        }
    }
}

/// Effective stats at a given level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TowerStats {
    pub kind: TowerKind,
    pub level: u32,
    pub cost: i64,
    pub rate: u64,
    pub damage: Option<f64>,
    pub range: Option<f64>,
    pub slow: Option<f64>,
    pub slow_ticks: Option<u32>,
    pub income_interval: Option<u64>,
    pub income_amount: Option<i64>,
    pub poison: Option<f64>,
}

impl TowerStats {
    /// Tick period of income payouts, if this kind produces
    pub fn income_period_ticks(&self) -> Option<u64> {
        self.income_interval.map(|secs| secs * TICKS_PER_SECOND)
    }

    /// Cost of going from this level to the next (None at max level)
    pub fn upgrade_cost(&self) -> Option<i64> {
        (self.level < LEVEL_MAX).then(|| upgrade_cost(self.cost, self.level))
    }
}

/// Derive effective stats from kind and level
pub fn tower_stats(kind: TowerKind, level: u32) -> TowerStats {
    let base = kind.base();
    let level = level.max(1);
    let extra = (level - 1) as f64;
    TowerStats {
        kind,
        level,
        cost: base.cost,
        rate: base.rate,
        damage: base.damage.map(|d| d + extra + 0.5),
        range: base.range.map(|r| r + extra * 20.0),
        slow: base.slow.map(|s| (s - extra * 0.1).max(SLOW_FLOOR)),
        slow_ticks: base.slow_ticks,
        income_interval: base
            .income_interval
            .map(|secs| secs.saturating_sub(level as u64 - 1).max(INCOME_INTERVAL_FLOOR)),
        income_amount: base.income_amount,
        poison: base.poison,
    }
}

impl Tower {
    pub fn stats(&self) -> TowerStats {
        tower_stats(self.kind, self.level)
    }
}

/// `UPGRADE_COST_RATIO * level * base_cost`
pub fn upgrade_cost(base_cost: i64, level: u32) -> i64 {
    UPGRADE_COST_RATIO * level as i64 * base_cost
}

fn ensure_funds(state: &GameState, needed: i64) -> Result<(), ActionRejected> {
    if state.ledger < needed {
        return Err(ActionRejected::InsufficientFunds {
            needed,
            available: state.ledger,
        });
    }
    Ok(())
}

/// Check placement preconditions without mutating anything
pub fn can_place(state: &GameState, kind: TowerKind, pos: DVec2) -> Result<(), ActionRejected> {
    if state.game_over {
        return Err(ActionRejected::GameOver);
    }
    ensure_funds(state, kind.base().cost)?;
    if let Some(neighbor) = state
        .towers
        .iter()
        .find(|t| distance(pos, t.pos) < TOWER_MIN_DISTANCE)
    {
        return Err(ActionRejected::TooClose {
            neighbor: neighbor.id,
        });
    }
    Ok(())
}

/// Place a new level-1 tower, paying its base cost
pub fn place_tower(
    state: &mut GameState,
    kind: TowerKind,
    pos: DVec2,
) -> Result<u32, ActionRejected> {
    can_place(state, kind, pos)?;

    let cost = kind.base().cost;
    state.ledger -= cost;

    let id = state.towers.len() as u32 + 1;
    state.towers.push(Tower {
        id,
        kind,
        level: 1,
        pos,
        timer: 0,
        placed_tick: state.time_ticks,
    });
    state.towers_placed += 1;
    state.log.push(Action::Place {
        id,
        x: pos.x,
        y: pos.y,
        kind,
        level: 1,
        frame: state.time_ticks,
    });

    log::info!(
        "Placed {} tower #{} at ({:.0}, {:.0}), ledger {}",
        kind.as_str(),
        id,
        pos.x,
        pos.y,
        state.ledger
    );
    Ok(id)
}

/// Raise a tower one level, paying the upgrade cost
pub fn upgrade_tower(state: &mut GameState, id: u32) -> Result<u32, ActionRejected> {
    if state.game_over {
        return Err(ActionRejected::GameOver);
    }
    let stats = state
        .tower(id)
        .map(Tower::stats)
        .ok_or(ActionRejected::UnknownTower { id })?;
    let cost = stats
        .upgrade_cost()
        .ok_or(ActionRejected::LevelMaxed { id })?;
    ensure_funds(state, cost)?;

    let tick = state.time_ticks;
    let tower = state
        .towers
        .iter_mut()
        .find(|t| t.id == id)
        .ok_or(ActionRejected::UnknownTower { id })?;
    tower.level += 1;
    let (kind, level) = (tower.kind, tower.level);
    state.ledger -= cost;
    state.log.push(Action::Upgrade {
        id,
        kind,
        level,
        frame: tick,
    });

    log::info!(
        "Upgraded tower #{} to level {} for {}, ledger {}",
        id,
        level,
        cost,
        state.ledger
    );
    Ok(level)
}

/// Passive income: one unit and one survived second per 60-tick boundary
pub fn apply_passive_income(state: &mut GameState) {
    if state.time_ticks % TICKS_PER_SECOND == 0 {
        state.seconds += 1;
        state.ledger += 1;
    }
}
