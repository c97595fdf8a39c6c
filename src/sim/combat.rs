//! Tower effects and enemy upkeep
//!
//! Each tower gates itself on its own tick counter; there is no
//! synchronization between towers. Enemies killed mid-phase stay in the
//! registry until cleanup, so later towers can still hit them that tick.

use super::economy::TowerStats;
use super::state::{EffectMarker, Enemy, GameState, MarkerKind};
use crate::consts::*;
use crate::distance;

/// Apply one tower firing to one enemy. Returns the damage dealt.
pub fn apply_hit(stats: &TowerStats, enemy: &mut Enemy) -> f64 {
    let damage = stats.damage.unwrap_or(0.0);
    enemy.hp -= damage;
    if let Some(poison) = stats.poison {
        enemy.poison += poison;
    }
    // Most recent slow wins, even when weaker than the active one
    if let Some(slow) = stats.slow {
        enemy.slow = slow;
        enemy.slow_ticks = stats.slow_ticks.unwrap_or(0);
    }
    damage
}

/// Whether a tower with these stats and timer fires at an enemy this far away
pub fn fires_at(stats: &TowerStats, timer: u64, dist: f64) -> bool {
    match stats.range {
        Some(range) => dist <= range && stats.rate > 0 && timer % stats.rate == 0,
        None => false,
    }
}

/// Tower phase: advance timers, pay income, fire at enemies in range
pub fn run_towers(state: &mut GameState) {
    let GameState {
        towers,
        enemies,
        markers,
        ledger,
        ..
    } = state;

    for tower in towers.iter_mut() {
        tower.timer += 1;
        let stats = tower.stats();

        if let (Some(period), Some(amount)) = (stats.income_period_ticks(), stats.income_amount) {
            if tower.timer % period == 0 {
                *ledger += amount;
                markers.push(EffectMarker::new(
                    MarkerKind::Income,
                    tower.pos - glam::DVec2::new(0.0, INCOME_MARKER_OFFSET),
                    format!("+{amount}"),
                ));
            }
        }

        for enemy in enemies.iter_mut() {
            if !fires_at(&stats, tower.timer, distance(enemy.pos, tower.pos)) {
                continue;
            }
            let damage = apply_hit(&stats, enemy);
            if damage > 0.0 {
                markers.push(EffectMarker::new(
                    MarkerKind::Damage,
                    enemy.pos,
                    format!("-{damage}"),
                ));
            }
        }
    }
}

/// Enemy phase: slow decay, movement, poison drain, breach check, cleanup
pub fn run_enemies(state: &mut GameState) {
    let defense_line = state.field.defense_line;
    let mut breached = false;

    for enemy in state.enemies.iter_mut() {
        if enemy.slow_ticks > 0 {
            enemy.slow_ticks -= 1;
        } else {
            enemy.slow = 1.0;
        }
        enemy.pos.y += enemy.current_speed();
        enemy.hp -= enemy.poison;
        if enemy.pos.y > defense_line {
            breached = true;
        }
    }

    if breached && !state.game_over {
        state.game_over = true;
        log::info!(
            "Defense line breached at tick {} ({}s survived)",
            state.time_ticks,
            state.seconds
        );
    }

    let before = state.enemies.len();
    state.enemies.retain(|e| !e.is_dead());
    state.enemies_defeated += (before - state.enemies.len()) as u64;
}

/// Age and drift effect markers, dropping expired ones
pub fn run_markers(state: &mut GameState) {
    for marker in state.markers.iter_mut() {
        marker.pos.y -= MARKER_DRIFT;
        marker.life = marker.life.saturating_sub(1);
    }
    state.markers.retain(|m| m.life > 0);
}
