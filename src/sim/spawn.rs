//! Spawn director
//!
//! Spawns quicken as the match goes on and each new enemy is tougher the
//! longer the player has survived. Lane choice is the only random decision
//! in the whole simulation.

use glam::DVec2;

use super::state::{Enemy, EnemyKind, GameState};
use crate::consts::*;

/// Ticks between spawns at a given point in the match.
///
/// Kept fractional: a spawn fires only when the tick count is an exact
/// multiple of the interval, which the fractional value decides.
pub fn spawn_interval(ticks: u64) -> f64 {
    (SPAWN_INTERVAL_START - ticks as f64 / SPAWN_INTERVAL_DECAY).max(SPAWN_INTERVAL_FLOOR)
}

/// Whether a spawn fires on this tick
pub fn should_spawn(ticks: u64) -> bool {
    ticks > 0 && (ticks as f64) % spawn_interval(ticks) == 0.0
}

/// Multiplier on base HP and speed; steps up every 30 simulated seconds
pub fn difficulty_multiplier(ticks: u64) -> f64 {
    (1 + ticks / DIFFICULTY_STEP_TICKS) as f64
}

/// Build an enemy of `kind` in `lane` for the given match time
pub fn make_enemy(id: u32, kind: EnemyKind, lane_x: f64, spawn_y: f64, ticks: u64) -> Enemy {
    let base = kind.base();
    let scale = difficulty_multiplier(ticks);
    let hp = base.hp * scale;
    Enemy {
        id,
        kind,
        pos: DVec2::new(lane_x, spawn_y),
        hp,
        max_hp: hp,
        speed: base.speed * scale,
        slow: 1.0,
        slow_ticks: 0,
        poison: 0.0,
    }
}

/// Spawn phase of a tick
pub fn run_spawner(state: &mut GameState) {
    if !should_spawn(state.time_ticks) || state.field.lanes.is_empty() {
        return;
    }

    let lane = state.field.lanes[state.rng.pick_index(state.field.lanes.len())];
    let id = state.next_enemy_id();
    let enemy = make_enemy(
        id,
        state.spawn_kind,
        lane,
        state.field.spawn_y,
        state.time_ticks,
    );
    log::debug!(
        "Tick {}: spawned enemy #{} in lane x={} (hp {}, speed {})",
        state.time_ticks,
        id,
        lane,
        enemy.hp,
        enemy.speed
    );
    state.enemies.push(enemy);
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_interval_endpoints() {
        assert_eq!(spawn_interval(0), 120.0);
        assert_eq!(spawn_interval(600), 100.0);
        assert_eq!(spawn_interval(2100), 50.0);
        assert_eq!(spawn_interval(1_000_000), 50.0);
    }

    #[test]
    fn test_first_spawns() {
        let fired: Vec<u64> = (0..1000).filter(|&t| should_spawn(t)).collect();
        // 225 is the first tick that is a whole multiple of its own interval (112.5)
        assert_eq!(fired.first(), Some(&225));
        assert!(fired.contains(&600));
        assert!(fired.contains(&900));
    }

    #[test]
    fn test_floor_interval_spawns_every_50() {
        assert!(should_spawn(2500));
        assert!(should_spawn(2550));
        assert!(!should_spawn(2525));
    }

    #[test]
    fn test_difficulty_steps() {
        assert_eq!(difficulty_multiplier(0), 1.0);
        assert_eq!(difficulty_multiplier(1799), 1.0);
        assert_eq!(difficulty_multiplier(1800), 2.0);
        assert_eq!(difficulty_multiplier(3600), 3.0);

        let enemy = make_enemy(1, EnemyKind::Normal, 60.0, -20.0, 1800);
        assert_eq!(enemy.hp, 20.0);
        assert_eq!(enemy.max_hp, 20.0);
        assert!((enemy.speed - 0.2).abs() < 1e-12);
        assert_eq!(enemy.slow, 1.0);
    }

    #[test]
    fn test_lane_sequence_is_seeded() {
        let lanes = |seed| {
            let mut state = GameState::new(seed);
            let mut xs = Vec::new();
            for t in (0..3000).filter(|&t| should_spawn(t)) {
                state.time_ticks = t;
                run_spawner(&mut state);
                xs.push(state.enemies.last().map(|e| e.pos.x));
            }
            xs
        };
        assert_eq!(lanes(114_114), lanes(114_114));
        assert!(lanes(114_114).iter().all(|x| x.is_some_and(|x| LANES.contains(&x))));
    }

    proptest! {
        #[test]
        fn prop_interval_monotone_with_floor(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(spawn_interval(hi) <= spawn_interval(lo));
            prop_assert!(spawn_interval(hi) >= SPAWN_INTERVAL_FLOOR);
        }

        #[test]
        fn prop_difficulty_is_step_function(a in 0u64..100_000, b in 0u64..100_000) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(difficulty_multiplier(lo) <= difficulty_multiplier(hi));
            if lo / DIFFICULTY_STEP_TICKS == hi / DIFFICULTY_STEP_TICKS {
                prop_assert_eq!(difficulty_multiplier(lo), difficulty_multiplier(hi));
            }
        }
    }
}
