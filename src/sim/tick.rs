//! Fixed timestep simulation tick
//!
//! One call advances the match by exactly one tick. Phase order is fixed:
//! passive income, spawning, tower effects, enemy upkeep, markers.

use super::combat::{run_enemies, run_markers, run_towers};
use super::economy::apply_passive_income;
use super::spawn::run_spawner;
use super::state::GameState;

/// Advance the game state by one fixed timestep.
///
/// Returns `false` without touching anything once the match is over.
pub fn tick(state: &mut GameState) -> bool {
    if state.game_over {
        return false;
    }

    state.time_ticks += 1;

    apply_passive_income(state);
    run_spawner(state);
    run_towers(state);
    run_enemies(state);
    run_markers(state);

    true
}
