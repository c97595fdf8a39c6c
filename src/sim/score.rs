//! Score derivation
//!
//! The score is never accumulated; it is recomputed from current state.

use serde::{Deserialize, Serialize};

use super::state::GameState;
use crate::consts::*;

/// Score split into its components, as shown on the result screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub towers: i64,
    pub enemies: i64,
    pub ledger: i64,
    pub time: i64,
    pub total: i64,
}

impl ScoreBreakdown {
    pub fn from_counts(towers_placed: u64, enemies_defeated: u64, ledger: i64, seconds: u64) -> Self {
        let towers = towers_placed as i64 * SCORE_PER_TOWER;
        let enemies = enemies_defeated as i64 * SCORE_PER_DEFEAT;
        let time = seconds as i64;
        Self {
            towers,
            enemies,
            ledger,
            time,
            total: towers + enemies + ledger + time,
        }
    }
}

/// Current score of a match
pub fn calculate_score(state: &GameState) -> ScoreBreakdown {
    ScoreBreakdown::from_counts(
        state.towers_placed,
        state.enemies_defeated,
        state.ledger,
        state.seconds,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_state() {
        let mut state = GameState::new(1);
        state.towers_placed = 2;
        state.enemies_defeated = 3;
        state.ledger = 15;
        state.seconds = 20;
        let score = calculate_score(&state);
        assert_eq!(score.towers, 20);
        assert_eq!(score.enemies, 15);
        assert_eq!(score.total, 70);
    }

    #[test]
    fn test_fresh_match_scores_ledger_only() {
        let state = GameState::new(1);
        assert_eq!(calculate_score(&state).total, STARTING_LEDGER);
    }
}
