//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - One seeded random stream, read only by the spawner
//! - Stable iteration order (placement / spawn order)
//! - No rendering or platform dependencies

pub mod actions;
pub mod combat;
pub mod economy;
pub mod rng;
pub mod score;
pub mod spawn;
pub mod state;
pub mod tick;

pub use actions::{Action, ActionLog};
pub use economy::{
    ActionRejected, TowerStats, can_place, place_tower, tower_stats, upgrade_cost, upgrade_tower,
};
pub use rng::ParkMiller;
pub use score::{ScoreBreakdown, calculate_score};
pub use spawn::{difficulty_multiplier, should_spawn, spawn_interval};
pub use state::{EffectMarker, Enemy, EnemyKind, GameState, MarkerKind, Tower, TowerKind};
pub use tick::tick;
