//! Snake Defense - a lane tower-defense simulation
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, tower effects, economy, scoring)
//! - `scheduler`: Fixed-timestep driver with speed multiplier and pause gate
//! - `session`: Input facade and render snapshot around one match
//! - `regions`: Interactive regions and status panels derived from state
//! - `ranking`: Score submission client and leaderboard model
//! - `settings`: Match configuration

pub mod ranking;
pub mod regions;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod sim;

pub use ranking::{Leaderboard, ScoreSubmission, SubmitOutcome};
pub use scheduler::{FixedStepScheduler, Speed};
pub use session::{Session, Snapshot};
pub use settings::{SelectionPolicy, Settings};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Simulation ticks per simulated second
    pub const TICKS_PER_SECOND: u64 = 60;
    /// Fixed simulation timestep in seconds
    pub const TICK_SECONDS: f64 = 1.0 / TICKS_PER_SECOND as f64;

    /// Minimum spacing between two towers at placement time
    pub const TOWER_MIN_DISTANCE: f64 = 80.0;
    /// Highest level a tower can be upgraded to
    pub const LEVEL_MAX: u32 = 3;
    /// Upgrade cost = ratio * current level * base cost
    pub const UPGRADE_COST_RATIO: i64 = 2;

    /// Ledger value at the start of a match
    pub const STARTING_LEDGER: i64 = 10;
    /// Default match seed
    pub const DEFAULT_SEED: u64 = 114_114;

    /// Lane x-coordinates enemies walk down
    pub const LANES: [f64; 3] = [60.0, 180.0, 300.0];
    /// Field height; the defense line sits 40 units above the bottom edge
    pub const FIELD_HEIGHT: f64 = 600.0;
    pub const DEFENSE_LINE: f64 = FIELD_HEIGHT - 40.0;
    /// Enemies enter just above the visible field
    pub const SPAWN_Y: f64 = -20.0;

    /// Spawn interval starts here and shrinks by one tick every 30 ticks
    pub const SPAWN_INTERVAL_START: f64 = 120.0;
    pub const SPAWN_INTERVAL_DECAY: f64 = 30.0;
    pub const SPAWN_INTERVAL_FLOOR: f64 = 50.0;
    /// Enemy HP/speed step up every 30 simulated seconds
    pub const DIFFICULTY_STEP_TICKS: u64 = TICKS_PER_SECOND * 30;

    /// Effect marker lifetime and upward drift
    pub const MARKER_LIFE_TICKS: u32 = 30;
    pub const MARKER_DRIFT: f64 = 0.5;
    /// Income markers float above the producing tower
    pub const INCOME_MARKER_OFFSET: f64 = 20.0;

    /// Pick radii for selection clicks
    pub const TOWER_PICK_RADIUS: f64 = 10.0;
    pub const ENEMY_PICK_RADIUS: f64 = 12.0;

    /// Status panel and its upgrade button
    pub const STATUS_X: f64 = 180.0;
    pub const STATUS_Y: f64 = 10.0;
    pub const STATUS_W: f64 = 170.0;
    pub const STATUS_H: f64 = 110.0;
    pub const UPGRADE_BUTTON_W: f64 = 130.0;
    pub const UPGRADE_BUTTON_H: f64 = 25.0;

    /// Points per scoring component
    pub const SCORE_PER_TOWER: i64 = 10;
    pub const SCORE_PER_DEFEAT: i64 = 5;
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: DVec2, b: DVec2) -> f64 {
    (a - b).length()
}
