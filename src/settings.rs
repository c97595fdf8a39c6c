//! Match settings
//!
//! Loaded from a JSON file by the headless runner. Defaults reproduce the
//! stock game.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::scheduler::Speed;
use crate::sim::EnemyKind;

/// How a click picks between overlapping towers and enemies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// Towers are scanned, then enemies; the last entity in range wins
    #[default]
    LastMatch,
    /// The closest entity in range wins, ties going to towers
    Nearest,
}

impl SelectionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionPolicy::LastMatch => "last_match",
            SelectionPolicy::Nearest => "nearest",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "last_match" | "last" | "legacy" => Some(SelectionPolicy::LastMatch),
            "nearest" => Some(SelectionPolicy::Nearest),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("settings must name at least one lane")]
    NoLanes,
}

/// Match configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Seed of the random stream
    pub seed: u64,
    /// Ledger at tick 0
    pub starting_ledger: i64,

    // === Field ===
    /// Lane x-coordinates
    pub lanes: Vec<f64>,
    /// Enemies past this y end the match
    pub defense_line: f64,
    /// Where enemies appear
    pub spawn_y: f64,
    /// Archetype the spawner creates
    pub spawn_kind: EnemyKind,

    // === Controls ===
    /// Fast-forward at match start
    pub speed: Speed,
    pub selection: SelectionPolicy,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            starting_ledger: STARTING_LEDGER,

            lanes: LANES.to_vec(),
            defense_line: DEFENSE_LINE,
            spawn_y: SPAWN_Y,
            spawn_kind: EnemyKind::Normal,

            speed: Speed::X1,
            selection: SelectionPolicy::LastMatch,
        }
    }
}

impl Settings {
    /// Parse settings from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        if settings.lanes.is_empty() {
            return Err(SettingsError::NoLanes);
        }
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults when the file is missing or bad
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings ({e})");
                Self::default()
            }
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
