//! Game state and core simulation types
//!
//! Everything a tick reads or writes lives in [`GameState`]; there are no
//! ambient globals.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::actions::ActionLog;
use super::rng::ParkMiller;
use crate::consts::*;
use crate::settings::Settings;

/// Tower archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TowerKind {
    /// Hits one enemy in range every second
    Normal,
    /// Generates ledger income, never attacks
    Producer,
    /// Slows enemies down
    Stone,
    /// Stacks poison on enemies
    Venom,
}

impl TowerKind {
    pub const ALL: [TowerKind; 4] = [
        TowerKind::Normal,
        TowerKind::Producer,
        TowerKind::Stone,
        TowerKind::Venom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TowerKind::Normal => "normal",
            TowerKind::Producer => "producer",
            TowerKind::Stone => "stone",
            TowerKind::Venom => "venom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "normal" => Some(TowerKind::Normal),
            "producer" => Some(TowerKind::Producer),
            "stone" => Some(TowerKind::Stone),
            "venom" => Some(TowerKind::Venom),
            _ => None,
        }
    }
}

/// Enemy archetypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    #[default]
    Normal,
    Fast,
    Tank,
}

/// Base stats of an enemy archetype before difficulty scaling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyBase {
    pub hp: f64,
    pub speed: f64,
    pub desc: &'static str,
}

impl EnemyKind {
    pub fn base(&self) -> EnemyBase {
        match self {
            EnemyKind::Normal => EnemyBase {
                hp: 10.0,
                speed: 0.1,
                desc: "An ordinary horse",
            },
            EnemyKind::Fast => EnemyBase {
                hp: 7.0,
                speed: 0.2,
                desc: "A quick horse",
            },
            EnemyKind::Tank => EnemyBase {
                hp: 25.0,
                speed: 0.05,
                desc: "A sturdy horse",
            },
        }
    }
}

/// A player-placed tower
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tower {
    pub id: u32,
    pub kind: TowerKind,
    pub level: u32,
    pub pos: DVec2,
    /// Ticks this tower has been alive; gates its periodic effects
    pub timer: u64,
    /// Simulation tick the tower was placed on
    pub placed_tick: u64,
}

/// A lane-walking enemy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: DVec2,
    pub hp: f64,
    pub max_hp: f64,
    /// Base speed in units per tick
    pub speed: f64,
    /// Current speed multiplier (1 = unaffected)
    pub slow: f64,
    /// Ticks until the slow wears off
    pub slow_ticks: u32,
    /// HP drained every tick; only ever grows
    pub poison: f64,
}

impl Enemy {
    /// Effective movement this tick
    pub fn current_speed(&self) -> f64 {
        self.speed * self.slow
    }

    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }
}

/// Marker flavor, so the presentation layer can color them
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MarkerKind {
    Damage,
    Income,
}

/// Floating text marker (damage numbers, income ticks); not gameplay-affecting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectMarker {
    pub kind: MarkerKind,
    pub pos: DVec2,
    pub text: String,
    pub life: u32,
}

impl EffectMarker {
    pub fn new(kind: MarkerKind, pos: DVec2, text: String) -> Self {
        Self {
            kind,
            pos,
            text,
            life: MARKER_LIFE_TICKS,
        }
    }

    /// Opacity in [0, 1] for fading out
    pub fn alpha(&self) -> f64 {
        self.life as f64 / MARKER_LIFE_TICKS as f64
    }
}

/// Playfield geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub lanes: Vec<f64>,
    pub defense_line: f64,
    pub spawn_y: f64,
}

/// Complete match state (deterministic given seed and actions)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Match seed for reproducibility
    pub seed: u64,
    /// The only source of gameplay randomness
    pub rng: ParkMiller,
    pub field: Field,
    /// Archetype the spawn director creates
    pub spawn_kind: EnemyKind,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Whole simulated seconds survived
    pub seconds: u64,
    /// Spendable currency
    pub ledger: i64,
    /// Set once, when an enemy crosses the defense line
    pub game_over: bool,
    /// Towers in placement order
    pub towers: Vec<Tower>,
    /// Live enemies in spawn order
    pub enemies: Vec<Enemy>,
    /// Floating markers (not gameplay-affecting)
    #[serde(skip)]
    pub markers: Vec<EffectMarker>,
    /// Towers ever placed; never decreases
    pub towers_placed: u64,
    /// Enemies ever defeated; never decreases
    pub enemies_defeated: u64,
    /// Placement/upgrade record for audit
    pub log: ActionLog,
    next_enemy_id: u32,
}

impl GameState {
    /// Create a new match with default settings and the given seed
    pub fn new(seed: u64) -> Self {
        let settings = Settings {
            seed,
            ..Settings::default()
        };
        Self::with_settings(&settings)
    }

    /// Create a new match from settings
    pub fn with_settings(settings: &Settings) -> Self {
        Self {
            seed: settings.seed,
            rng: ParkMiller::new(settings.seed),
            field: Field {
                lanes: settings.lanes.clone(),
                defense_line: settings.defense_line,
                spawn_y: settings.spawn_y,
            },
            spawn_kind: settings.spawn_kind,
            time_ticks: 0,
            seconds: 0,
            ledger: settings.starting_ledger,
            game_over: false,
            towers: Vec::new(),
            enemies: Vec::new(),
            markers: Vec::new(),
            towers_placed: 0,
            enemies_defeated: 0,
            log: ActionLog::default(),
            next_enemy_id: 1,
        }
    }

    /// Allocate a new enemy ID
    pub fn next_enemy_id(&mut self) -> u32 {
        let id = self.next_enemy_id;
        self.next_enemy_id += 1;
        id
    }

    pub fn tower(&self, id: u32) -> Option<&Tower> {
        self.towers.iter().find(|t| t.id == id)
    }

    pub fn enemy(&self, id: u32) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }
}
