//! Append-only record of player actions
//!
//! Serialized into the `record` field of a score submission so a match can
//! be audited later. The JSON shape (`action` tag, `type`, `frame`) is what
//! the ranking service already stores.

use serde::{Deserialize, Serialize};

use super::state::TowerKind;

/// One player action, stamped with the simulation tick it happened on
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Action {
    #[serde(rename = "placeSnake")]
    Place {
        id: u32,
        x: f64,
        y: f64,
        #[serde(rename = "type")]
        kind: TowerKind,
        level: u32,
        frame: u64,
    },
    #[serde(rename = "upgradeSnake")]
    Upgrade {
        id: u32,
        #[serde(rename = "type")]
        kind: TowerKind,
        level: u32,
        frame: u64,
    },
}

impl Action {
    pub fn frame(&self) -> u64 {
        match self {
            Action::Place { frame, .. } | Action::Upgrade { frame, .. } => *frame,
        }
    }
}

/// Action log; entries can be appended but never edited
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionLog {
    entries: Vec<Action>,
}

impl ActionLog {
    pub fn push(&mut self, action: Action) {
        debug_assert!(
            self.entries.last().is_none_or(|last| last.frame() <= action.frame()),
            "action log must stay in tick order"
        );
        self.entries.push(action);
    }

    pub fn entries(&self) -> &[Action] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// JSON array as sent in the `record` submission field
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.entries)
    }
}
