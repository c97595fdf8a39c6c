//! Score submission and the ranking service model
//!
//! The ranking service keeps one row per player name and only ever raises a
//! stored score. [`Leaderboard`] reproduces its behavior in-process; clients
//! talk to it (or to the real endpoint) through a [`ScoreTransport`].

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::ActionLog;

/// Highest score the service accepts
pub const MAX_SCORE: f64 = 10_000_000.0;

/// Rows the result screen shows
pub const RANKING_SHOWN: usize = 10;

/// Headers attached to every service response
pub const CORS_HEADERS: [(&str, &str); 3] = [
    ("Access-Control-Allow-Origin", "*"),
    ("Access-Control-Allow-Methods", "GET, POST, OPTIONS"),
    ("Access-Control-Allow-Headers", "Content-Type"),
];

/// Result of a POST, serialized as `{"result": "...", ...}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "lowercase")]
pub enum SubmitOutcome {
    Created {
        name: String,
        score: f64,
    },
    Updated {
        name: String,
        #[serde(rename = "oldScore")]
        old_score: f64,
        #[serde(rename = "newScore")]
        new_score: f64,
    },
    Ignored {
        name: String,
        #[serde(rename = "oldScore")]
        old_score: f64,
        #[serde(rename = "attemptedScore")]
        attempted_score: f64,
    },
    Error {
        message: String,
    },
}

/// One ranking line as returned by GET
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub name: String,
    pub score: f64,
}

/// A stored row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRow {
    pub name: String,
    pub score: f64,
    /// Unix timestamp (ms) of the last write
    pub timestamp: f64,
}

/// A service reply as handed to the HTTP host
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceResponse {
    pub headers: &'static [(&'static str, &'static str)],
    /// JSON body
    pub body: String,
}

impl ServiceResponse {
    fn json<T: Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        Ok(Self {
            headers: &CORS_HEADERS,
            body: serde_json::to_string(value)?,
        })
    }
}

/// The service's table, in insertion order
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub rows: Vec<RankingRow>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Record a validated score for `name`
    pub fn submit(&mut self, name: &str, score: f64, timestamp: f64) -> SubmitOutcome {
        if name.is_empty() || !score.is_finite() || !(0.0..=MAX_SCORE).contains(&score) {
            return invalid();
        }

        if let Some(row) = self.rows.iter_mut().find(|r| r.name == name) {
            let old_score = row.score;
            if score > old_score {
                row.score = score;
                row.timestamp = timestamp;
                log::info!("Ranking: {name} improved {old_score} -> {score}");
                return SubmitOutcome::Updated {
                    name: name.to_string(),
                    old_score,
                    new_score: score,
                };
            }
            return SubmitOutcome::Ignored {
                name: name.to_string(),
                old_score,
                attempted_score: score,
            };
        }

        self.rows.push(RankingRow {
            name: name.to_string(),
            score,
            timestamp,
        });
        log::info!("Ranking: new entry {name} with {score}");
        SubmitOutcome::Created {
            name: name.to_string(),
            score,
        }
    }

    /// Handle a POST body given as decoded form fields
    pub fn handle_post<'a, I>(&mut self, fields: I, timestamp: f64) -> SubmitOutcome
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut name = None;
        let mut score = None;
        for (key, value) in fields {
            match key {
                "name" => name = Some(value),
                "score" => score = value.trim().parse::<f64>().ok(),
                _ => {}
            }
        }
        match (name, score) {
            (Some(name), Some(score)) => self.submit(name, score, timestamp),
            _ => invalid(),
        }
    }

    /// Full ranking, highest score first
    pub fn ranking(&self) -> Vec<RankingEntry> {
        let mut entries: Vec<RankingEntry> = self
            .rows
            .iter()
            .map(|r| RankingEntry {
                name: r.name.clone(),
                score: r.score,
            })
            .collect();
        entries.sort_by(|a, b| b.score.total_cmp(&a.score));
        entries
    }

    /// Reply to a GET: the full ranking as a JSON array
    pub fn get_response(&self) -> Result<ServiceResponse, serde_json::Error> {
        ServiceResponse::json(&self.ranking())
    }

    /// Reply to a POST: the outcome object
    pub fn post_response<'a, I>(
        &mut self,
        fields: I,
        timestamp: f64,
    ) -> Result<ServiceResponse, serde_json::Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        ServiceResponse::json(&self.handle_post(fields, timestamp))
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<f64> {
        self.ranking().first().map(|e| e.score)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

fn invalid() -> SubmitOutcome {
    SubmitOutcome::Error {
        message: "invalid parameters".to_string(),
    }
}

/// Milliseconds since the Unix epoch
pub fn now_millis() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as f64)
        .unwrap_or(0.0)
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SubmissionError {
    #[error("a name is required")]
    EmptyName,
    #[error("the match is still running")]
    MatchInProgress,
    #[error("score was already submitted")]
    AlreadySent,
    #[error("could not serialize action log: {0}")]
    Record(String),
    #[error("send failed: {0}")]
    Transport(String),
}

/// Transport failure reported by a [`ScoreTransport`]
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{0}")]
pub struct TransportError(pub String);

/// Carries a submission to the ranking service
pub trait ScoreTransport {
    fn post(&mut self, fields: &[(&'static str, String)]) -> Result<SubmitOutcome, TransportError>;
    fn fetch_ranking(&mut self) -> Result<Vec<RankingEntry>, TransportError>;
}

impl ScoreTransport for Leaderboard {
    fn post(&mut self, fields: &[(&'static str, String)]) -> Result<SubmitOutcome, TransportError> {
        let now = now_millis();
        Ok(self.handle_post(fields.iter().map(|(k, v)| (*k, v.as_str())), now))
    }

    fn fetch_ranking(&mut self) -> Result<Vec<RankingEntry>, TransportError> {
        Ok(self.ranking())
    }
}

/// Payload of a score POST
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreSubmission {
    pub name: String,
    pub score: i64,
    pub comment: String,
    pub api_key: String,
    /// Serialized action log
    pub record: String,
}

impl ScoreSubmission {
    pub fn new(
        name: &str,
        comment: &str,
        api_key: &str,
        score: i64,
        log: &ActionLog,
    ) -> Result<Self, SubmissionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SubmissionError::EmptyName);
        }
        let record = log
            .to_json()
            .map_err(|e| SubmissionError::Record(e.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            score,
            comment: comment.trim().to_string(),
            api_key: api_key.to_string(),
            record,
        })
    }

    /// Form fields in the order the service expects them
    pub fn form_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("name", self.name.clone()),
            ("score", self.score.to_string()),
            ("comment", self.comment.clone()),
            ("apiKey", self.api_key.clone()),
            ("record", self.record.clone()),
        ]
    }
}

/// Client-side submission progress. `Sent` and `Failed` are terminal.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SubmissionState {
    #[default]
    Idle,
    Sending,
    Sent(SubmitOutcome),
    Failed(String),
}

/// Sends at most one score per match
#[derive(Debug, Clone, Default)]
pub struct Submitter {
    state: SubmissionState,
}

impl Submitter {
    pub fn state(&self) -> &SubmissionState {
        &self.state
    }

    pub fn submit<T: ScoreTransport>(
        &mut self,
        transport: &mut T,
        submission: &ScoreSubmission,
    ) -> Result<SubmitOutcome, SubmissionError> {
        if self.state != SubmissionState::Idle {
            return Err(SubmissionError::AlreadySent);
        }
        self.state = SubmissionState::Sending;

        match transport.post(&submission.form_fields()) {
            Ok(outcome) => {
                log::info!("Score sent for {}: {:?}", submission.name, outcome);
                self.state = SubmissionState::Sent(outcome.clone());
                Ok(outcome)
            }
            Err(e) => {
                log::warn!("Score submission failed: {e}");
                self.state = SubmissionState::Failed(e.0.clone());
                Err(SubmissionError::Transport(e.0))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Offline;

    impl ScoreTransport for Offline {
        fn post(&mut self, _: &[(&'static str, String)]) -> Result<SubmitOutcome, TransportError> {
            Err(TransportError("connection refused".into()))
        }

        fn fetch_ranking(&mut self) -> Result<Vec<RankingEntry>, TransportError> {
            Err(TransportError("connection refused".into()))
        }
    }

    #[test]
    fn test_create_update_ignore() {
        let mut board = Leaderboard::new();
        assert_eq!(
            board.submit("alice", 50.0, 1.0),
            SubmitOutcome::Created {
                name: "alice".into(),
                score: 50.0
            }
        );
        assert_eq!(
            board.submit("alice", 40.0, 2.0),
            SubmitOutcome::Ignored {
                name: "alice".into(),
                old_score: 50.0,
                attempted_score: 40.0
            }
        );
        assert_eq!(board.rows[0].score, 50.0);
        assert_eq!(board.rows[0].timestamp, 1.0);

        assert_eq!(
            board.submit("alice", 70.0, 3.0),
            SubmitOutcome::Updated {
                name: "alice".into(),
                old_score: 50.0,
                new_score: 70.0
            }
        );
        assert_eq!(board.rows[0].score, 70.0);
        assert_eq!(board.rows[0].timestamp, 3.0);

        // Equal is not higher
        assert!(matches!(
            board.submit("alice", 70.0, 4.0),
            SubmitOutcome::Ignored { .. }
        ));
    }

    #[test]
    fn test_invalid_payloads() {
        let mut board = Leaderboard::new();
        for (name, score) in [("", "10"), ("bob", "-1"), ("bob", "10000001"), ("bob", "abc")] {
            let outcome = board.handle_post([("name", name), ("score", score)], 0.0);
            assert!(matches!(outcome, SubmitOutcome::Error { .. }));
        }
        let outcome = board.handle_post([("score", "10")], 0.0);
        assert!(matches!(outcome, SubmitOutcome::Error { .. }));
        assert!(board.is_empty());
    }

    #[test]
    fn test_ranking_sorted_descending() {
        let mut board = Leaderboard::new();
        board.submit("a", 10.0, 0.0);
        board.submit("b", 30.0, 0.0);
        board.submit("c", 20.0, 0.0);
        let names: Vec<_> = board.ranking().into_iter().map(|e| e.name).collect();
        assert_eq!(names, ["b", "c", "a"]);
        assert_eq!(board.top_score(), Some(30.0));
    }

    #[test]
    fn test_responses_carry_cors_headers() {
        let mut board = Leaderboard::new();
        let post = board
            .post_response([("name", "alice"), ("score", "42")], 0.0)
            .unwrap();
        assert_eq!(post.headers, &CORS_HEADERS);
        let json: serde_json::Value = serde_json::from_str(&post.body).unwrap();
        assert_eq!(json["result"], "created");
        assert_eq!(json["score"], 42.0);

        let get = board.get_response().unwrap();
        assert!(get.headers.contains(&("Access-Control-Allow-Origin", "*")));
        let rows: Vec<RankingEntry> = serde_json::from_str(&get.body).unwrap();
        assert_eq!(rows, board.ranking());
    }

    #[test]
    fn test_outcome_json_shape() {
        let outcome = SubmitOutcome::Updated {
            name: "a".into(),
            old_score: 1.0,
            new_score: 2.0,
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["result"], "updated");
        assert_eq!(json["oldScore"], 1.0);
        assert_eq!(json["newScore"], 2.0);
    }

    #[test]
    fn test_submission_fields() {
        let submission = ScoreSubmission::new("  alice ", " gg ", "key", 70, &ActionLog::default()).unwrap();
        let fields = submission.form_fields();
        assert_eq!(fields[0], ("name", "alice".to_string()));
        assert_eq!(fields[1], ("score", "70".to_string()));
        assert_eq!(fields[2], ("comment", "gg".to_string()));
        assert_eq!(fields[4], ("record", "[]".to_string()));

        assert_eq!(
            ScoreSubmission::new("   ", "", "key", 1, &ActionLog::default()),
            Err(SubmissionError::EmptyName)
        );
    }

    #[test]
    fn test_submitter_sends_once() {
        let mut board = Leaderboard::new();
        let mut submitter = Submitter::default();
        let submission = ScoreSubmission::new("alice", "", "key", 70, &ActionLog::default()).unwrap();

        let outcome = submitter.submit(&mut board, &submission).unwrap();
        assert!(matches!(outcome, SubmitOutcome::Created { .. }));
        assert_eq!(
            submitter.submit(&mut board, &submission),
            Err(SubmissionError::AlreadySent)
        );
        assert_eq!(board.rows.len(), 1);
    }

    #[test]
    fn test_failed_send_is_terminal() {
        let mut submitter = Submitter::default();
        let submission = ScoreSubmission::new("alice", "", "key", 70, &ActionLog::default()).unwrap();
        assert!(matches!(
            submitter.submit(&mut Offline, &submission),
            Err(SubmissionError::Transport(_))
        ));
        assert!(matches!(submitter.state(), SubmissionState::Failed(_)));
        assert_eq!(
            submitter.submit(&mut Offline, &submission),
            Err(SubmissionError::AlreadySent)
        );
    }
}
