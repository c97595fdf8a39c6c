//! One match plus everything the input and presentation layers talk to
//!
//! Input arrives as normalized requests (placement drags, clicks, speed
//! changes). Failed requests are dropped silently; the request simply does
//! not take effect. Once per frame the host calls [`Session::frame`] and
//! draws from the returned [`Snapshot`].

use glam::DVec2;

use crate::ranking::{
    RANKING_SHOWN, RankingEntry, ScoreSubmission, ScoreTransport, SubmissionError, SubmitOutcome,
    Submitter, TransportError,
};
use crate::regions::{Selection, UpgradeButton, pick, upgrade_button};
use crate::scheduler::{FixedStepScheduler, FrameReport, Speed};
use crate::settings::{SelectionPolicy, Settings};
use crate::sim::{
    EffectMarker, Enemy, GameState, ScoreBreakdown, Tower, TowerKind, calculate_score, place_tower,
    upgrade_tower,
};

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub towers: &'a [Tower],
    pub enemies: &'a [Enemy],
    pub markers: &'a [EffectMarker],
    pub ledger: i64,
    pub seconds: u64,
    pub game_over: bool,
    pub paused: bool,
    pub speed: Speed,
    pub selection: Option<Selection>,
    /// Tower kind being dragged, if a placement is in progress
    pub placing: Option<TowerKind>,
    pub upgrade_button: Option<UpgradeButton>,
    pub score: ScoreBreakdown,
    /// Last fetched ranking, best first
    pub ranking: &'a [RankingEntry],
}

#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    scheduler: FixedStepScheduler,
    policy: SelectionPolicy,
    selection: Option<Selection>,
    placing: Option<TowerKind>,
    submitter: Submitter,
    ranking: Vec<RankingEntry>,
}

impl Session {
    pub fn new(settings: &Settings) -> Self {
        log::info!(
            "New match: seed {}, {} lanes, speed {}",
            settings.seed,
            settings.lanes.len(),
            settings.speed.label()
        );
        Self {
            state: GameState::with_settings(settings),
            scheduler: FixedStepScheduler::new(settings.speed),
            policy: settings.selection,
            selection: None,
            placing: None,
            submitter: Submitter::default(),
            ranking: Vec::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Gameplay freezes while something is inspected or being placed
    pub fn is_paused(&self) -> bool {
        self.selection.is_some() || self.placing.is_some()
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn set_speed(&mut self, speed: Speed) {
        self.scheduler.set_speed(speed);
    }

    /// Feed one render callback's wall-clock delta (seconds)
    pub fn frame(&mut self, dt: f64) -> FrameReport {
        let paused = self.is_paused();
        self.scheduler.advance(&mut self.state, dt, paused)
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot {
            towers: &self.state.towers,
            enemies: &self.state.enemies,
            markers: &self.state.markers,
            ledger: self.state.ledger,
            seconds: self.state.seconds,
            game_over: self.state.game_over,
            paused: self.is_paused(),
            speed: self.scheduler.speed(),
            selection: self.selection,
            placing: self.placing,
            upgrade_button: upgrade_button(&self.state, self.selection),
            score: calculate_score(&self.state),
            ranking: &self.ranking,
        }
    }

    /// Start dragging a tower kind onto the field
    pub fn begin_placement(&mut self, kind: TowerKind) {
        self.placing = Some(kind);
    }

    /// Drop the dragged tower; the interaction ends either way
    pub fn finish_placement(&mut self, x: f64, y: f64) -> Option<u32> {
        let kind = self.placing.take()?;
        match place_tower(&mut self.state, kind, DVec2::new(x, y)) {
            Ok(id) => Some(id),
            Err(reason) => {
                log::debug!("Placement of {} ignored: {reason}", kind.as_str());
                None
            }
        }
    }

    pub fn cancel_placement(&mut self) {
        self.placing = None;
    }

    /// A click on the field.
    ///
    /// A click on the enabled upgrade control of the selected tower upgrades
    /// it and keeps the selection. Any other click re-selects.
    pub fn click(&mut self, x: f64, y: f64) {
        let point = DVec2::new(x, y);
        self.placing = None;

        if let Some(button) = upgrade_button(&self.state, self.selection) {
            if button.enabled && button.rect.contains(point) {
                if let Err(reason) = upgrade_tower(&mut self.state, button.tower) {
                    log::debug!("Upgrade of tower #{} ignored: {reason}", button.tower);
                }
                return;
            }
        }

        self.selection = pick(&self.state, point, self.policy);
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn score(&self) -> ScoreBreakdown {
        calculate_score(&self.state)
    }

    /// Send the final score once the match is over.
    ///
    /// A successful send refreshes the ranking; a failed refresh keeps the
    /// previous one.
    pub fn submit_score<T: ScoreTransport>(
        &mut self,
        transport: &mut T,
        name: &str,
        comment: &str,
        api_key: &str,
    ) -> Result<SubmitOutcome, SubmissionError> {
        if !self.state.game_over {
            return Err(SubmissionError::MatchInProgress);
        }
        let submission =
            ScoreSubmission::new(name, comment, api_key, self.score().total, &self.state.log)?;
        let outcome = self.submitter.submit(transport, &submission)?;
        if let Err(e) = self.fetch_ranking(transport) {
            log::warn!("Ranking refresh failed: {e}");
        }
        Ok(outcome)
    }

    /// Pull the current ranking and keep the top rows for display
    pub fn fetch_ranking<T: ScoreTransport>(
        &mut self,
        transport: &mut T,
    ) -> Result<&[RankingEntry], TransportError> {
        let mut ranking = transport.fetch_ranking()?;
        ranking.truncate(RANKING_SHOWN);
        self.ranking = ranking;
        Ok(&self.ranking)
    }

    pub fn ranking(&self) -> &[RankingEntry] {
        &self.ranking
    }

    pub fn submitter(&self) -> &Submitter {
        &self.submitter
    }
}
