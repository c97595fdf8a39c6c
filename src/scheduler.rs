//! Fixed-timestep driver
//!
//! Wall-clock frame deltas go into an accumulator; every whole tick duration
//! in it runs `speed` simulation steps. The tick duration itself never
//! changes, fast-forward only repeats steps.

use serde::{Deserialize, Serialize};

use crate::consts::TICK_SECONDS;
use crate::sim::{GameState, tick};

/// Player-selectable fast-forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speed {
    #[default]
    X1,
    X2,
    X3,
}

impl Speed {
    /// Simulation steps per consumed tick duration
    pub fn steps(&self) -> u32 {
        match self {
            Speed::X1 => 1,
            Speed::X2 => 2,
            Speed::X3 => 3,
        }
    }

    pub fn from_multiplier(n: u32) -> Option<Self> {
        match n {
            1 => Some(Speed::X1),
            2 => Some(Speed::X2),
            3 => Some(Speed::X3),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Speed::X1 => "x1",
            Speed::X2 => "x2",
            Speed::X3 => "x3",
        }
    }
}

/// What one frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameReport {
    /// Tick durations drained from the accumulator
    pub ticks_consumed: u32,
    /// Simulation steps that actually ran
    pub steps_run: u32,
}

#[derive(Debug, Clone, Default)]
pub struct FixedStepScheduler {
    accumulator: f64,
    speed: Speed,
}

impl FixedStepScheduler {
    pub fn new(speed: Speed) -> Self {
        Self {
            accumulator: 0.0,
            speed,
        }
    }

    pub fn speed(&self) -> Speed {
        self.speed
    }

    pub fn set_speed(&mut self, speed: Speed) {
        log::debug!("Speed set to {}", speed.label());
        self.speed = speed;
    }

    /// Unconsumed wall-clock time in seconds
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }

    /// Feed one frame's wall-clock delta.
    ///
    /// While `paused` the accumulator still drains but no step runs, so
    /// gameplay resumes exactly where it stopped. Steps after game over are
    /// no-ops inside [`tick`].
    pub fn advance(&mut self, state: &mut GameState, dt: f64, paused: bool) -> FrameReport {
        let mut report = FrameReport::default();
        if dt.is_finite() && dt > 0.0 {
            self.accumulator += dt;
        }

        while self.accumulator >= TICK_SECONDS {
            self.accumulator -= TICK_SECONDS;
            report.ticks_consumed += 1;
            if paused {
                continue;
            }
            for _ in 0..self.speed.steps() {
                if tick(state) {
                    report.steps_run += 1;
                }
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_partial_frames() {
        let mut state = GameState::new(1);
        let mut scheduler = FixedStepScheduler::new(Speed::X1);

        let report = scheduler.advance(&mut state, TICK_SECONDS * 0.5, false);
        assert_eq!(report.steps_run, 0);
        let report = scheduler.advance(&mut state, TICK_SECONDS * 0.75, false);
        assert_eq!(report.steps_run, 1);
        assert_eq!(state.time_ticks, 1);
        assert!(scheduler.accumulator() < TICK_SECONDS);
    }

    #[test]
    fn test_speed_multiplies_steps() {
        let mut state = GameState::new(1);
        let mut scheduler = FixedStepScheduler::new(Speed::X3);
        let report = scheduler.advance(&mut state, TICK_SECONDS * 2.5, false);
        assert_eq!(report.ticks_consumed, 2);
        assert_eq!(report.steps_run, 6);
        assert_eq!(state.time_ticks, 6);
    }

    #[test]
    fn test_pause_drains_without_stepping() {
        let mut state = GameState::new(1);
        let mut scheduler = FixedStepScheduler::new(Speed::X2);
        let report = scheduler.advance(&mut state, 1.0, true);
        assert!(report.ticks_consumed >= 59);
        assert_eq!(report.steps_run, 0);
        assert_eq!(state.time_ticks, 0);
        assert!(scheduler.accumulator() < TICK_SECONDS);
    }

    #[test]
    fn test_bad_deltas_ignored() {
        let mut state = GameState::new(1);
        let mut scheduler = FixedStepScheduler::default();
        scheduler.advance(&mut state, f64::NAN, false);
        scheduler.advance(&mut state, -1.0, false);
        assert_eq!(scheduler.accumulator(), 0.0);
    }

    #[test]
    fn test_speed_multiplier_values() {
        assert_eq!(Speed::from_multiplier(2), Some(Speed::X2));
        assert_eq!(Speed::from_multiplier(4), None);
        assert_eq!(Speed::X3.steps(), 3);
    }
}
