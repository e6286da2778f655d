//! Per-run metadata tracked by a search.

use std::time::{Duration, Instant};

/// Bookkeeping for a single `start()..stop()` run.
///
/// Sentinel fields (no steps taken yet, no improvement yet) are modeled with
/// `Option` rather than magic numbers, so absence is enforced by the type
/// system instead of by convention.
#[derive(Debug, Clone, Default)]
pub struct RunMetadata {
    /// When the current run started, if it has started.
    pub start_time: Option<Instant>,
    /// Steps completed so far in the current run.
    pub steps_taken: u64,
    /// Step index at which the best-so-far solution was last improved.
    pub last_improvement_step: Option<u64>,
    /// Time at which the best-so-far solution was last improved.
    pub last_improvement_time: Option<Instant>,
    /// Evaluation delta of the most recent step, if one has completed.
    pub last_delta: Option<f64>,
    /// Smallest positive delta that has produced a new best solution this
    /// run, if any improvement has happened yet.
    pub min_delta: Option<f64>,
}

impl RunMetadata {
    /// Resets all fields to their pre-run state and stamps `start_time`.
    pub fn start(&mut self, now: Instant) {
        *self = RunMetadata {
            start_time: Some(now),
            ..Default::default()
        };
    }

    /// Elapsed time since the run started, or `None` before it has.
    pub fn elapsed(&self, now: Instant) -> Option<Duration> {
        self.start_time.map(|t| now.saturating_duration_since(t))
    }

    /// Time elapsed since the last recorded improvement, or `None` if there
    /// has been no improvement yet this run.
    pub fn time_since_improvement(&self, now: Instant) -> Option<Duration> {
        self.last_improvement_time
            .map(|t| now.saturating_duration_since(t))
    }

    /// Steps completed since the last recorded improvement, or `None` if
    /// there has been no improvement yet this run.
    pub fn steps_since_improvement(&self) -> Option<u64> {
        self.last_improvement_step
            .map(|s| self.steps_taken.saturating_sub(s))
    }

    /// Records that a step has completed, with the given evaluation delta
    /// and whether it produced a new best solution.
    pub fn record_step(&mut self, now: Instant, delta: f64, improved: bool) {
        self.steps_taken += 1;
        self.last_delta = Some(delta);
        if improved {
            self.last_improvement_step = Some(self.steps_taken);
            self.last_improvement_time = Some(now);
        }
    }

    /// Folds a newly-observed positive improvement delta into `min_delta`.
    pub fn record_min_delta(&mut self, delta: f64) {
        self.min_delta = Some(match self.min_delta {
            None => delta,
            Some(current) => current.min(delta),
        });
    }
}
