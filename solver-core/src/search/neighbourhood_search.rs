//! Neighbourhood search: adds move evaluation/acceptance bookkeeping on top
//! of [`LocalSearchCore`].

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::SearchError;
use crate::model::{Evaluation, Problem, Validation};

use super::local::LocalSearchCore;
use super::SearchCore;

/// Wraps a [`LocalSearchCore`] with move evaluation helpers and
/// accepted/rejected move counters, shared by every algorithm that works
/// by generating and judging candidate moves (as opposed to
/// [`crate::algorithms::PipedLocalSearch`], which only composes other
/// searches).
pub struct NeighbourhoodSearchCore<P: Problem> {
    local: LocalSearchCore<P>,
    accepted: AtomicU64,
    rejected: AtomicU64,
}

impl<P: Problem + 'static> NeighbourhoodSearchCore<P> {
    /// Builds a neighbourhood search core around `core`.
    pub fn new(core: Arc<SearchCore<P>>) -> Self {
        Self {
            local: LocalSearchCore::new(core),
            accepted: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// The underlying local search core.
    pub fn local(&self) -> &LocalSearchCore<P> {
        &self.local
    }

    /// The shared lifecycle core.
    pub fn core(&self) -> &Arc<SearchCore<P>> {
        self.local.core()
    }

    /// Number of moves accepted so far.
    pub fn accepted_count(&self) -> u64 {
        self.accepted.load(Ordering::Relaxed)
    }

    /// Number of moves rejected so far.
    pub fn rejected_count(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    /// Delta-evaluates `mv` against `solution`, given its prior evaluation.
    pub fn evaluate_move(
        &self,
        solution: &P::Solution,
        mv: &P::Move,
        prior: &P::Evaluation,
    ) -> Result<P::Evaluation, SearchError> {
        self.core().compute_delta(solution, mv, prior)
    }

    /// Delta-validates `mv` against `solution`, given its prior validation.
    pub fn validate_move(
        &self,
        solution: &P::Solution,
        mv: &P::Move,
        prior: &P::Validation,
    ) -> Result<P::Validation, SearchError> {
        self.core().compute_validation_delta(solution, mv, prior)
    }

    /// Whether a candidate landing on `(candidate_evaluation,
    /// candidate_validation)` counts as an improvement over a baseline of
    /// `(baseline_evaluation, baseline_validation)`.
    ///
    /// An invalid candidate is never an improvement. Any valid candidate is
    /// an improvement over an invalid baseline, regardless of value: leaving
    /// an infeasible state for a feasible one is always progress. Otherwise,
    /// compares direction-adjusted value.
    pub fn is_improvement(
        &self,
        candidate_evaluation: &P::Evaluation,
        candidate_validation: &P::Validation,
        baseline_evaluation: &P::Evaluation,
        baseline_validation: &P::Validation,
    ) -> bool {
        if !candidate_validation.passed() {
            return false;
        }
        if !baseline_validation.passed() {
            return true;
        }
        self.core()
            .direction_delta(candidate_evaluation.value(), baseline_evaluation.value())
            > 0.0
    }

    /// Given a list of candidate moves and the solution/evaluation/
    /// validation they would be applied from, delta-evaluates each and
    /// returns the best valid one, if any qualify.
    ///
    /// When `improvement_required` is `true`, only candidates that are an
    /// improvement over `(prior_evaluation, prior_validation)` (per
    /// [`NeighbourhoodSearchCore::is_improvement`]) qualify, matching
    /// steepest-descent-style algorithms that must stop at a local optimum.
    /// When `false`, every valid candidate qualifies, and the best among
    /// them is chosen by raw direction-adjusted value.
    pub fn best_move(
        &self,
        solution: &P::Solution,
        moves: &[P::Move],
        prior_evaluation: &P::Evaluation,
        prior_validation: &P::Validation,
        improvement_required: bool,
    ) -> Result<Option<(P::Move, P::Evaluation, P::Validation)>, SearchError> {
        let mut best: Option<(P::Move, P::Evaluation, P::Validation)> = None;
        for mv in moves {
            let validation = self.validate_move(solution, mv, prior_validation)?;
            if !validation.passed() {
                continue;
            }
            let evaluation = self.evaluate_move(solution, mv, prior_evaluation)?;
            if improvement_required
                && !self.is_improvement(&evaluation, &validation, prior_evaluation, prior_validation)
            {
                continue;
            }
            let improves = best.as_ref().is_none_or(|(_, current, _)| {
                self.core().direction_delta(evaluation.value(), current.value()) > 0.0
            });
            if improves {
                best = Some((mv.clone(), evaluation, validation));
            }
        }
        Ok(best)
    }

    /// Accepts `mv`'s resulting `(solution, evaluation, validation)` as the
    /// new current solution (and, if it passes validation and improves on
    /// the best-so-far, the new best), incrementing the accepted-move
    /// counter.
    pub fn accept_move(&self, solution: P::Solution, evaluation: P::Evaluation, validation: P::Validation) -> bool {
        self.accepted.fetch_add(1, Ordering::Relaxed);
        self.local.update_current_and_best_solution(solution, evaluation, validation)
    }

    /// Records that a candidate move was rejected, without changing the
    /// current solution.
    pub fn reject_move(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }
}
