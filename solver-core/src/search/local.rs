//! Local search: adds a retained current solution to [`SearchCore`].

use std::sync::{Arc, Mutex};

use rand::RngCore;

use crate::model::Problem;

use super::SearchCore;

/// Wraps a [`SearchCore`] with the extra state every local search needs: a
/// retained current (working) solution, distinct from the best-so-far
/// solution tracked by the core, paired with its evaluation and validation.
pub struct LocalSearchCore<P: Problem> {
    core: Arc<SearchCore<P>>,
    current: Mutex<Option<(P::Solution, P::Evaluation, P::Validation)>>,
}

impl<P: Problem + 'static> LocalSearchCore<P> {
    /// Builds a local search core around `core`, with no current solution
    /// set yet.
    pub fn new(core: Arc<SearchCore<P>>) -> Self {
        Self {
            core,
            current: Mutex::new(None),
        }
    }

    /// The shared lifecycle core.
    pub fn core(&self) -> &Arc<SearchCore<P>> {
        &self.core
    }

    /// The current working solution, its evaluation, and its validation, if
    /// one has been set yet.
    pub fn current(&self) -> Option<(P::Solution, P::Evaluation, P::Validation)> {
        self.current.lock().unwrap().clone()
    }

    /// Whether a current working solution has been set yet.
    pub fn has_current_solution(&self) -> bool {
        self.current.lock().unwrap().is_some()
    }

    /// Installs `solution` (with already-computed `evaluation` and
    /// `validation`) as the current working solution outright, without
    /// consulting the best-so-far tracking. Notifies listeners.
    pub fn update_current_solution(
        &self,
        solution: P::Solution,
        evaluation: P::Evaluation,
        validation: P::Validation,
    ) {
        self.core.notify_current_solution(&solution, &evaluation);
        *self.current.lock().unwrap() = Some((solution, evaluation, validation));
    }

    /// Evaluates and validates `solution` from scratch, installs it as the
    /// current working solution, and updates the best-so-far solution if it
    /// passes validation and improves. Used at construction time, when an
    /// algorithm is given an explicit initial solution.
    pub fn set_current_solution(&self, solution: P::Solution) -> bool {
        let evaluation = self.core.problem().evaluate(&solution);
        let validation = self.core.problem().validate(&solution);
        let improved = self
            .core
            .update_best_solution(solution.clone(), evaluation.clone(), &validation);
        self.update_current_solution(solution, evaluation, validation);
        improved
    }

    /// Installs `solution` with its already-computed `evaluation` and
    /// `validation` as current and, if it passes validation and improves,
    /// also records it as the new best. Returns whether it was recorded as
    /// a new best.
    pub fn update_current_and_best_solution(
        &self,
        solution: P::Solution,
        evaluation: P::Evaluation,
        validation: P::Validation,
    ) -> bool {
        let improved = self
            .core
            .update_best_solution(solution.clone(), evaluation.clone(), &validation);
        self.update_current_solution(solution, evaluation, validation);
        improved
    }

    /// Generates a uniformly-random solution and installs it as current if
    /// no current solution has been set yet; a no-op otherwise. Called from
    /// `on_search_started`, so random initialisation is a state test rather
    /// than a constructor-time decision.
    pub fn ensure_current_solution(&self, rng: &mut dyn RngCore) {
        if self.has_current_solution() {
            return;
        }
        let solution = self.core.problem().create_random_solution(rng);
        self.set_current_solution(solution);
    }
}
