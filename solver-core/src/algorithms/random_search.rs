//! Random search: repeatedly samples independent random solutions.

use std::sync::Arc;

use crate::error::SearchError;
use crate::model::{Evaluation, Problem};
use crate::search::{LocalSearchCore, SearchAlgorithm, SearchCore};

/// The simplest baseline algorithm: at every step, draws a fresh random
/// solution from the problem and keeps it as current, recording it as the
/// new best if it qualifies. Performs no local moves at all, so it is
/// typically used only as a baseline to measure other algorithms against.
pub struct RandomSearch<P: Problem> {
    local: LocalSearchCore<P>,
}

impl<P: Problem + 'static> RandomSearch<P> {
    /// Builds a random search over `problem`.
    pub fn new(problem: Arc<P>) -> Self {
        Self {
            local: LocalSearchCore::new(Arc::new(SearchCore::new(problem))),
        }
    }

    /// The underlying local search core.
    pub fn local(&self) -> &LocalSearchCore<P> {
        &self.local
    }
}

impl<P: Problem + 'static> SearchAlgorithm<P> for RandomSearch<P> {
    fn core(&self) -> &Arc<SearchCore<P>> {
        self.local.core()
    }

    fn on_search_started(&self) -> Result<(), SearchError> {
        let mut rng = rand::rng();
        self.local.ensure_current_solution(&mut rng);
        Ok(())
    }

    fn search_step(&self) -> Result<(), SearchError> {
        let mut rng = rand::rng();
        let solution = self.core().problem().create_random_solution(&mut rng);
        let evaluation = self.core().problem().evaluate(&solution);
        let validation = self.core().problem().validate(&solution);
        let delta = match self.local.current() {
            Some((_, prior, _)) => self.core().direction_delta(evaluation.value(), prior.value()),
            None => 0.0,
        };
        let improved = self.local.update_current_and_best_solution(solution, evaluation, validation);
        self.core().record_step(delta, improved);
        Ok(())
    }
}
