//! Piped local search: chains several searches, each starting from the
//! previous one's result.

use std::sync::Arc;

use crate::error::SearchError;
use crate::model::{Evaluation, Problem, Validation};
use crate::search::{LocalSearchCore, Search, SearchAlgorithm, SearchCore};

use super::Reseedable;

/// Runs a fixed sequence of sub-searches once per step, feeding each
/// sub-search's best result forward as the next sub-search's starting
/// solution. If a full pass through the whole pipe improves on the
/// solution it started from, the improved solution becomes current and
/// another pass begins; otherwise the piped search stops, since a further
/// pass starting from the same solution would repeat the same work.
pub struct PipedLocalSearch<P: Problem> {
    stages: Vec<Box<dyn Reseedable<P>>>,
    local: LocalSearchCore<P>,
}

impl<P: Problem + 'static> PipedLocalSearch<P> {
    /// Builds a piped local search, running `stages` in order on every
    /// pass. If `initial_solution` is given, it becomes the current (and,
    /// if valid and improving, best) solution immediately; otherwise a
    /// random solution is generated on `start()`.
    pub fn new(problem: Arc<P>, stages: Vec<Box<dyn Reseedable<P>>>, initial_solution: Option<P::Solution>) -> Self {
        let core = Arc::new(SearchCore::new(problem));
        let local = LocalSearchCore::new(core);
        if let Some(initial_solution) = initial_solution {
            local.set_current_solution(initial_solution);
        }
        Self { stages, local }
    }

    /// The underlying local search core.
    pub fn local(&self) -> &LocalSearchCore<P> {
        &self.local
    }
}

impl<P: Problem + 'static> SearchAlgorithm<P> for PipedLocalSearch<P> {
    fn core(&self) -> &Arc<SearchCore<P>> {
        self.local.core()
    }

    fn on_search_started(&self) -> Result<(), SearchError> {
        let mut rng = rand::rng();
        self.local.ensure_current_solution(&mut rng);
        Ok(())
    }

    fn search_step(&self) -> Result<(), SearchError> {
        if self.stages.is_empty() {
            return Err(SearchError::Configuration(
                "piped local search requires at least one stage".into(),
            ));
        }

        let (solution, evaluation, validation) = self.local.current().ok_or_else(|| {
            SearchError::Configuration("piped local search started with no current solution".into())
        })?;

        let mut pipeline_solution = solution.clone();
        let mut pipeline_evaluation = evaluation.clone();
        let mut pipeline_validation = validation.clone();
        for stage in &self.stages {
            stage.reseed(pipeline_solution.clone(), pipeline_evaluation.clone(), pipeline_validation.clone());
            stage.start()?;
            if let Some((next_solution, next_evaluation)) = stage.best_solution() {
                pipeline_validation = self.core().problem().validate(&next_solution);
                pipeline_solution = next_solution;
                pipeline_evaluation = next_evaluation;
            }
        }

        let improved_pass = self
            .core()
            .direction_delta(pipeline_evaluation.value(), evaluation.value())
            > 0.0
            && pipeline_validation.passed();

        if improved_pass {
            let delta = self.core().direction_delta(pipeline_evaluation.value(), evaluation.value());
            let improved_best =
                self.local
                    .update_current_and_best_solution(pipeline_solution, pipeline_evaluation, pipeline_validation);
            self.core().record_step(delta, improved_best);
        } else {
            self.core().stop();
            self.core().record_step(0.0, false);
        }
        Ok(())
    }
}
