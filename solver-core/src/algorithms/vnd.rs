//! Variable neighbourhood descent: cycles through an ordered list of
//! neighbourhoods, restarting from the first on any improvement.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::SearchError;
use crate::model::{Evaluation, Move, Neighbourhood, Problem};
use crate::search::{NeighbourhoodSearchCore, SearchAlgorithm, SearchCore};

/// At every step, runs steepest descent within the current neighbourhood
/// index. An improving move restarts the index at `0`; exhausting a
/// neighbourhood without improvement advances to the next one. Stops once
/// every neighbourhood in the list fails to improve in sequence, which
/// marks a local optimum with respect to the whole list.
pub struct Vnd<P: Problem> {
    neighbourhoods: Vec<Box<dyn Neighbourhood<P>>>,
    ns: NeighbourhoodSearchCore<P>,
    index: AtomicUsize,
}

impl<P: Problem + 'static> Vnd<P> {
    /// Builds a VND search, ordered per `neighbourhoods`. If
    /// `initial_solution` is given, it becomes the current (and, if valid
    /// and improving, best) solution immediately; otherwise a random
    /// solution is generated on `start()`.
    pub fn new(
        problem: Arc<P>,
        neighbourhoods: Vec<Box<dyn Neighbourhood<P>>>,
        initial_solution: Option<P::Solution>,
    ) -> Self {
        let core = Arc::new(SearchCore::new(problem));
        let ns = NeighbourhoodSearchCore::new(core);
        if let Some(initial_solution) = initial_solution {
            ns.local().set_current_solution(initial_solution);
        }
        Self {
            neighbourhoods,
            ns,
            index: AtomicUsize::new(0),
        }
    }

    /// The underlying neighbourhood search core.
    pub fn core_state(&self) -> &NeighbourhoodSearchCore<P> {
        &self.ns
    }
}

impl<P: Problem + 'static> super::Reseedable<P> for Vnd<P> {
    fn reseed(&self, solution: P::Solution, evaluation: P::Evaluation, validation: P::Validation) {
        self.index.store(0, Ordering::Relaxed);
        self.ns.local().update_current_solution(solution, evaluation, validation);
    }
}

impl<P: Problem + 'static> SearchAlgorithm<P> for Vnd<P> {
    fn core(&self) -> &Arc<SearchCore<P>> {
        self.ns.core()
    }

    fn on_search_started(&self) -> Result<(), SearchError> {
        let mut rng = rand::rng();
        self.ns.local().ensure_current_solution(&mut rng);
        Ok(())
    }

    fn search_step(&self) -> Result<(), SearchError> {
        if self.neighbourhoods.is_empty() {
            return Err(SearchError::Configuration(
                "variable neighbourhood descent requires at least one neighbourhood".into(),
            ));
        }

        let (solution, evaluation, validation) = self.ns.local().current().ok_or_else(|| {
            SearchError::Configuration("VND started with no current solution".into())
        })?;

        let index = self.index.load(Ordering::Relaxed);
        let candidates = self.neighbourhoods[index].all_moves(&solution);
        let best = self
            .ns
            .best_move(&solution, &candidates, &evaluation, &validation, true)?;

        match best {
            Some((mv, candidate_evaluation, candidate_validation)) => {
                let delta = self.core().direction_delta(candidate_evaluation.value(), evaluation.value());
                let mut next = solution.clone();
                mv.apply(&mut next);
                let improved = self.ns.accept_move(next, candidate_evaluation, candidate_validation);
                self.index.store(0, Ordering::Relaxed);
                self.core().record_step(delta, improved);
            }
            None => {
                self.ns.reject_move();
                let next_index = index + 1;
                if next_index >= self.neighbourhoods.len() {
                    self.core().stop();
                } else {
                    self.index.store(next_index, Ordering::Relaxed);
                }
                self.core().record_step(0.0, false);
            }
        }
        Ok(())
    }
}
