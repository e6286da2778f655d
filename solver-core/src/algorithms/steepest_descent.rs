//! Steepest descent: always takes the best move in the full neighbourhood.

use std::sync::Arc;

use crate::error::SearchError;
use crate::model::{Evaluation, Move, Neighbourhood, Problem};
use crate::search::{NeighbourhoodSearchCore, SearchAlgorithm, SearchCore};

/// At every step, enumerates the entire neighbourhood of the current
/// solution and applies the best valid improving move found, or stops if
/// none improves. Deterministic given a deterministic neighbourhood and
/// problem, and self-terminating: it halts on a local optimum without
/// needing an external stop criterion.
pub struct SteepestDescent<P: Problem, N: Neighbourhood<P>> {
    neighbourhood: N,
    ns: NeighbourhoodSearchCore<P>,
}

impl<P: Problem + 'static, N: Neighbourhood<P>> SteepestDescent<P, N> {
    /// Builds a steepest descent search. If `initial_solution` is given, it
    /// becomes the current (and, if valid and improving, best) solution
    /// immediately; otherwise a random solution is generated on `start()`.
    pub fn new(problem: Arc<P>, neighbourhood: N, initial_solution: Option<P::Solution>) -> Self {
        let core = Arc::new(SearchCore::new(problem));
        let ns = NeighbourhoodSearchCore::new(core);
        if let Some(initial_solution) = initial_solution {
            ns.local().set_current_solution(initial_solution);
        }
        Self { neighbourhood, ns }
    }

    /// The underlying neighbourhood search core.
    pub fn core_state(&self) -> &NeighbourhoodSearchCore<P> {
        &self.ns
    }
}

impl<P: Problem + 'static, N: Neighbourhood<P>> super::Reseedable<P> for SteepestDescent<P, N> {
    fn reseed(&self, solution: P::Solution, evaluation: P::Evaluation, validation: P::Validation) {
        self.ns.local().update_current_solution(solution, evaluation, validation);
    }
}

impl<P: Problem + 'static, N: Neighbourhood<P>> SearchAlgorithm<P> for SteepestDescent<P, N> {
    fn core(&self) -> &Arc<SearchCore<P>> {
        self.ns.core()
    }

    fn on_search_started(&self) -> Result<(), SearchError> {
        let mut rng = rand::rng();
        self.ns.local().ensure_current_solution(&mut rng);
        Ok(())
    }

    fn search_step(&self) -> Result<(), SearchError> {
        let (solution, evaluation, validation) = self.ns.local().current().ok_or_else(|| {
            SearchError::Configuration("steepest descent started with no current solution".into())
        })?;

        let candidates = self.neighbourhood.all_moves(&solution);
        let best = self
            .ns
            .best_move(&solution, &candidates, &evaluation, &validation, true)?;

        let Some((mv, candidate_evaluation, candidate_validation)) = best else {
            self.core().stop();
            return Ok(());
        };

        let delta = self.core().direction_delta(candidate_evaluation.value(), evaluation.value());
        let mut next = solution.clone();
        mv.apply(&mut next);
        let improved = self.ns.accept_move(next, candidate_evaluation, candidate_validation);
        self.core().record_step(delta, improved);
        Ok(())
    }
}
