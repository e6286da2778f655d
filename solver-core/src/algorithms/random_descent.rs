//! Random descent: accepts the first improving random move it finds.

use std::sync::Arc;

use crate::error::SearchError;
use crate::model::{Evaluation, Move, Neighbourhood, Problem};
use crate::search::{NeighbourhoodSearchCore, SearchAlgorithm, SearchCore};

/// At every step, draws one random move from the neighbourhood and accepts
/// it if it is an improvement (any valid move from an invalid current
/// counts as one); otherwise the move is rejected and the current solution
/// is left unchanged. Stops itself once the neighbourhood can no longer
/// produce a move for the current solution.
pub struct RandomDescent<P: Problem, N: Neighbourhood<P>> {
    neighbourhood: N,
    ns: NeighbourhoodSearchCore<P>,
}

impl<P: Problem + 'static, N: Neighbourhood<P>> RandomDescent<P, N> {
    /// Builds a random descent search. If `initial_solution` is given, it
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

impl<P: Problem + 'static, N: Neighbourhood<P>> SearchAlgorithm<P> for RandomDescent<P, N> {
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
            SearchError::Configuration("random descent started with no current solution".into())
        })?;

        let mut rng = rand::rng();
        let Some(mv) = self.neighbourhood.random_move(&solution, &mut rng) else {
            self.core().stop();
            return Ok(());
        };

        let candidate_validation = self.ns.validate_move(&solution, &mv, &validation)?;
        let candidate_evaluation = self.ns.evaluate_move(&solution, &mv, &evaluation)?;

        if self
            .ns
            .is_improvement(&candidate_evaluation, &candidate_validation, &evaluation, &validation)
        {
            let delta = self.core().direction_delta(candidate_evaluation.value(), evaluation.value());
            let mut next = solution.clone();
            mv.apply(&mut next);
            let improved = self.ns.accept_move(next, candidate_evaluation, candidate_validation);
            self.core().record_step(delta, improved);
        } else {
            self.ns.reject_move();
            self.core().record_step(0.0, false);
        }
        Ok(())
    }
}
