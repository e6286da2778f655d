//! Tabu search: steepest descent with short-term memory of recent moves.

use std::sync::{Arc, Mutex};

use crate::error::SearchError;
use crate::model::{Evaluation, Move, Neighbourhood, Problem, Validation};
use crate::search::{NeighbourhoodSearchCore, SearchAlgorithm, SearchCore};

use super::tabu_memory::TabuMemory;

/// Steepest-descent-style search guided by a [`TabuMemory`]: at every step,
/// enumerates the full neighbourhood, discards moves the memory marks
/// tabu (unless a move satisfies the aspiration criterion — it would beat
/// the best solution found so far), and applies the best surviving move.
///
/// If every candidate is tabu and none qualifies for aspiration, the search
/// stops rather than forcing a move through. This is a deliberate choice:
/// some tabu search variants fall back to the least-bad tabu move instead,
/// but that loosens the memory's guarantee and is not what this
/// implementation does.
pub struct TabuSearch<P: Problem, N: Neighbourhood<P>> {
    neighbourhood: N,
    ns: NeighbourhoodSearchCore<P>,
    memory: Mutex<Box<dyn TabuMemory<P>>>,
}

impl<P: Problem + 'static, N: Neighbourhood<P>> TabuSearch<P, N> {
    /// Builds a tabu search guided by `memory`. If `initial_solution` is
    /// given, it becomes the current (and, if valid and improving, best)
    /// solution immediately; otherwise a random solution is generated on
    /// `start()`.
    pub fn new(
        problem: Arc<P>,
        neighbourhood: N,
        initial_solution: Option<P::Solution>,
        memory: Box<dyn TabuMemory<P>>,
    ) -> Self {
        let core = Arc::new(SearchCore::new(problem));
        let ns = NeighbourhoodSearchCore::new(core);
        if let Some(initial_solution) = initial_solution {
            ns.local().set_current_solution(initial_solution);
        }
        Self {
            neighbourhood,
            ns,
            memory: Mutex::new(memory),
        }
    }

    /// The underlying neighbourhood search core.
    pub fn core_state(&self) -> &NeighbourhoodSearchCore<P> {
        &self.ns
    }
}

impl<P: Problem + 'static, N: Neighbourhood<P>> SearchAlgorithm<P> for TabuSearch<P, N> {
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
            SearchError::Configuration("tabu search started with no current solution".into())
        })?;
        let best_so_far = self.ns.core().best().map(|(_, eval)| eval.value());

        let candidates = self.neighbourhood.all_moves(&solution);
        let memory = self.memory.lock().unwrap();

        let mut chosen: Option<(P::Move, P::Evaluation, P::Validation)> = None;
        for mv in &candidates {
            let candidate_validation = self.ns.validate_move(&solution, mv, &validation)?;
            if !candidate_validation.passed() {
                continue;
            }
            let candidate_evaluation = self.ns.evaluate_move(&solution, mv, &evaluation)?;

            if memory.is_tabu(mv, &solution) {
                let aspires = match best_so_far {
                    Some(best) => {
                        if self.core().problem().is_minimizing() {
                            candidate_evaluation.value() < best
                        } else {
                            candidate_evaluation.value() > best
                        }
                    }
                    None => true,
                };
                if !aspires {
                    continue;
                }
            }

            let better = chosen.as_ref().is_none_or(|(_, current, _)| {
                self.core().direction_delta(candidate_evaluation.value(), current.value()) > 0.0
            });
            if better {
                chosen = Some((mv.clone(), candidate_evaluation, candidate_validation));
            }
        }
        drop(memory);

        let Some((mv, candidate_evaluation, candidate_validation)) = chosen else {
            self.core().stop();
            return Ok(());
        };

        let delta = self.core().direction_delta(candidate_evaluation.value(), evaluation.value());
        let mut next = solution.clone();
        mv.apply(&mut next);
        self.memory.lock().unwrap().register_visited_solution(&next, &mv);
        let improved = self.ns.accept_move(next, candidate_evaluation, candidate_validation);
        self.core().record_step(delta, improved);
        Ok(())
    }
}
