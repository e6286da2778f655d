//! Parallel tempering: several Metropolis replicas at different
//! temperatures, periodically swapping states.

use std::sync::{Arc, Mutex};

use rand::Rng;

use crate::error::SearchError;
use crate::model::{Evaluation, Move, Neighbourhood, Problem, Validation};
use crate::search::{NeighbourhoodSearchCore, SearchAlgorithm, SearchCore};

struct Replica<P: Problem> {
    temperature: f64,
    solution: P::Solution,
    evaluation: P::Evaluation,
    validation: P::Validation,
}

/// Runs several Metropolis chains ("replicas") concurrently, one per
/// rung of a fixed temperature ladder, advancing all of them by one move
/// each step on scoped worker threads and then attempting a swap between
/// adjacent rungs. Replicas are joined before the step returns, so a
/// caller that calls [`crate::search::Search::stop`] between steps always
/// sees a consistent, fully-advanced state.
pub struct ParallelTempering<P: Problem, N: Neighbourhood<P> + Sync> {
    neighbourhood: N,
    ns: NeighbourhoodSearchCore<P>,
    temperature_ladder: Vec<f64>,
    replicas: Mutex<Vec<Replica<P>>>,
}

impl<P: Problem + 'static, N: Neighbourhood<P> + Sync> ParallelTempering<P, N> {
    /// Builds a parallel tempering search with one replica per entry in
    /// `temperature_ladder`. If `initial_solution` is given, every replica
    /// starts from a clone of it, and it becomes the current (and, if
    /// valid and improving, best) solution immediately; otherwise a random
    /// solution is generated on `start()` and used to seed every replica.
    pub fn new(
        problem: Arc<P>,
        neighbourhood: N,
        initial_solution: Option<P::Solution>,
        temperature_ladder: Vec<f64>,
    ) -> Self {
        let core = Arc::new(SearchCore::new(problem));
        let ns = NeighbourhoodSearchCore::new(core);

        let replicas = match &initial_solution {
            Some(initial_solution) => {
                ns.local().set_current_solution(initial_solution.clone());
                Self::seed_replicas(&ns, &temperature_ladder, initial_solution)
            }
            None => Vec::new(),
        };

        Self {
            neighbourhood,
            ns,
            temperature_ladder,
            replicas: Mutex::new(replicas),
        }
    }

    fn seed_replicas(ns: &NeighbourhoodSearchCore<P>, temperature_ladder: &[f64], solution: &P::Solution) -> Vec<Replica<P>> {
        let evaluation = ns.core().problem().evaluate(solution);
        let validation = ns.core().problem().validate(solution);
        temperature_ladder
            .iter()
            .map(|&temperature| Replica {
                temperature,
                solution: solution.clone(),
                evaluation: evaluation.clone(),
                validation: validation.clone(),
            })
            .collect()
    }

    /// The underlying neighbourhood search core.
    pub fn core_state(&self) -> &NeighbourhoodSearchCore<P> {
        &self.ns
    }

    fn advance_replica(&self, replica: &mut Replica<P>) -> Result<(), SearchError> {
        let mut rng = rand::rng();
        let Some(mv) = self.neighbourhood.random_move(&replica.solution, &mut rng) else {
            return Ok(());
        };
        let candidate_validation = self.ns.validate_move(&replica.solution, &mv, &replica.validation)?;
        if !candidate_validation.passed() {
            return Ok(());
        }
        let candidate_evaluation = self.ns.evaluate_move(&replica.solution, &mv, &replica.evaluation)?;
        let delta = self.core_state().core().direction_delta(candidate_evaluation.value(), replica.evaluation.value());
        let worsening = delta < 0.0;

        let accept = if !worsening {
            true
        } else if replica.temperature <= 0.0 {
            false
        } else {
            let probability = (-delta.abs() / replica.temperature).exp();
            rng.random::<f64>() < probability
        };

        if accept {
            mv.apply(&mut replica.solution);
            replica.evaluation = candidate_evaluation;
            replica.validation = candidate_validation;
        }
        Ok(())
    }

    fn attempt_swaps(&self, replicas: &mut [Replica<P>]) {
        let minimizing = self.core_state().core().problem().is_minimizing();
        let mut rng = rand::rng();
        for i in 0..replicas.len().saturating_sub(1) {
            let (left, right) = replicas.split_at_mut(i + 1);
            let a = &left[i];
            let b = &right[0];
            let diff = if minimizing {
                a.evaluation.value() - b.evaluation.value()
            } else {
                b.evaluation.value() - a.evaluation.value()
            };
            let inv_temp_delta = 1.0 / a.temperature - 1.0 / b.temperature;
            let exponent = diff * inv_temp_delta;
            let swap = exponent >= 0.0 || rng.random::<f64>() < exponent.exp();
            if swap {
                // Temperatures stay pinned to their rung; only the
                // solution/evaluation/validation triples migrate between rungs.
                std::mem::swap(&mut replicas[i].solution, &mut replicas[i + 1].solution);
                std::mem::swap(&mut replicas[i].evaluation, &mut replicas[i + 1].evaluation);
                std::mem::swap(&mut replicas[i].validation, &mut replicas[i + 1].validation);
            }
        }
    }
}

impl<P: Problem + 'static, N: Neighbourhood<P> + Sync> SearchAlgorithm<P> for ParallelTempering<P, N> {
    fn core(&self) -> &Arc<SearchCore<P>> {
        self.ns.core()
    }

    fn on_search_started(&self) -> Result<(), SearchError> {
        if self.ns.local().has_current_solution() {
            return Ok(());
        }
        let mut rng = rand::rng();
        let solution = self.core().problem().create_random_solution(&mut rng);
        self.ns.local().set_current_solution(solution.clone());
        *self.replicas.lock().unwrap() = Self::seed_replicas(&self.ns, &self.temperature_ladder, &solution);
        Ok(())
    }

    fn search_step(&self) -> Result<(), SearchError> {
        let mut replicas = self.replicas.lock().unwrap();

        let step_results: Vec<Result<(), SearchError>> = std::thread::scope(|scope| {
            let handles: Vec<_> = replicas
                .iter_mut()
                .map(|replica| scope.spawn(|| self.advance_replica(replica)))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for result in step_results {
            result?;
        }

        self.attempt_swaps(&mut replicas);

        let mut any_improved = false;
        for replica in replicas.iter() {
            let improved =
                self.ns
                    .core()
                    .update_best_solution(replica.solution.clone(), replica.evaluation.clone(), &replica.validation);
            any_improved |= improved;
        }
        self.core().record_step(0.0, any_improved);
        Ok(())
    }
}
