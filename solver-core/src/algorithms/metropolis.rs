//! Metropolis / simulated annealing acceptance.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rand::Rng;

use crate::error::SearchError;
use crate::model::{Evaluation, Move, Neighbourhood, Problem, Validation};
use crate::search::{NeighbourhoodSearchCore, SearchAlgorithm, SearchCore};

/// Geometric cooling schedule: `temperature *= cooling_rate` after every
/// step, down to (but never below) `min_temperature`.
#[derive(Debug, Clone, Copy)]
pub struct CoolingSchedule {
    pub initial_temperature: f64,
    pub cooling_rate: f64,
    pub min_temperature: f64,
}

/// Simulated annealing over a single neighbourhood: always accepts
/// improving moves, and accepts worsening moves with Metropolis
/// probability `exp(-|delta| / temperature)`, cooling the temperature
/// after every step.
pub struct Metropolis<P: Problem, N: Neighbourhood<P>> {
    neighbourhood: N,
    ns: NeighbourhoodSearchCore<P>,
    schedule: CoolingSchedule,
    temperature_bits: AtomicU64,
}

impl<P: Problem + 'static, N: Neighbourhood<P>> Metropolis<P, N> {
    /// Builds a Metropolis search. If `initial_solution` is given, it
    /// becomes the current (and, if valid and improving, best) solution
    /// immediately; otherwise a random solution is generated on `start()`.
    pub fn new(
        problem: Arc<P>,
        neighbourhood: N,
        initial_solution: Option<P::Solution>,
        schedule: CoolingSchedule,
    ) -> Self {
        let core = Arc::new(SearchCore::new(problem));
        let ns = NeighbourhoodSearchCore::new(core);
        if let Some(initial_solution) = initial_solution {
            ns.local().set_current_solution(initial_solution);
        }
        Self {
            neighbourhood,
            ns,
            schedule,
            temperature_bits: AtomicU64::new(schedule.initial_temperature.to_bits()),
        }
    }

    /// The underlying neighbourhood search core.
    pub fn core_state(&self) -> &NeighbourhoodSearchCore<P> {
        &self.ns
    }

    /// The current annealing temperature.
    pub fn temperature(&self) -> f64 {
        f64::from_bits(self.temperature_bits.load(Ordering::Relaxed))
    }

    fn cool(&self) {
        let next = (self.temperature() * self.schedule.cooling_rate).max(self.schedule.min_temperature);
        self.temperature_bits.store(next.to_bits(), Ordering::Relaxed);
    }
}

impl<P: Problem + 'static, N: Neighbourhood<P>> SearchAlgorithm<P> for Metropolis<P, N> {
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
            SearchError::Configuration("metropolis search started with no current solution".into())
        })?;

        let mut rng = rand::rng();
        let Some(mv) = self.neighbourhood.random_move(&solution, &mut rng) else {
            self.core().stop();
            return Ok(());
        };

        let candidate_validation = self.ns.validate_move(&solution, &mv, &validation)?;
        if !candidate_validation.passed() {
            self.ns.reject_move();
            self.core().record_step(0.0, false);
            return Ok(());
        }

        let candidate_evaluation = self.ns.evaluate_move(&solution, &mv, &evaluation)?;
        let delta = self.core().direction_delta(candidate_evaluation.value(), evaluation.value());
        let worsening = delta < 0.0;

        let accept = if !worsening {
            true
        } else {
            let temperature = self.temperature();
            if temperature <= 0.0 {
                false
            } else {
                let acceptance_probability = (-delta.abs() / temperature).exp();
                rng.random::<f64>() < acceptance_probability
            }
        };

        if accept {
            let mut next = solution.clone();
            mv.apply(&mut next);
            let improved = self.ns.accept_move(next, candidate_evaluation, candidate_validation);
            self.core().record_step(delta, improved);
        } else {
            self.ns.reject_move();
            self.core().record_step(delta, false);
        }
        self.cool();
        Ok(())
    }
}
