//! Variable neighbourhood search: shakes the current solution, then hands
//! it to an inner local search to re-descend to a local optimum.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::error::SearchError;
use crate::listener::{SearchInfo, SearchStatus};
use crate::model::{Evaluation, Move, Neighbourhood, Problem};
use crate::search::{NeighbourhoodSearchCore, Search, SearchAlgorithm, SearchCore};
use crate::stop_criteria::StopCriterion;

use super::Reseedable;

/// Stops the inner search as soon as the outer VNS run has been asked to
/// stop, so a shake-and-descend cycle in progress winds down instead of
/// outliving the search that started it.
struct OuterTerminating<P: Problem> {
    outer: Arc<SearchCore<P>>,
}

impl<P: Problem + 'static> StopCriterion<P> for OuterTerminating<P> {
    fn should_stop(&self, _info: &dyn SearchInfo<P>) -> bool {
        self.outer.status() == SearchStatus::Terminating
    }
}

/// Perturbs ("shakes") the current solution with a random move from a
/// shaking neighbourhood, then runs `inner` — a complete local search with
/// its own attached stop criteria — to re-descend from the perturbed
/// solution. If the inner search's result improves on the current
/// solution, it is accepted and shaking restarts from the first
/// neighbourhood; otherwise the next shaking neighbourhood is tried,
/// wrapping back to the first once the last has been tried, so that a run
/// only ever ends via an externally attached stop criterion.
pub struct Vns<P: Problem, L: Reseedable<P>> {
    shake_neighbourhoods: Vec<Box<dyn Neighbourhood<P>>>,
    inner: L,
    ns: NeighbourhoodSearchCore<P>,
    index: AtomicUsize,
}

impl<P: Problem + 'static, L: Reseedable<P>> Vns<P, L> {
    /// Builds a VNS search, shaking through `shake_neighbourhoods` and
    /// re-descending with `inner`. If `initial_solution` is given, it
    /// becomes the current (and, if valid and improving, best) solution
    /// immediately; otherwise a random solution is generated on `start()`.
    pub fn new(
        problem: Arc<P>,
        shake_neighbourhoods: Vec<Box<dyn Neighbourhood<P>>>,
        inner: L,
        initial_solution: Option<P::Solution>,
    ) -> Self {
        let core = Arc::new(SearchCore::new(problem));
        let ns = NeighbourhoodSearchCore::new(core);
        if let Some(initial_solution) = initial_solution {
            ns.local().set_current_solution(initial_solution);
        }
        inner
            .add_stop_criterion(Arc::new(OuterTerminating { outer: Arc::clone(ns.core()) }))
            .expect("an outer-terminating stop criterion is compatible with every search");
        Self {
            shake_neighbourhoods,
            inner,
            ns,
            index: AtomicUsize::new(0),
        }
    }

    /// The underlying neighbourhood search core.
    pub fn core_state(&self) -> &NeighbourhoodSearchCore<P> {
        &self.ns
    }
}

impl<P: Problem + 'static, L: Reseedable<P>> SearchAlgorithm<P> for Vns<P, L> {
    fn core(&self) -> &Arc<SearchCore<P>> {
        self.ns.core()
    }

    fn on_search_started(&self) -> Result<(), SearchError> {
        let mut rng = rand::rng();
        self.ns.local().ensure_current_solution(&mut rng);
        Ok(())
    }

    fn on_search_disposed(&self) {
        let _ = self.inner.dispose();
    }

    fn search_step(&self) -> Result<(), SearchError> {
        if self.shake_neighbourhoods.is_empty() {
            return Err(SearchError::Configuration(
                "variable neighbourhood search requires at least one shaking neighbourhood".into(),
            ));
        }

        let (solution, evaluation, validation) = self.ns.local().current().ok_or_else(|| {
            SearchError::Configuration("VNS started with no current solution".into())
        })?;

        let index = self.index.load(Ordering::Relaxed);
        let mut rng = rand::rng();
        let Some(shake_move) = self.shake_neighbourhoods[index].random_move(&solution, &mut rng) else {
            self.ns.reject_move();
            self.index.store((index + 1) % self.shake_neighbourhoods.len(), Ordering::Relaxed);
            self.core().record_step(0.0, false);
            return Ok(());
        };

        let mut shaken = solution.clone();
        shake_move.apply(&mut shaken);
        let shaken_evaluation = self.core().problem().evaluate(&shaken);
        let shaken_validation = self.core().problem().validate(&shaken);

        self.inner.reseed(shaken, shaken_evaluation, shaken_validation);
        self.inner.start()?;

        let Some((candidate, candidate_evaluation)) = self.inner.best_solution() else {
            self.ns.reject_move();
            self.index.store((index + 1) % self.shake_neighbourhoods.len(), Ordering::Relaxed);
            self.core().record_step(0.0, false);
            return Ok(());
        };

        let candidate_validation = self.core().problem().validate(&candidate);

        if self
            .ns
            .is_improvement(&candidate_evaluation, &candidate_validation, &evaluation, &validation)
        {
            let delta = self.core().direction_delta(candidate_evaluation.value(), evaluation.value());
            let improved = self.ns.accept_move(candidate, candidate_evaluation, candidate_validation);
            self.index.store(0, Ordering::Relaxed);
            self.core().record_step(delta, improved);
        } else {
            self.ns.reject_move();
            self.index.store((index + 1) % self.shake_neighbourhoods.len(), Ordering::Relaxed);
            self.core().record_step(0.0, false);
        }
        Ok(())
    }
}
