//! Search lifecycle: the template shared by every concrete algorithm.

mod local;
mod neighbourhood_search;

pub use local::LocalSearchCore;
pub use neighbourhood_search::NeighbourhoodSearchCore;

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use log::{debug, info};

use crate::error::SearchError;
use crate::listener::{SearchInfo, SearchListener, SearchStatus};
use crate::metadata::RunMetadata;
use crate::model::{Evaluation, Problem, Validation};
use crate::stop_criteria::{StopCriterion, StopCriterionChecker};

/// The externally-visible lifecycle contract every search algorithm
/// exposes, regardless of which capability structs it is built from.
///
/// Parametrised only by `Problem` (not by the concrete algorithm type), so
/// callers that only need to drive a search — [`crate::algorithms::PipedLocalSearch`]
/// chaining several together, or a demo HTTP adapter holding a job queue —
/// can hold `Box<dyn Search<P>>` without caring which algorithm it is.
pub trait Search<P: Problem>: Send + Sync {
    /// Runs the search until a stop criterion fires or [`Search::stop`] is
    /// called from another thread. Blocks the calling thread for the
    /// duration of the run.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NotIdle`] if the search is not `Idle`.
    fn start(&self) -> Result<(), SearchError>;

    /// Requests that a running search transition to `Idle` as soon as the
    /// current step completes. Safe to call from a listener callback, a
    /// stop criterion, or another thread. A no-op if the search is not
    /// `Running`.
    fn stop(&self);

    /// Permanently retires the search. Only legal while `Idle`.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::NotIdle`] if the search is not `Idle`.
    fn dispose(&self) -> Result<(), SearchError>;

    /// Current lifecycle status.
    fn status(&self) -> SearchStatus;

    /// Metadata for the run in progress, or the most recently completed
    /// one.
    fn metadata(&self) -> RunMetadata;

    /// The best solution found so far, and its evaluation.
    fn best_solution(&self) -> Option<(P::Solution, P::Evaluation)>;

    /// Attaches a stop criterion.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Configuration`] if the criterion reports
    /// itself incompatible with this search.
    fn add_stop_criterion(&self, criterion: Arc<dyn StopCriterion<P>>) -> Result<(), SearchError>;

    /// Detaches a previously-attached stop criterion.
    fn remove_stop_criterion(&self, criterion: &Arc<dyn StopCriterion<P>>);

    /// Sets the background checker's polling period for subsequent runs.
    fn set_stop_criterion_check_period(&self, period: Duration);

    /// Attaches a search listener.
    fn add_search_listener(&self, listener: Arc<dyn SearchListener<P>>);

    /// Detaches a previously-attached search listener.
    fn remove_search_listener(&self, listener: &Arc<dyn SearchListener<P>>);
}

/// The per-step hook a concrete algorithm supplies. Everything else
/// (lifecycle, stop criteria, listener fan-out) is handled once by the
/// blanket [`Search`] implementation below.
pub trait SearchAlgorithm<P: Problem>: Send + Sync {
    /// The shared lifecycle state this algorithm is built on.
    fn core(&self) -> &Arc<SearchCore<P>>;

    /// Performs one unit of search work. Called repeatedly by the run loop
    /// until the core's status leaves `Running`.
    ///
    /// # Errors
    ///
    /// Any error returned here ends the run: the core transitions to
    /// `Terminating` and the error propagates out of [`Search::start`].
    fn search_step(&self) -> Result<(), SearchError>;

    /// Called once as the run transitions to `Running`, before the first
    /// `search_step`.
    fn on_search_started(&self) -> Result<(), SearchError> {
        Ok(())
    }

    /// Called once as the run transitions back to `Idle`.
    fn on_search_stopped(&self) {}

    /// Called once, permanently, as the search is disposed.
    fn on_search_disposed(&self) {}
}

/// Shared lifecycle state: status machine, best solution, per-run
/// metadata, listeners, and the stop-criterion checker.
///
/// Embedded (not inherited from) by [`LocalSearchCore`],
/// [`NeighbourhoodSearchCore`], and in turn by every concrete algorithm, per
/// the composition-over-inheritance redesign.
pub struct SearchCore<P: Problem> {
    problem: Arc<P>,
    status: Mutex<SearchStatus>,
    best: Mutex<Option<(P::Solution, P::Evaluation)>>,
    metadata: Mutex<RunMetadata>,
    listeners: Mutex<Vec<Arc<dyn SearchListener<P>>>>,
    checker: StopCriterionChecker<P>,
}

impl<P: Problem + 'static> SearchCore<P> {
    /// Builds a new, `Idle` core around `problem`.
    pub fn new(problem: Arc<P>) -> Self {
        Self {
            problem,
            status: Mutex::new(SearchStatus::Idle),
            best: Mutex::new(None),
            metadata: Mutex::new(RunMetadata::default()),
            listeners: Mutex::new(Vec::new()),
            checker: StopCriterionChecker::new(),
        }
    }

    /// The problem this search is solving.
    pub fn problem(&self) -> &P {
        &self.problem
    }

    /// Current lifecycle status.
    pub fn status(&self) -> SearchStatus {
        *self.status.lock().unwrap()
    }

    /// Snapshot of the current (or most recent) run's metadata.
    pub fn metadata(&self) -> RunMetadata {
        self.metadata.lock().unwrap().clone()
    }

    /// The best solution recorded so far, if any.
    pub fn best(&self) -> Option<(P::Solution, P::Evaluation)> {
        self.best.lock().unwrap().clone()
    }

    /// Returns an error unless the search is currently `Idle`.
    pub fn assert_idle(&self, context: &str) -> Result<(), SearchError> {
        if self.status() == SearchStatus::Idle {
            Ok(())
        } else {
            Err(SearchError::NotIdle(context.to_string()))
        }
    }

    /// Delegates to the problem's delta evaluation.
    pub fn compute_delta(
        &self,
        solution: &P::Solution,
        mv: &P::Move,
        prior: &P::Evaluation,
    ) -> Result<P::Evaluation, SearchError> {
        self.problem.evaluate_move(solution, mv, prior)
    }

    /// Delegates to the problem's delta validation.
    pub fn compute_validation_delta(
        &self,
        solution: &P::Solution,
        mv: &P::Move,
        prior: &P::Validation,
    ) -> Result<P::Validation, SearchError> {
        self.problem.validate_move(solution, mv, prior)
    }

    /// Direction-adjusted delta between `new_value` and `old_value`:
    /// positive whenever `new_value` improves on `old_value`, whether this
    /// problem minimizes or maximizes.
    pub fn direction_delta(&self, new_value: f64, old_value: f64) -> f64 {
        if self.problem.is_minimizing() {
            old_value - new_value
        } else {
            new_value - old_value
        }
    }

    /// Records `(solution, evaluation)` as the new best if `validation`
    /// passes and it improves (or ties, which does not count as an
    /// improvement) on the current best per the problem's optimization
    /// direction. Returns whether it was recorded as an improvement.
    ///
    /// Maintains the invariant that a recorded best always has a passing
    /// validation, and folds the improvement delta into the run's
    /// `min_delta` metric.
    pub fn update_best_solution(
        &self,
        solution: P::Solution,
        evaluation: P::Evaluation,
        validation: &P::Validation,
    ) -> bool {
        if !validation.passed() {
            return false;
        }
        let improved = {
            let mut best = self.best.lock().unwrap();
            let delta = best
                .as_ref()
                .map(|(_, current)| self.direction_delta(evaluation.value(), current.value()));
            let is_better = delta.is_none_or(|delta| delta > 0.0);
            if is_better {
                if let Some(delta) = delta {
                    self.metadata.lock().unwrap().record_min_delta(delta);
                }
                *best = Some((solution.clone(), evaluation.clone()));
            }
            is_better
        };
        if improved {
            self.notify_new_best(&solution, &evaluation);
        }
        improved
    }

    /// Attaches a stop criterion, probing it for compatibility with this
    /// search first.
    pub fn add_stop_criterion(&self, criterion: Arc<dyn StopCriterion<P>>) -> Result<(), SearchError> {
        if !criterion.is_compatible(self) {
            return Err(SearchError::Configuration(
                "stop criterion is not compatible with this search".into(),
            ));
        }
        self.checker.add_criterion(criterion);
        Ok(())
    }

    /// Detaches a stop criterion.
    pub fn remove_stop_criterion(&self, criterion: &Arc<dyn StopCriterion<P>>) {
        self.checker.remove_criterion(criterion);
    }

    /// Sets the checker's polling period for subsequent runs.
    pub fn set_stop_criterion_check_period(&self, period: Duration) {
        self.checker.set_check_period(period);
    }

    /// Attaches a listener.
    pub fn add_search_listener(&self, listener: Arc<dyn SearchListener<P>>) {
        self.listeners.lock().unwrap().push(listener);
    }

    /// Detaches a listener.
    pub fn remove_search_listener(&self, listener: &Arc<dyn SearchListener<P>>) {
        self.listeners
            .lock()
            .unwrap()
            .retain(|l| !Arc::ptr_eq(l, listener));
    }

    /// Records that a step completed with evaluation delta `delta`
    /// (new minus prior, per the problem's own scale) and whether it
    /// produced a new best solution, then notifies listeners.
    pub fn record_step(&self, delta: f64, improved: bool) {
        self.metadata
            .lock()
            .unwrap()
            .record_step(Instant::now(), delta, improved);
        self.notify_step_completed();
    }

    fn set_status(&self, new: SearchStatus) {
        let old = {
            let mut status = self.status.lock().unwrap();
            let old = *status;
            *status = new;
            old
        };
        if old != new {
            for listener in self.listeners.lock().unwrap().iter() {
                listener.status_changed(self, old, new);
            }
        }
    }

    fn notify_new_best(&self, solution: &P::Solution, evaluation: &P::Evaluation) {
        for listener in self.listeners.lock().unwrap().iter() {
            listener.new_best_solution(self, solution, evaluation);
        }
    }

    fn notify_step_completed(&self) {
        for listener in self.listeners.lock().unwrap().iter() {
            listener.step_completed(self);
        }
    }

    fn notify_started(&self) {
        for listener in self.listeners.lock().unwrap().iter() {
            listener.search_started(self);
        }
    }

    fn notify_stopped(&self) {
        for listener in self.listeners.lock().unwrap().iter() {
            listener.search_stopped(self);
        }
    }

    /// Emits a free-form diagnostic message to every attached listener.
    pub fn notify_message(&self, message: &str) {
        for listener in self.listeners.lock().unwrap().iter() {
            listener.search_message(self, message);
        }
    }

    /// Notifies listeners that the algorithm's current working solution has
    /// changed.
    pub fn notify_current_solution(&self, solution: &P::Solution, evaluation: &P::Evaluation) {
        for listener in self.listeners.lock().unwrap().iter() {
            listener.new_current_solution(self, solution, evaluation);
        }
    }
}

impl<P: Problem + 'static> SearchInfo<P> for SearchCore<P> {
    fn status(&self) -> SearchStatus {
        SearchCore::status(self)
    }

    fn metadata(&self) -> RunMetadata {
        SearchCore::metadata(self)
    }

    fn best(&self) -> Option<(P::Solution, P::Evaluation)> {
        SearchCore::best(self)
    }
}

impl<P: Problem + 'static, A: SearchAlgorithm<P>> Search<P> for A {
    fn start(&self) -> Result<(), SearchError> {
        let core = self.core();
        core.assert_idle("start() requires the search to be Idle")?;
        core.set_status(SearchStatus::Initializing);
        core.metadata.lock().unwrap().start(Instant::now());

        if let Err(error) = self.on_search_started() {
            core.set_status(SearchStatus::Idle);
            return Err(error);
        }

        if core.status() == SearchStatus::Terminating {
            // A stop was requested from within on_search_started itself;
            // the run ends here without a single search_step.
            self.on_search_stopped();
            core.set_status(SearchStatus::Idle);
            core.notify_stopped();
            debug!("search stopped before running, steps=0");
            return Ok(());
        }

        core.set_status(SearchStatus::Running);
        core.notify_started();
        info!("search started");

        let info_handle: Arc<dyn SearchInfo<P> + Send + Sync> = Arc::clone(core) as _;
        let stop_core = Arc::clone(core);
        core.checker.start(info_handle, move || stop_core.request_stop());

        let step_result = loop {
            if core.status() != SearchStatus::Running {
                break Ok(());
            }
            if let Err(error) = self.search_step() {
                break Err(error);
            }
        };

        core.checker.stop();
        core.set_status(SearchStatus::Terminating);
        self.on_search_stopped();
        core.set_status(SearchStatus::Idle);
        core.notify_stopped();
        debug!("search stopped, steps={}", core.metadata().steps_taken);

        step_result
    }

    fn stop(&self) {
        self.core().request_stop();
    }

    fn dispose(&self) -> Result<(), SearchError> {
        let core = self.core();
        core.assert_idle("dispose() requires the search to be Idle")?;
        core.set_status(SearchStatus::Disposed);
        self.on_search_disposed();
        Ok(())
    }

    fn status(&self) -> SearchStatus {
        self.core().status()
    }

    fn metadata(&self) -> RunMetadata {
        self.core().metadata()
    }

    fn best_solution(&self) -> Option<(P::Solution, P::Evaluation)> {
        self.core().best()
    }

    fn add_stop_criterion(&self, criterion: Arc<dyn StopCriterion<P>>) -> Result<(), SearchError> {
        self.core().add_stop_criterion(criterion)
    }

    fn remove_stop_criterion(&self, criterion: &Arc<dyn StopCriterion<P>>) {
        self.core().remove_stop_criterion(criterion);
    }

    fn set_stop_criterion_check_period(&self, period: Duration) {
        self.core().set_stop_criterion_check_period(period);
    }

    fn add_search_listener(&self, listener: Arc<dyn SearchListener<P>>) {
        self.core().add_search_listener(listener);
    }

    fn remove_search_listener(&self, listener: &Arc<dyn SearchListener<P>>) {
        self.core().remove_search_listener(listener);
    }
}

impl<P: Problem + 'static> SearchCore<P> {
    /// Requests that a `Running` or `Initializing` search stop; a no-op
    /// otherwise. Requesting a stop during `Initializing` (e.g. from within
    /// `on_search_started`) prevents the run from ever executing a single
    /// `search_step`.
    pub fn request_stop(&self) {
        let transitioned = {
            let mut status = self.status.lock().unwrap();
            match *status {
                SearchStatus::Running | SearchStatus::Initializing => {
                    let from = *status;
                    *status = SearchStatus::Terminating;
                    Some(from)
                }
                _ => None,
            }
        };
        if let Some(from) = transitioned {
            for listener in self.listeners.lock().unwrap().iter() {
                listener.status_changed(self, from, SearchStatus::Terminating);
            }
        }
    }
}
