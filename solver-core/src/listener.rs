//! Search status and listener notification.

use crate::metadata::RunMetadata;
use crate::model::Problem;

/// The lifecycle state of a search.
///
/// Transitions: `Idle -> Initializing -> Running -> Terminating -> Idle`,
/// plus `Idle -> Disposed` (terminal; a disposed search can never restart).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    Idle,
    Initializing,
    Running,
    Terminating,
    Disposed,
}

/// Read-only view of a running search, handed to stop criteria and
/// listeners. Grouped behind a trait (rather than passing `SearchCore`
/// directly) so algorithms built on different cores can all produce one.
pub trait SearchInfo<P: Problem> {
    /// Current lifecycle status.
    fn status(&self) -> SearchStatus;

    /// Metadata for the run in progress (steps taken, elapsed time, steps
    /// since the last improvement, and so on).
    fn metadata(&self) -> RunMetadata;

    /// The best solution found so far, and its evaluation, if any step has
    /// completed yet.
    fn best(&self) -> Option<(P::Solution, P::Evaluation)>;
}

/// Notified of search lifecycle and progress events.
///
/// All methods default to a no-op, so listeners only implement what they
/// care about. Listener callbacks run synchronously on the search thread
/// and may be re-entered from within `search_step`; a panicking listener
/// unwinds through `start()` the same as a panic in problem code.
#[allow(unused_variables)]
pub trait SearchListener<P: Problem>: Send + Sync {
    /// Called once, synchronously, as `start()` transitions to `Running`.
    fn search_started(&self, info: &dyn SearchInfo<P>) {}

    /// Called once as the search transitions back to `Idle`.
    fn search_stopped(&self, info: &dyn SearchInfo<P>) {}

    /// A free-form diagnostic message from the algorithm.
    fn search_message(&self, info: &dyn SearchInfo<P>, message: &str) {}

    /// A new best solution has been recorded.
    fn new_best_solution(&self, info: &dyn SearchInfo<P>, solution: &P::Solution, evaluation: &P::Evaluation) {}

    /// The algorithm's current working solution has changed (not
    /// necessarily an improvement).
    fn new_current_solution(&self, info: &dyn SearchInfo<P>, solution: &P::Solution, evaluation: &P::Evaluation) {}

    /// One `search_step` call has completed.
    fn step_completed(&self, info: &dyn SearchInfo<P>) {}

    /// The lifecycle status has changed.
    fn status_changed(&self, info: &dyn SearchInfo<P>, from: SearchStatus, to: SearchStatus) {}
}
