//! Error taxonomy for the search engine.
//!
//! Every fallible engine operation returns [`SearchError`]. Faults that
//! originate in user-supplied `Problem`/`Objective`/`Constraint`/
//! `Neighbourhood` code but are not expressed through one of these typed
//! variants (for example a panic) are not caught by the engine: they unwind
//! through `start()` unchanged, per the propagation policy in the design
//! notes.

use thiserror::Error;

/// Errors surfaced by the search engine.
#[derive(Error, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum SearchError {
    /// Invalid construction or configuration: non-positive size, empty
    /// collection, missing collaborator, incompatible stop criterion or
    /// tabu memory.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The requested operation requires the search to be `Idle` but it is
    /// not (includes double-dispose and start-while-running).
    #[error("search not idle: {0}")]
    NotIdle(String),

    /// A move's delta evaluation or delta validation could not be computed
    /// because the objective/constraint does not recognise the move type.
    #[error("incompatible delta evaluation: {0}")]
    IncompatibleDelta(String),

    /// A move could not be applied to the given solution. Implementations
    /// must guarantee this error leaves the solution unchanged.
    #[error("solution modification error: {0}")]
    SolutionModification(String),

    /// An algorithm-level failure raised from within `search_step`.
    #[error("search error: {0}")]
    SearchFailed(String),
}
