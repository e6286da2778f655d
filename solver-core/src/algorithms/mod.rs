//! Concrete search algorithms built on the [`crate::search`] capability
//! structs.

mod metropolis;
mod parallel_tempering;
mod piped;
mod random_descent;
mod random_search;
mod steepest_descent;
mod tabu_memory;
mod tabu_search;
mod vnd;
mod vns;

pub use metropolis::{CoolingSchedule, Metropolis};
pub use parallel_tempering::ParallelTempering;
pub use piped::PipedLocalSearch;
pub use random_descent::RandomDescent;
pub use random_search::RandomSearch;
pub use steepest_descent::SteepestDescent;
pub use tabu_memory::{FullTabuMemory, IdTabuMemory, TabuMemory};
pub use tabu_search::TabuSearch;
pub use vnd::Vnd;
pub use vns::Vns;

use crate::model::Problem;
use crate::model::Validation;
use crate::search::Search;

/// A local search whose current working solution can be reset from the
/// outside.
///
/// Lets a composite algorithm ([`Vns`], [`PipedLocalSearch`]) drive an
/// inner search through several independent runs without constructing a
/// fresh instance each time. Implemented by every single-neighbourhood
/// algorithm in this module; not implemented by the composites themselves,
/// since their own starting point is set once at construction.
pub trait Reseedable<P: Problem>: Search<P> {
    /// Discards any in-progress state and sets `(solution, evaluation,
    /// validation)` as the current solution, without touching the
    /// best-so-far tracking. Only legal while `Idle`.
    fn reseed(&self, solution: P::Solution, evaluation: P::Evaluation, validation: P::Validation);
}
