//! Solutions and moves.

use std::fmt::Debug;
use std::hash::Hash;

/// A candidate solution in a problem's search space.
///
/// Solutions are expected to be cheap to clone relative to evaluation cost:
/// the engine copies them whenever it retains them (best-so-far, replica
/// current solutions, tabu memory). Equality and hashing must agree with
/// each other so that solutions can be used as tabu-memory keys.
///
/// Blanket-implemented for any type that already satisfies the bounds, so
/// problem authors never need to write `impl Solution for MySolution {}`.
pub trait Solution: Clone + PartialEq + Eq + Hash + Debug + Send + Sync + 'static {}

impl<T> Solution for T where T: Clone + PartialEq + Eq + Hash + Debug + Send + Sync + 'static {}

/// A reversible, opaque mutation of a solution of type `S`.
///
/// The engine never inspects a move's internals; it only applies, undoes,
/// and (for tabu memory) compares moves. Two moves with identical effect on
/// every solution must compare equal and hash identically.
///
/// # Invariants
///
/// - `undo` after `apply` restores the solution to an equal value.
/// - `apply` either fully succeeds or leaves the solution unchanged; a move
///   that cannot legally apply to a given solution is a logic error in the
///   neighbourhood that produced it, not something the engine recovers from.
pub trait Move<S>: Clone + PartialEq + Eq + Hash + Debug + Send + Sync + 'static {
    /// Applies this move to `solution` in place.
    fn apply(&self, solution: &mut S);

    /// Undoes this move, restoring `solution` to its pre-`apply` value.
    fn undo(&self, solution: &mut S);
}
