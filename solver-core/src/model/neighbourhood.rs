//! Neighbourhoods: move generators over a problem's solution space.

use rand::RngCore;

use super::problem::Problem;

/// A source of moves for a given [`Problem`].
///
/// A concrete algorithm can hold several neighbourhoods (VND/VNS iterate
/// through a list of them); each neighbourhood is otherwise independent and
/// knows nothing about the search that drives it.
pub trait Neighbourhood<P: Problem>: Send + Sync {
    /// Draws a single uniformly-random move from this neighbourhood for
    /// `solution`, or `None` if the neighbourhood is empty at `solution`.
    fn random_move(&self, solution: &P::Solution, rng: &mut dyn RngCore) -> Option<P::Move>;

    /// Enumerates every move this neighbourhood admits for `solution`.
    ///
    /// Used by steepest-descent-style algorithms that need to consider the
    /// full neighbourhood rather than a single sample. May be expensive;
    /// algorithms that only need a sample should prefer
    /// [`Neighbourhood::random_move`].
    fn all_moves(&self, solution: &P::Solution) -> Vec<P::Move>;
}
