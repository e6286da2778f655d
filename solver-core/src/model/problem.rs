//! The top-level problem contract the engine searches against.

use rand::RngCore;

use crate::error::SearchError;

use super::evaluation::Evaluation;
use super::solution::{Move, Solution};
use super::validation::Validation;

/// A discrete combinatorial problem definition.
///
/// `Problem` is expressed with associated types rather than `dyn` objects so
/// that the whole engine stays generic over a single concrete problem at a
/// time: the compiler monomorphises one `Problem` implementation per search,
/// rather than paying vtable dispatch on every evaluation.
pub trait Problem: Send + Sync {
    /// The candidate-solution representation.
    type Solution: Solution;
    /// The move representation applicable to [`Problem::Solution`].
    type Move: Move<Self::Solution>;
    /// The evaluation produced by [`Problem::evaluate`].
    type Evaluation: Evaluation;
    /// The validation produced by [`Problem::validate`].
    type Validation: Validation;

    /// Builds a uniformly-random starting solution.
    fn create_random_solution(&self, rng: &mut dyn RngCore) -> Self::Solution;

    /// Evaluates `solution` from scratch.
    fn evaluate(&self, solution: &Self::Solution) -> Self::Evaluation;

    /// Evaluates the effect of applying `mv` to `solution`, given the prior
    /// evaluation, without re-evaluating from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::IncompatibleDelta`] if this problem cannot
    /// delta-evaluate `mv` (for example, a move type introduced by a
    /// neighbourhood the problem wasn't written to support).
    fn evaluate_move(
        &self,
        solution: &Self::Solution,
        mv: &Self::Move,
        prior: &Self::Evaluation,
    ) -> Result<Self::Evaluation, SearchError>;

    /// Validates `solution` from scratch.
    fn validate(&self, solution: &Self::Solution) -> Self::Validation;

    /// Validates the effect of applying `mv` to `solution`, given the prior
    /// validation, without re-validating from scratch.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::IncompatibleDelta`] if this problem cannot
    /// delta-validate `mv`.
    fn validate_move(
        &self,
        solution: &Self::Solution,
        mv: &Self::Move,
        prior: &Self::Validation,
    ) -> Result<Self::Validation, SearchError>;

    /// Whether lower evaluation values are better for this problem.
    fn is_minimizing(&self) -> bool;
}
