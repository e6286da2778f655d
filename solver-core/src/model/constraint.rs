//! Constraints: the feasibility half of a problem definition.

use std::fmt::Debug;

use super::validation::{PenalisingValidation, SimpleValidation};

/// A hard feasibility check: a solution either satisfies it or it doesn't.
pub trait Constraint<S, D>: Debug + Send + Sync {
    /// Validates `solution` from scratch.
    fn validate(&self, solution: &S) -> SimpleValidation;

    /// Validates the effect of applying `mv` to `solution`, given the prior
    /// validation. Implementations with no delta shortcut may apply the
    /// move to a clone and call [`Constraint::validate`].
    fn validate_delta(&self, solution: &S, mv: &D, prior: &SimpleValidation) -> SimpleValidation;
}

/// A soft constraint: violations are feasible but penalised in the
/// objective value rather than rejected outright.
pub trait PenalisingConstraint<S, D>: Debug + Send + Sync {
    /// Validates `solution` from scratch, producing a penalty magnitude.
    fn validate(&self, solution: &S) -> PenalisingValidation;

    /// Validates the effect of applying `mv` to `solution`, given the prior
    /// validation.
    fn validate_delta(
        &self,
        solution: &S,
        mv: &D,
        prior: &PenalisingValidation,
    ) -> PenalisingValidation;
}
