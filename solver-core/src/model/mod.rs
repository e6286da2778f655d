//! Core data model: solutions, moves, evaluations, validations, and the
//! problem/objective/constraint/neighbourhood contracts built on top of them.

mod constraint;
mod evaluation;
mod neighbourhood;
mod objective;
mod problem;
mod solution;
mod validation;

pub use constraint::{Constraint, PenalisingConstraint};
pub use evaluation::{Evaluation, PenalisedEvaluation, SimpleEvaluation};
pub use neighbourhood::Neighbourhood;
pub use objective::{Objective, WeightedObjective};
pub use problem::Problem;
pub use solution::{Move, Solution};
pub use validation::{PenalisingValidation, SimpleValidation, UnanimousValidation, Validation};
