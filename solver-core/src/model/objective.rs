//! Objectives: the scoring half of a problem definition.

use std::fmt::Debug;

use super::evaluation::Evaluation;

/// A single scoring component of a problem.
///
/// `D` is the move type the objective can delta-evaluate; objectives that
/// have no meaningful delta shortcut can simply re-run `evaluate` from
/// scratch inside `evaluate_delta`.
pub trait Objective<S, D>: Debug + Send + Sync {
    /// The evaluation type this objective produces.
    type Evaluation: Evaluation;

    /// Whether lower values of this objective are better.
    fn is_minimizing(&self) -> bool;

    /// Evaluates `solution` from scratch.
    fn evaluate(&self, solution: &S) -> Self::Evaluation;

    /// Evaluates the effect of applying `mv` to `solution`, given the prior
    /// evaluation. Implementations that cannot shortcut this may simply
    /// apply the move to a clone and call [`Objective::evaluate`].
    fn evaluate_delta(&self, solution: &S, mv: &D, prior: &Self::Evaluation) -> Self::Evaluation;
}

/// A weighted sum of sub-objectives, always expressed as a value to
/// *maximize*: sub-objectives that minimize have their contribution
/// negated before weighting, so callers never need to track mixed
/// directions by hand.
pub struct WeightedObjective<S, D> {
    terms: Vec<(Box<dyn Objective<S, D, Evaluation = super::evaluation::SimpleEvaluation>>, f64)>,
}

impl<S, D> Debug for WeightedObjective<S, D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeightedObjective")
            .field("terms", &self.terms.len())
            .finish()
    }
}

impl<S, D> WeightedObjective<S, D> {
    /// Builds a weighted objective from `(objective, weight)` pairs.
    pub fn new(
        terms: Vec<(
            Box<dyn Objective<S, D, Evaluation = super::evaluation::SimpleEvaluation>>,
            f64,
        )>,
    ) -> Self {
        Self { terms }
    }

    fn direction(weight: f64, minimizing: bool) -> f64 {
        if minimizing {
            -weight
        } else {
            weight
        }
    }
}

impl<S, D> Objective<S, D> for WeightedObjective<S, D> {
    type Evaluation = super::evaluation::SimpleEvaluation;

    fn is_minimizing(&self) -> bool {
        false
    }

    fn evaluate(&self, solution: &S) -> Self::Evaluation {
        let total: f64 = self
            .terms
            .iter()
            .map(|(obj, weight)| {
                Self::direction(*weight, obj.is_minimizing()) * obj.evaluate(solution).0
            })
            .sum();
        super::evaluation::SimpleEvaluation(total)
    }

    fn evaluate_delta(&self, solution: &S, mv: &D, prior: &Self::Evaluation) -> Self::Evaluation {
        // Weighted sums have no general delta shortcut across heterogeneous
        // sub-objectives; re-evaluate from scratch. Concrete problems that
        // need delta evaluation compose their own objectives directly
        // rather than through this aggregate.
        let _ = (mv, prior);
        self.evaluate(solution)
    }
}
