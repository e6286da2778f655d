//! Scalar-valued evaluations produced by objectives.

use std::fmt::Debug;

/// A scalar-valued record produced by evaluating a solution.
///
/// `value()` is what the engine compares across solutions. Composite
/// evaluations (see [`PenalisedEvaluation`]) must round-trip: re-evaluating
/// a solution from scratch and delta-evaluating the same move from the same
/// prior state must agree within double-precision tolerance.
pub trait Evaluation: Clone + Debug + Send + Sync + 'static {
    /// The scalar value the engine optimizes.
    fn value(&self) -> f64;
}

/// A bare scalar evaluation with no penalty breakdown.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleEvaluation(pub f64);

impl Evaluation for SimpleEvaluation {
    fn value(&self) -> f64 {
        self.0
    }
}

impl From<f64> for SimpleEvaluation {
    fn from(value: f64) -> Self {
        SimpleEvaluation(value)
    }
}

/// An evaluation composed of a base objective value and a list of additive
/// penalty contributions (one per violated or partially-violated
/// constraint). `value()` folds the penalties into the base.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PenalisedEvaluation {
    /// The raw objective contribution, before penalties.
    pub base: f64,
    /// Per-constraint penalty magnitudes, always non-negative.
    pub penalties: Vec<f64>,
}

impl PenalisedEvaluation {
    /// Builds an evaluation with no penalties.
    pub fn unpenalised(base: f64) -> Self {
        Self {
            base,
            penalties: Vec::new(),
        }
    }

    /// Total penalty magnitude across all constraints.
    pub fn total_penalty(&self) -> f64 {
        self.penalties.iter().sum()
    }
}

impl Evaluation for PenalisedEvaluation {
    fn value(&self) -> f64 {
        self.base + self.total_penalty()
    }
}
