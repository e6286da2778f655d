//! Feasibility validation produced by constraints.

use std::fmt::Debug;

/// Whether a solution (or move) satisfies a problem's constraints.
pub trait Validation: Clone + Debug + Send + Sync + 'static {
    /// `true` iff the validated solution/move is feasible.
    fn passed(&self) -> bool;
}

/// A plain pass/fail validation with no penalty information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimpleValidation(pub bool);

impl Validation for SimpleValidation {
    fn passed(&self) -> bool {
        self.0
    }
}

/// A validation that additionally carries a non-negative penalty magnitude
/// for the degree of violation, used by mandatory-but-penalising
/// constraints (e.g. a soft capacity limit).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PenalisingValidation {
    /// Whether the constraint is satisfied outright.
    pub passed: bool,
    /// Non-negative magnitude of the violation (`0.0` when `passed`).
    pub penalty: f64,
}

impl PenalisingValidation {
    /// A validation that passed cleanly, with zero penalty.
    pub fn ok() -> Self {
        Self {
            passed: true,
            penalty: 0.0,
        }
    }

    /// A validation that failed with the given non-negative penalty.
    pub fn violated(penalty: f64) -> Self {
        debug_assert!(penalty >= 0.0, "penalty magnitude must be non-negative");
        Self {
            passed: false,
            penalty,
        }
    }
}

impl Validation for PenalisingValidation {
    fn passed(&self) -> bool {
        self.passed
    }
}

/// An aggregate validation over a fixed, ordered list of constraints.
///
/// Built short-circuit: once a constraint fails, later slots are left as
/// `None` rather than evaluated. `passed()` is true iff every *populated*
/// slot passed — a `None` slot does not itself fail the aggregate, since it
/// simply was never reached. Also serves as the vehicle for feeding a
/// constraint's prior validation into its own subsequent delta validation.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnanimousValidation {
    sub_validations: Vec<Option<PenalisingValidation>>,
}

impl UnanimousValidation {
    /// An empty aggregate (vacuously passes).
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the next constraint's sub-validation, short-circuiting (the
    /// slot is left `None`) once a prior slot has already failed.
    pub fn push(&mut self, sub_validation: PenalisingValidation) {
        if self.passed() {
            self.sub_validations.push(Some(sub_validation));
        } else {
            self.sub_validations.push(None);
        }
    }

    /// The sub-validation recorded for constraint `index`, if it was
    /// evaluated (not short-circuited away).
    pub fn sub_validation(&self, index: usize) -> Option<&PenalisingValidation> {
        self.sub_validations.get(index).and_then(|v| v.as_ref())
    }

    /// Number of constraint slots recorded (evaluated or short-circuited).
    pub fn len(&self) -> usize {
        self.sub_validations.len()
    }

    /// Whether no constraint slots have been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.sub_validations.is_empty()
    }

    /// Total penalty across every evaluated sub-validation.
    pub fn total_penalty(&self) -> f64 {
        self.sub_validations
            .iter()
            .filter_map(|v| v.as_ref())
            .map(|v| v.penalty)
            .sum()
    }
}

impl Validation for UnanimousValidation {
    fn passed(&self) -> bool {
        self.sub_validations
            .iter()
            .all(|v| v.as_ref().is_none_or(|v| v.passed))
    }
}
