//! Stop criteria: pluggable conditions that end a search run.

mod checker;

pub use checker::StopCriterionChecker;

use std::time::Duration;

use crate::listener::SearchInfo;
use crate::model::{Evaluation, Problem};

/// A single condition that, once true, ends the run.
///
/// `is_compatible` lets a criterion reject being attached to a search it
/// cannot reason about (for example, a criterion that needs improvement
/// tracking attached to an algorithm that never updates it); the default
/// accepts everything.
pub trait StopCriterion<P: Problem>: Send + Sync {
    /// Whether the run should stop now.
    fn should_stop(&self, info: &dyn SearchInfo<P>) -> bool;

    /// Whether this criterion can be meaningfully attached to the given
    /// search.
    fn is_compatible(&self, info: &dyn SearchInfo<P>) -> bool {
        let _ = info;
        true
    }
}

/// Stops once the run has been active for at least `limit`.
pub struct MaxRuntime {
    pub limit: Duration,
}

impl<P: Problem> StopCriterion<P> for MaxRuntime {
    fn should_stop(&self, info: &dyn SearchInfo<P>) -> bool {
        info.metadata()
            .elapsed(std::time::Instant::now())
            .is_some_and(|elapsed| elapsed >= self.limit)
    }
}

/// Stops once `limit` steps have been taken in the run.
pub struct MaxSteps {
    pub limit: u64,
}

impl<P: Problem> StopCriterion<P> for MaxSteps {
    fn should_stop(&self, info: &dyn SearchInfo<P>) -> bool {
        info.metadata().steps_taken >= self.limit
    }
}

/// Stops once `limit` time has elapsed since the last improvement.
///
/// Never triggers before the first improvement has happened.
pub struct MaxTimeWithoutImprovement {
    pub limit: Duration,
}

impl<P: Problem> StopCriterion<P> for MaxTimeWithoutImprovement {
    fn should_stop(&self, info: &dyn SearchInfo<P>) -> bool {
        info.metadata()
            .time_since_improvement(std::time::Instant::now())
            .is_some_and(|elapsed| elapsed >= self.limit)
    }
}

/// Stops once `limit` steps have been taken since the last improvement.
///
/// Never triggers before the first improvement has happened.
pub struct MaxStepsWithoutImprovement {
    pub limit: u64,
}

impl<P: Problem> StopCriterion<P> for MaxStepsWithoutImprovement {
    fn should_stop(&self, info: &dyn SearchInfo<P>) -> bool {
        info.metadata()
            .steps_since_improvement()
            .is_some_and(|steps| steps >= self.limit)
    }
}

/// Stops once the smallest improvement delta observed so far this run
/// falls below `threshold`. Never triggers before at least one improvement
/// has happened.
pub struct MinDelta {
    pub threshold: f64,
}

impl<P: Problem> StopCriterion<P> for MinDelta {
    fn should_stop(&self, info: &dyn SearchInfo<P>) -> bool {
        info.metadata()
            .min_delta
            .is_some_and(|min_delta| min_delta < self.threshold)
    }
}

/// Stops once the best-so-far evaluation reaches or surpasses `target`.
///
/// `minimizing` must match the problem's own optimization direction: when
/// `true`, triggers once the best value falls to or below `target`; when
/// `false`, once it rises to or above it.
pub struct TargetValue {
    pub target: f64,
    pub minimizing: bool,
}

impl<P: Problem> StopCriterion<P> for TargetValue {
    fn should_stop(&self, info: &dyn SearchInfo<P>) -> bool {
        info.best().is_some_and(|(_, eval)| {
            if self.minimizing {
                eval.value() <= self.target
            } else {
                eval.value() >= self.target
            }
        })
    }
}
