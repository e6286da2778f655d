//! A 0/1 knapsack problem: choose a subset of items maximizing total value
//! without exceeding a weight capacity. Demo wiring only — this is the
//! concrete problem that exercises the engine end to end over HTTP; it
//! carries no authority over the engine's own contracts.

use rand::Rng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

use solver_core::error::SearchError;
use solver_core::model::{Neighbourhood, Problem, SimpleEvaluation, Validation};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    pub weight: u32,
    pub value: f64,
}

#[derive(Debug)]
pub struct KnapsackProblem {
    pub items: Vec<Item>,
    pub capacity: u32,
}

/// Which items are currently in the knapsack.
pub type KnapsackSolution = Vec<bool>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlipItem(pub usize);

impl solver_core::model::Move<KnapsackSolution> for FlipItem {
    fn apply(&self, solution: &mut KnapsackSolution) {
        solution[self.0] = !solution[self.0];
    }

    fn undo(&self, solution: &mut KnapsackSolution) {
        solution[self.0] = !solution[self.0];
    }
}

/// Feasibility validation that also carries the running total weight, so
/// delta validation never has to recompute it from scratch.
#[derive(Debug, Clone, Copy)]
pub struct WeightValidation {
    pub total_weight: u32,
    pub passed: bool,
}

impl Validation for WeightValidation {
    fn passed(&self) -> bool {
        self.passed
    }
}

impl Problem for KnapsackProblem {
    type Solution = KnapsackSolution;
    type Move = FlipItem;
    type Evaluation = SimpleEvaluation;
    type Validation = WeightValidation;

    fn create_random_solution(&self, rng: &mut dyn RngCore) -> Self::Solution {
        (0..self.items.len()).map(|_| rng.random_bool(0.3)).collect()
    }

    fn evaluate(&self, solution: &Self::Solution) -> Self::Evaluation {
        let total: f64 = self
            .items
            .iter()
            .zip(solution.iter())
            .filter(|(_, chosen)| **chosen)
            .map(|(item, _)| item.value)
            .sum();
        SimpleEvaluation(total)
    }

    fn evaluate_move(
        &self,
        _solution: &Self::Solution,
        mv: &Self::Move,
        prior: &Self::Evaluation,
    ) -> Result<Self::Evaluation, SearchError> {
        let item = self.items.get(mv.0).ok_or_else(|| {
            SearchError::IncompatibleDelta(format!("no item at index {}", mv.0))
        })?;
        // Flipping toggles membership: the prior solution tells us which
        // direction this particular flip goes.
        let currently_in = _solution[mv.0];
        let delta = if currently_in { -item.value } else { item.value };
        Ok(SimpleEvaluation(prior.0 + delta))
    }

    fn validate(&self, solution: &Self::Solution) -> Self::Validation {
        let total_weight: u32 = self
            .items
            .iter()
            .zip(solution.iter())
            .filter(|(_, chosen)| **chosen)
            .map(|(item, _)| item.weight)
            .sum();
        WeightValidation {
            total_weight,
            passed: total_weight <= self.capacity,
        }
    }

    fn validate_move(
        &self,
        solution: &Self::Solution,
        mv: &Self::Move,
        prior: &Self::Validation,
    ) -> Result<Self::Validation, SearchError> {
        let item = self.items.get(mv.0).ok_or_else(|| {
            SearchError::IncompatibleDelta(format!("no item at index {}", mv.0))
        })?;
        let currently_in = solution[mv.0];
        let total_weight = if currently_in {
            prior.total_weight - item.weight
        } else {
            prior.total_weight + item.weight
        };
        Ok(WeightValidation {
            total_weight,
            passed: total_weight <= self.capacity,
        })
    }

    fn is_minimizing(&self) -> bool {
        false
    }
}

/// Generates one `FlipItem` move per item, unconditionally (infeasible
/// results are filtered out by [`Problem::validate_move`], not by the
/// neighbourhood itself).
pub struct FlipNeighbourhood {
    pub item_count: usize,
}

impl Neighbourhood<KnapsackProblem> for FlipNeighbourhood {
    fn random_move(&self, _solution: &KnapsackSolution, rng: &mut dyn RngCore) -> Option<FlipItem> {
        if self.item_count == 0 {
            return None;
        }
        Some(FlipItem(rng.random_range(0..self.item_count)))
    }

    fn all_moves(&self, _solution: &KnapsackSolution) -> Vec<FlipItem> {
        (0..self.item_count).map(FlipItem).collect()
    }
}
