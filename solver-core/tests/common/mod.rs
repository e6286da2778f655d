//! A minimal fixed-size subset-selection problem used only to exercise the
//! engine in tests. Not part of the public API.

use rand::seq::SliceRandom;
use rand::RngCore;

use solver_core::error::SearchError;
use solver_core::model::{Move, Neighbourhood, Problem, SimpleEvaluation, Validation};

/// Choose exactly `target_size` of `weights.len()` items, maximizing total
/// weight. A swap move exchanges one chosen item for one unchosen item, so
/// the chosen-count invariant never needs validating — it is true by
/// construction.
#[derive(Debug)]
pub struct SubsetSelection {
    pub weights: Vec<f64>,
    pub target_size: usize,
}

pub type SubsetSolution = Vec<bool>;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Swap {
    pub leaving: usize,
    pub entering: usize,
}

impl Move<SubsetSolution> for Swap {
    fn apply(&self, solution: &mut SubsetSolution) {
        solution[self.leaving] = false;
        solution[self.entering] = true;
    }

    fn undo(&self, solution: &mut SubsetSolution) {
        solution[self.leaving] = true;
        solution[self.entering] = false;
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CountValidation(pub bool);

impl Validation for CountValidation {
    fn passed(&self) -> bool {
        self.0
    }
}

impl Problem for SubsetSelection {
    type Solution = SubsetSolution;
    type Move = Swap;
    type Evaluation = SimpleEvaluation;
    type Validation = CountValidation;

    fn create_random_solution(&self, rng: &mut dyn RngCore) -> Self::Solution {
        let mut indices: Vec<usize> = (0..self.weights.len()).collect();
        indices.shuffle(rng);
        let mut solution = vec![false; self.weights.len()];
        for &i in indices.iter().take(self.target_size) {
            solution[i] = true;
        }
        solution
    }

    fn evaluate(&self, solution: &Self::Solution) -> Self::Evaluation {
        let total: f64 = self
            .weights
            .iter()
            .zip(solution.iter())
            .filter(|(_, chosen)| **chosen)
            .map(|(w, _)| *w)
            .sum();
        SimpleEvaluation(total)
    }

    fn evaluate_move(
        &self,
        _solution: &Self::Solution,
        mv: &Self::Move,
        prior: &Self::Evaluation,
    ) -> Result<Self::Evaluation, SearchError> {
        let delta = self.weights[mv.entering] - self.weights[mv.leaving];
        Ok(SimpleEvaluation(prior.0 + delta))
    }

    fn validate(&self, solution: &Self::Solution) -> Self::Validation {
        CountValidation(solution.iter().filter(|c| **c).count() == self.target_size)
    }

    fn validate_move(
        &self,
        _solution: &Self::Solution,
        _mv: &Self::Move,
        prior: &Self::Validation,
    ) -> Result<Self::Validation, SearchError> {
        Ok(*prior)
    }

    fn is_minimizing(&self) -> bool {
        false
    }
}

/// All swaps of one currently-chosen item for one currently-unchosen item.
pub struct SwapNeighbourhood;

impl Neighbourhood<SubsetSelection> for SwapNeighbourhood {
    fn random_move(&self, solution: &SubsetSolution, rng: &mut dyn RngCore) -> Option<Swap> {
        let chosen: Vec<usize> = solution
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(|(i, _)| i)
            .collect();
        let unchosen: Vec<usize> = solution
            .iter()
            .enumerate()
            .filter(|(_, c)| !**c)
            .map(|(i, _)| i)
            .collect();
        if chosen.is_empty() || unchosen.is_empty() {
            return None;
        }
        let leaving = *chosen.get(rng.next_u32() as usize % chosen.len())?;
        let entering = *unchosen.get(rng.next_u32() as usize % unchosen.len())?;
        Some(Swap { leaving, entering })
    }

    fn all_moves(&self, solution: &SubsetSolution) -> Vec<Swap> {
        let chosen: Vec<usize> = solution
            .iter()
            .enumerate()
            .filter(|(_, c)| **c)
            .map(|(i, _)| i)
            .collect();
        let unchosen: Vec<usize> = solution
            .iter()
            .enumerate()
            .filter(|(_, c)| !**c)
            .map(|(i, _)| i)
            .collect();
        chosen
            .iter()
            .flat_map(|&leaving| {
                unchosen.iter().map(move |&entering| Swap { leaving, entering })
            })
            .collect()
    }
}
