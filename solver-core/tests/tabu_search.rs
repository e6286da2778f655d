mod common;

use std::sync::Arc;

use solver_core::algorithms::{IdTabuMemory, TabuSearch};
use solver_core::search::Search;

use common::{SubsetSelection, SwapNeighbourhood};

fn fixture() -> (Arc<SubsetSelection>, Vec<bool>) {
    let problem = Arc::new(SubsetSelection {
        weights: vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0],
        target_size: 3,
    });
    let initial = vec![true, true, true, false, false, false, false, false];
    (problem, initial)
}

/// A memory keyed on the unordered pair of positions a swap touches, so
/// applying `Swap { leaving: a, entering: b }` also forbids the literal
/// reversal `Swap { leaving: b, entering: a }` for as long as the tenure
/// lasts.
fn undo_blocking_memory(tenure: usize) -> IdTabuMemory<SubsetSelection, (usize, usize)> {
    IdTabuMemory::new(tenure, |mv: &common::Swap| {
        (mv.leaving.min(mv.entering), mv.leaving.max(mv.entering))
    })
}

#[test]
fn tabu_search_reaches_the_optimum() {
    let (problem, initial) = fixture();
    let search = TabuSearch::new(
        problem,
        SwapNeighbourhood,
        Some(initial),
        Box::new(undo_blocking_memory(5)),
    );
    // Tabu search keeps moving (including to non-improving solutions) as
    // long as some valid, non-tabu candidate exists, so it needs its own
    // stop criterion rather than relying on exhaustion.
    search
        .add_stop_criterion(Arc::new(solver_core::stop_criteria::MaxStepsWithoutImprovement {
            limit: 20,
        }))
        .unwrap();

    search.start().unwrap();

    let (_, evaluation) = search.best_solution().expect("tabu search records a best solution");
    // The true optimum for this fixture is {4,5,9,6} * weights = 9+6+5 = 20
    // (indices 5, 7, 4).
    assert!((evaluation.0 - 20.0).abs() < 1e-9);
}

#[test]
fn tabu_memory_forbids_the_immediate_reversal() {
    let memory = undo_blocking_memory(3);
    let forward = common::Swap { leaving: 0, entering: 3 };
    let reverse = common::Swap { leaving: 3, entering: 0 };

    use solver_core::algorithms::TabuMemory;
    let mut memory = memory;
    let arbitrary_current = vec![true, false, false, true];
    assert!(!memory.is_tabu(&forward, &arbitrary_current));
    memory.register_visited_solution(&arbitrary_current, &forward);
    assert!(memory.is_tabu(&forward, &arbitrary_current));
    assert!(
        memory.is_tabu(&reverse, &arbitrary_current),
        "the literal undo shares the same attribute key"
    );
}
