mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use solver_core::algorithms::SteepestDescent;
use solver_core::search::Search;
use solver_core::stop_criteria::MaxRuntime;
use solver_core::SearchStatus;

use common::{SubsetSelection, SwapNeighbourhood};

fn fixture() -> (Arc<SubsetSelection>, Vec<bool>) {
    let problem = Arc::new(SubsetSelection {
        weights: vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0],
        target_size: 3,
    });
    let initial = vec![true, true, true, false, false, false, false, false];
    (problem, initial)
}

#[test]
fn steepest_descent_self_terminates_at_a_local_optimum_with_no_stop_criterion() {
    let (problem, initial) = fixture();
    let search = SteepestDescent::new(problem, SwapNeighbourhood, Some(initial));

    search.start().unwrap();

    assert_eq!(search.status(), SearchStatus::Idle);
    let (_, evaluation) = search.best_solution().expect("steepest descent records a best solution");
    assert!((evaluation.0 - 20.0).abs() < 1e-9);
}

#[test]
fn steepest_descent_ignores_a_loose_runtime_bound_it_never_needs() {
    let (problem, initial) = fixture();
    let search = SteepestDescent::new(problem, SwapNeighbourhood, Some(initial));
    search
        .add_stop_criterion(Arc::new(MaxRuntime {
            limit: Duration::from_secs(10),
        }))
        .unwrap();

    let started = Instant::now();
    search.start().unwrap();
    // Converges on a handful of steps, far short of the attached bound.
    assert!(started.elapsed() < Duration::from_secs(1));
    // Every applied move in a steepest descent run is itself an improvement,
    // so the last improvement step always coincides with the final step.
    assert_eq!(search.metadata().steps_taken, search.metadata().last_improvement_step.unwrap());
}
