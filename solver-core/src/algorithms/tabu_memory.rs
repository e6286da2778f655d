//! Tabu memory: short-term recency tracking for tabu search.

use std::collections::{HashSet, VecDeque};
use std::hash::Hash;
use std::sync::Mutex;

use crate::model::{Move, Problem};

/// Tracks which moves are currently forbidden ("tabu") from a given current
/// solution, because applying them would return the search to a recently
/// visited state.
pub trait TabuMemory<P: Problem>: Send + Sync {
    /// Whether applying `mv` to `current_solution` is currently tabu.
    fn is_tabu(&self, mv: &P::Move, current_solution: &P::Solution) -> bool;

    /// Records that `applied_move` was just applied, producing
    /// `new_current`, marking the resulting state (or an attribute derived
    /// from the move, depending on the implementation) tabu going forward.
    fn register_visited_solution(&mut self, new_current: &P::Solution, applied_move: &P::Move);

    /// Forgets every recorded entry, as if the memory were freshly built.
    fn clear(&mut self);
}

/// Tabu memory keyed on the full solution state: a fixed-size FIFO of the
/// most recently visited solutions (deep-copied). A move is tabu exactly
/// when applying it to the current solution would land on a solution
/// already present in the queue.
pub struct FullTabuMemory<P: Problem> {
    tenure: usize,
    order: Mutex<VecDeque<P::Solution>>,
    present: Mutex<HashSet<P::Solution>>,
}

impl<P: Problem + 'static> FullTabuMemory<P> {
    /// Builds a memory that retains the last `tenure` visited solutions.
    pub fn new(tenure: usize) -> Self {
        Self {
            tenure,
            order: Mutex::new(VecDeque::with_capacity(tenure)),
            present: Mutex::new(HashSet::with_capacity(tenure)),
        }
    }
}

impl<P: Problem + 'static> TabuMemory<P> for FullTabuMemory<P> {
    fn is_tabu(&self, mv: &P::Move, current_solution: &P::Solution) -> bool {
        let mut candidate = current_solution.clone();
        mv.apply(&mut candidate);
        self.present.lock().unwrap().contains(&candidate)
    }

    fn register_visited_solution(&mut self, new_current: &P::Solution, applied_move: &P::Move) {
        let _ = applied_move;
        if self.tenure == 0 {
            return;
        }
        let mut order = self.order.lock().unwrap();
        let mut present = self.present.lock().unwrap();
        order.push_back(new_current.clone());
        present.insert(new_current.clone());
        while order.len() > self.tenure {
            if let Some(oldest) = order.pop_front() {
                present.remove(&oldest);
            }
        }
    }

    fn clear(&mut self) {
        self.order.lock().unwrap().clear();
        self.present.lock().unwrap().clear();
    }
}

/// Tabu memory keyed on an attribute derived from each move, rather than
/// the move itself or the resulting solution. Coarser than
/// [`FullTabuMemory`]: two distinct moves that share an attribute (e.g.
/// "touched this same element") are both tabu together, which widens the
/// forbidden set beyond literal state repetition.
pub struct IdTabuMemory<P: Problem, Id: Eq + Hash + Clone + Send + Sync + 'static> {
    tenure: usize,
    attribute_of: Box<dyn Fn(&P::Move) -> Id + Send + Sync>,
    order: Mutex<VecDeque<Id>>,
    present: Mutex<HashSet<Id>>,
}

impl<P: Problem + 'static, Id: Eq + Hash + Clone + Send + Sync + 'static> IdTabuMemory<P, Id> {
    /// Builds a memory that retains the last `tenure` applied attributes,
    /// extracted from each move by `attribute_of`.
    pub fn new(tenure: usize, attribute_of: impl Fn(&P::Move) -> Id + Send + Sync + 'static) -> Self {
        Self {
            tenure,
            attribute_of: Box::new(attribute_of),
            order: Mutex::new(VecDeque::with_capacity(tenure)),
            present: Mutex::new(HashSet::with_capacity(tenure)),
        }
    }
}

impl<P: Problem + 'static, Id: Eq + Hash + Clone + Send + Sync + 'static> TabuMemory<P>
    for IdTabuMemory<P, Id>
{
    fn is_tabu(&self, mv: &P::Move, current_solution: &P::Solution) -> bool {
        let _ = current_solution;
        let id = (self.attribute_of)(mv);
        self.present.lock().unwrap().contains(&id)
    }

    fn register_visited_solution(&mut self, new_current: &P::Solution, applied_move: &P::Move) {
        let _ = new_current;
        if self.tenure == 0 {
            return;
        }
        let id = (self.attribute_of)(applied_move);
        let mut order = self.order.lock().unwrap();
        let mut present = self.present.lock().unwrap();
        order.push_back(id.clone());
        present.insert(id);
        while order.len() > self.tenure {
            if let Some(oldest) = order.pop_front() {
                present.remove(&oldest);
            }
        }
    }

    fn clear(&mut self) {
        self.order.lock().unwrap().clear();
        self.present.lock().unwrap().clear();
    }
}
