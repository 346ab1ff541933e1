use crate::compute::formulas::formula;
use crate::store::{PinnedSet, Variable};
use std::collections::VecDeque;

/// The variables the identity for `var` reads.
pub fn inputs_of(var: Variable) -> PinnedSet {
    formula(var).inputs().collect()
}

/// The variables whose identity reads `var`.
pub fn dependents_of(var: Variable) -> PinnedSet {
    Variable::ALL
        .into_iter()
        .filter(|&v| formula(v).reads(var))
        .collect()
}

/// Variables that would be recomputed from a value that an edit to `start`
/// eventually feeds, ignoring pins. One solver pass only reaches the direct
/// dependents; this walks the whole chain.
pub fn downstream_from(start: &[Variable]) -> PinnedSet {
    let mut visited = PinnedSet::empty();
    let mut queue: VecDeque<Variable> = start.iter().copied().collect();

    while let Some(var) = queue.pop_front() {
        for child in dependents_of(var).iter() {
            if !visited.contains(child) {
                visited.insert(child);
                queue.push_back(child);
            }
        }
    }
    visited
}

/// Driven variables whose value in one pass depends on a pinned variable.
pub fn touched_by(pinned: PinnedSet) -> PinnedSet {
    Variable::ALL
        .into_iter()
        .filter(|&v| !pinned.contains(v) && formula(v).inputs().any(|i| pinned.contains(i)))
        .collect()
}
