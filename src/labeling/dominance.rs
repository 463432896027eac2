//! Dominance between labels at the same customer.
//!
//! A dominates B when every completion of B is also a completion of A with
//! a reduced cost that is at least as good:
//!
//! - `cap(A) ≤ cap(B)` and `time(A) ≤ time(B) + ε`
//! - `ng(A) ⊆ ng(B)` and `enforced(A) = enforced(B)`
//! - `rc(A) ≤ rc(B) + Σ σ_c` over cuts `c` with `state_A(c) > state_B(c)`
//!
//! The cut sum accounts for A paying a cut dual earlier than B would. Labels
//! equal in every resource keep each other.

use super::label::ResourceLabel;
use super::pool::{LabelId, LabelPool, NodeState};
use crate::pricing::SubsetRowCut;
use tracing::trace;

/// Returns `true` if `a` dominates `b`.
pub fn dominates(a: &ResourceLabel, b: &ResourceLabel, cuts: &[SubsetRowCut], epsilon: f64) -> bool {
    if a.capacity() > b.capacity()
        || a.time() > b.time() + epsilon
        || a.enforced() != b.enforced()
        || !a.ng_memory().is_subset_of(b.ng_memory())
    {
        return false;
    }
    let cut_slack: f64 = a
        .cut_states()
        .iter()
        .zip(b.cut_states())
        .zip(cuts)
        .filter(|((sa, sb), _)| *sa > *sb)
        .map(|(_, cut)| cut.dual())
        .sum();
    let bound = b.reduced_cost() + cut_slack;
    if a.reduced_cost() > bound + epsilon {
        return false;
    }
    a.capacity() < b.capacity()
        || a.time() < b.time() - epsilon
        || a.ng_memory() != b.ng_memory()
        || a.reduced_cost() < bound - epsilon
}

/// Result of checking a new label against the labels at its customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DominanceOutcome {
    /// The candidate is dominated and must be discarded.
    Dominated,
    /// The candidate survives; `removed` labels were deleted in its favour.
    Kept {
        /// Active labels removed.
        active: usize,
        /// Nodes deleted with dominated settled labels, descendants included.
        settled: usize,
    },
}

enum Classification {
    Dominated,
    Dominates(Vec<LabelId>),
}

/// Checks `candidate`, about to be inserted below `parent`, against the
/// active and settled labels of its customer and deletes what it dominates.
///
/// Classification runs on an unchanged pool; deletions happen only if the
/// candidate survives. Settled ancestors of the candidate are never deleted.
pub fn resolve(
    pool: &mut LabelPool,
    candidate: &ResourceLabel,
    parent: Option<LabelId>,
    cuts: &[SubsetRowCut],
    epsilon: f64,
) -> DominanceOutcome {
    let victims = match classify(pool, candidate, parent, cuts, epsilon) {
        Classification::Dominated => return DominanceOutcome::Dominated,
        Classification::Dominates(victims) => victims,
    };
    let mut active = 0;
    let mut settled = 0;
    for id in victims {
        match pool.state(id) {
            NodeState::Active => {
                pool.remove_active(id);
                active += 1;
            }
            NodeState::Settled => {
                let deleted = pool.delete_subtree(id);
                trace!(label = %id, deleted, "settled label dominated");
                settled += deleted;
            }
            // already removed with an earlier victim's subtree
            NodeState::Deleted | NodeState::Processing => {}
        }
    }
    DominanceOutcome::Kept { active, settled }
}

fn classify(
    pool: &LabelPool,
    candidate: &ResourceLabel,
    parent: Option<LabelId>,
    cuts: &[SubsetRowCut],
    epsilon: f64,
) -> Classification {
    let customer = candidate.customer();
    let mut victims = Vec::new();
    for id in pool.active(customer).chain(pool.settled(customer)) {
        let other = pool.label(id);
        if dominates(other, candidate, cuts, epsilon) {
            return Classification::Dominated;
        }
        if !dominates(candidate, other, cuts, epsilon) {
            continue;
        }
        let is_ancestor = parent.is_some_and(|p| pool.is_ancestor(id, p));
        if !is_ancestor {
            victims.push(id);
        }
    }
    Classification::Dominates(victims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitset::CustomerSet;
    use crate::labeling::Direction;

    fn label(rc: f64, cap: i32, time: f64, ng: &[usize], states: Vec<f64>) -> ResourceLabel {
        ResourceLabel::from_parts(3, rc, cap, time, ng.iter().copied().collect(), states)
    }

    fn cut(dual: f64) -> SubsetRowCut {
        SubsetRowCut::new(CustomerSet::from_indices([1, 2, 3]), 0.5, dual)
    }

    #[test]
    fn test_basic_dominance() {
        let a = label(-5.0, 3, 10.0, &[3], vec![]);
        let b = label(-4.0, 4, 12.0, &[2, 3], vec![]);
        assert!(dominates(&a, &b, &[], 1e-6));
        assert!(!dominates(&b, &a, &[], 1e-6));
    }

    #[test]
    fn test_each_resource_blocks() {
        let base = label(-5.0, 3, 10.0, &[3], vec![]);
        assert!(!dominates(&base, &label(-6.0, 3, 10.0, &[3, 4], vec![]), &[], 1e-6));
        assert!(!dominates(&base, &label(-4.0, 2, 10.0, &[3, 4], vec![]), &[], 1e-6));
        assert!(!dominates(&base, &label(-4.0, 3, 9.0, &[3, 4], vec![]), &[], 1e-6));
        assert!(!dominates(&base, &label(-4.0, 3, 10.0, &[4], vec![]), &[], 1e-6));
        let enforced = label(-4.0, 3, 10.0, &[3, 4], vec![]).with_enforced(CustomerSet::from_indices([2]));
        assert!(!dominates(&base, &enforced, &[], 1e-6));
    }

    #[test]
    fn test_identical_labels_keep_each_other() {
        let a = label(-5.0, 3, 10.0, &[3], vec![0.5]);
        let b = a.clone();
        assert!(!dominates(&a, &b, &[cut(-1.0)], 1e-6));
    }

    #[test]
    fn test_cut_state_requires_margin() {
        // A is half way to paying the cut, B isn't: A needs to be cheaper by |σ|
        let a = label(-5.0, 3, 10.0, &[3], vec![0.5]);
        let b = label(-4.5, 3, 10.0, &[3], vec![0.0]);
        assert!(!dominates(&a, &b, &[cut(-1.0)], 1e-6));
        let c = label(-3.5, 3, 10.0, &[3], vec![0.0]);
        assert!(dominates(&a, &c, &[cut(-1.0)], 1e-6));
        // the reverse direction needs no margin
        assert!(dominates(&label(-5.0, 3, 10.0, &[3], vec![0.0]), &label(-4.5, 3, 10.0, &[3], vec![0.5]), &[cut(-1.0)], 1e-6));
    }

    #[test]
    fn test_resolve_dominated_candidate_leaves_pool_unchanged() {
        let mut pool = LabelPool::new(Direction::Forward, 5);
        let strong = pool.insert(label(-10.0, 1, 1.0, &[3], vec![]), None);
        let weak = pool.insert(label(-1.0, 5, 20.0, &[2, 3], vec![]), None);
        let candidate = label(-5.0, 2, 5.0, &[3, 4], vec![]);
        let outcome = resolve(&mut pool, &candidate, None, &[], 1e-6);
        assert_eq!(outcome, DominanceOutcome::Dominated);
        assert_eq!(pool.active(3).collect::<Vec<_>>(), vec![strong, weak]);
    }

    #[test]
    fn test_resolve_insert_then_delete_is_idempotent() {
        let mut pool = LabelPool::new(Direction::Forward, 5);
        pool.insert(label(-3.0, 4, 8.0, &[3], vec![]), None);
        pool.insert(label(-2.0, 2, 9.0, &[3, 1], vec![]), None);
        let head = pool.first_active(3);
        let len = pool.active_len(3);

        let weak = label(-1.0, 3, 8.5, &[1, 3], vec![]);
        assert!(matches!(resolve(&mut pool, &weak, None, &[], 1e-6), DominanceOutcome::Kept { .. }));
        let id = pool.insert(weak, None);
        let strong = label(-6.0, 3, 8.5, &[3], vec![]);
        let outcome = resolve(&mut pool, &strong, None, &[], 1e-6);
        assert_eq!(outcome, DominanceOutcome::Kept { active: 1, settled: 0 });
        assert_eq!(pool.state(id), NodeState::Deleted);
        assert_eq!(pool.first_active(3), head);
        assert_eq!(pool.active_len(3), len);
        assert!(pool.check_invariants().is_ok());
    }

    #[test]
    fn test_resolve_deletes_settled_subtree_but_not_ancestors() {
        let mut pool = LabelPool::new(Direction::Forward, 5);
        let root = pool.insert(ResourceLabel::depot(Direction::Forward, 0.0, 0.0, 0), None);
        let _ = pool.pop_active(0);
        pool.settle(root);

        // a settled label at 3 with a child at 2
        let old = pool.insert(label(-1.0, 5, 10.0, &[3], vec![]), Some(root));
        let _ = pool.pop_active(3);
        let child = pool.insert(ResourceLabel::from_parts(2, -2.0, 6, 12.0, CustomerSet::from_indices([2, 3]), vec![]), Some(old));
        pool.settle(old);

        // the candidate descends from `old` through a processing label at 2
        let _ = pool.pop_active(2);
        let candidate = label(-8.0, 4, 9.0, &[3], vec![]);
        let outcome = resolve(&mut pool, &candidate, Some(child), &[], 1e-6);
        assert_eq!(outcome, DominanceOutcome::Kept { active: 0, settled: 0 });
        assert_eq!(pool.state(old), NodeState::Settled);

        // an unrelated candidate removes `old` together with its subtree
        let outcome = resolve(&mut pool, &candidate, Some(root), &[], 1e-6);
        assert_eq!(outcome, DominanceOutcome::Kept { active: 0, settled: 2 });
        assert_eq!(pool.state(child), NodeState::Deleted);
        assert_eq!(pool.settled_len(3), 0);
        assert!(pool.check_invariants().is_ok());
    }
}
