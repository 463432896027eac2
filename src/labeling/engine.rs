//! Bidirectional label propagation for one scheduling day.
//!
//! A FIFO queue of customers drives the search. For the customer at the
//! front, all active forward labels and then all active backward labels are
//! extended to their neighbours in the day graph; every customer that
//! received a new label is queued unless it already is.

use std::collections::VecDeque;

use super::dominance::{self, DominanceOutcome};
use super::label::{DayScope, Direction, ResourceLabel};
use super::pool::{LabelId, LabelPool, NodeState};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Counters collected during one propagation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineStats {
    /// Labels inserted into a pool (the two depot labels included).
    pub created: usize,
    /// Extensions rejected by capacity or time windows.
    pub rejected: usize,
    /// New labels discarded because an existing label dominated them.
    pub dominated: usize,
    /// Existing labels removed by a new label, descendants included.
    pub deleted: usize,
    /// Labels moved to a settled list.
    pub settled: usize,
    /// Labels settled without extension by halfway pruning.
    pub halfway_pruned: usize,
}

impl EngineStats {
    /// Adds the counters of `other`.
    pub fn absorb(&mut self, other: &EngineStats) {
        self.created += other.created;
        self.rejected += other.rejected;
        self.dominated += other.dominated;
        self.deleted += other.deleted;
        self.settled += other.settled;
        self.halfway_pruned += other.halfway_pruned;
    }
}

/// Settled forward and backward labels of a finished run.
#[derive(Debug)]
pub struct LabelSets {
    pub forward: LabelPool,
    pub backward: LabelPool,
    pub stats: EngineStats,
}

/// Propagation engine of one day.
///
/// # Examples
///
/// ```
/// use u_pricing::distance::DistanceMatrix;
/// use u_pricing::labeling::{DayScope, LabelingEngine};
/// use u_pricing::models::{Customer, Day, Instance, TimeWindow};
/// use u_pricing::pricing::{
///     BranchingState, DualValues, Objective, PricingConfig, PricingContext, PricingMode,
/// };
///
/// let tw = TimeWindow::new(0.0, 100.0).unwrap();
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 3.0, 4.0, 1, 0.0).with_window(0, tw),
///     Customer::new(2, 6.0, 8.0, 1, 0.0).with_window(0, tw),
/// ];
/// let travel = DistanceMatrix::from_customers(&customers);
/// let instance = Instance::new(customers, vec![Day::new(0, 10, 100.0)], travel, 2).unwrap();
/// let branching = BranchingState::root(&instance);
/// let duals = DualValues::new(vec![0.0, 20.0, 20.0], vec![0.0]);
/// let ctx = PricingContext::new(
///     &instance, &branching, &duals, &[], PricingMode::ReducedCost, Objective::MinTravel,
/// ).unwrap();
///
/// let config = PricingConfig::default();
/// let sets = LabelingEngine::new(DayScope::new(&ctx, 0, &config), true, false).run();
/// assert!(sets.forward.settled_len(2) > 0);
/// assert!(sets.backward.settled_len(1) > 0);
/// ```
pub struct LabelingEngine<'a> {
    scope: DayScope<'a>,
    dominance: bool,
    halfway_pruning: bool,
    forward: LabelPool,
    backward: LabelPool,
    queue: VecDeque<usize>,
    in_queue: Vec<bool>,
    stats: EngineStats,
}

impl<'a> LabelingEngine<'a> {
    /// Creates an engine seeded with the depot labels of the scope's day.
    pub fn new(scope: DayScope<'a>, dominance: bool, halfway_pruning: bool) -> Self {
        let n = scope.ctx().instance().num_locations();
        let mut forward = LabelPool::new(Direction::Forward, n);
        let mut backward = LabelPool::new(Direction::Backward, n);
        forward.insert(ResourceLabel::initial(Direction::Forward, &scope), None);
        backward.insert(ResourceLabel::initial(Direction::Backward, &scope), None);

        let mut in_queue = vec![false; n];
        in_queue[0] = true;
        Self {
            scope,
            dominance,
            halfway_pruning,
            forward,
            backward,
            queue: VecDeque::from([0]),
            in_queue,
            stats: EngineStats {
                created: 2,
                ..EngineStats::default()
            },
        }
    }

    /// Propagates until the queue drains.
    pub fn run(mut self) -> LabelSets {
        while let Some(&customer) = self.queue.front() {
            self.expand(Direction::Forward, customer);
            self.expand(Direction::Backward, customer);
            self.in_queue[customer] = false;
            self.queue.pop_front();
        }
        debug_assert!(self.forward.check_invariants().is_ok());
        debug_assert!(self.backward.check_invariants().is_ok());

        debug!(
            day = self.scope.day().id(),
            created = self.stats.created,
            dominated = self.stats.dominated,
            deleted = self.stats.deleted,
            settled = self.stats.settled,
            "propagation finished"
        );
        LabelSets {
            forward: self.forward,
            backward: self.backward,
            stats: self.stats,
        }
    }

    fn expand(&mut self, direction: Direction, customer: usize) {
        let half = self.scope.day().half_horizon();
        loop {
            let Some(id) = self.pool_mut(direction).pop_active(customer) else {
                break;
            };
            let label = self.pool(direction).label(id).clone();
            if !(self.halfway_pruning && label.time() > half) {
                self.extend_all(direction, id, &label);
            } else {
                self.stats.halfway_pruned += 1;
            }
            if self.pool(direction).state(id) == NodeState::Processing {
                self.pool_mut(direction).settle(id);
                self.stats.settled += 1;
            }
        }
    }

    fn extend_all(&mut self, direction: Direction, id: LabelId, label: &ResourceLabel) {
        let scope = self.scope;
        let graph = scope.graph();
        let neighbours = match direction {
            Direction::Forward => graph.successors(label.customer()),
            Direction::Backward => graph.predecessors(label.customer()),
        };
        let cuts = scope.ctx().cuts();
        for &target in neighbours {
            if label.blocks(target) {
                continue;
            }
            let Some(new) = label.extend(direction, target, &scope) else {
                self.stats.rejected += 1;
                continue;
            };
            if self.dominance {
                let pool = self.pool_mut(direction);
                match dominance::resolve(pool, &new, Some(id), cuts, scope.epsilon()) {
                    DominanceOutcome::Dominated => {
                        self.stats.dominated += 1;
                        continue;
                    }
                    DominanceOutcome::Kept { active, settled } => {
                        self.stats.deleted += active + settled;
                    }
                }
            }
            self.pool_mut(direction).insert(new, Some(id));
            self.stats.created += 1;
            if !self.in_queue[target] {
                self.in_queue[target] = true;
                self.queue.push_back(target);
            }
            if self.pool(direction).state(id) == NodeState::Deleted {
                break;
            }
        }
    }

    fn pool(&self, direction: Direction) -> &LabelPool {
        match direction {
            Direction::Forward => &self.forward,
            Direction::Backward => &self.backward,
        }
    }

    fn pool_mut(&mut self, direction: Direction) -> &mut LabelPool {
        match direction {
            Direction::Forward => &mut self.forward,
            Direction::Backward => &mut self.backward,
        }
    }
}
