//! Resource labels and their extension along an arc.

use crate::bitset::CustomerSet;
use crate::models::Day;
use crate::pricing::{DayGraph, PricingConfig, PricingContext};

/// Direction a label was propagated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the depot towards the customers; time is the departure time.
    Forward,
    /// From the depot back towards the customers; time is the horizon minus
    /// the latest service start.
    Backward,
}

/// Everything an extension on one day reads.
#[derive(Debug, Clone, Copy)]
pub struct DayScope<'a> {
    ctx: &'a PricingContext<'a>,
    day: &'a Day,
    graph: &'a DayGraph,
    ng_filter: &'a [CustomerSet],
    epsilon: f64,
    enforced_bonus: f64,
}

impl<'a> DayScope<'a> {
    /// Scope of `day` within a pricing round.
    pub fn new(ctx: &'a PricingContext<'a>, day: usize, config: &PricingConfig) -> Self {
        Self {
            ctx,
            day: ctx.instance().day(day),
            graph: ctx.graph(day),
            ng_filter: ctx.instance().ng_sets(),
            epsilon: config.epsilon,
            enforced_bonus: config.enforced_bonus,
        }
    }

    /// Filters the ng-memory with `sets` instead of the ng-neighbourhoods.
    pub fn with_ng_filter(mut self, sets: &'a [CustomerSet]) -> Self {
        self.ng_filter = sets;
        self
    }

    pub fn ctx(&self) -> &'a PricingContext<'a> {
        self.ctx
    }

    pub fn day(&self) -> &'a Day {
        self.day
    }

    pub fn graph(&self) -> &'a DayGraph {
        self.graph
    }

    /// Set the ng-memory is intersected with when extending to `customer`.
    pub fn ng_filter(&self, customer: usize) -> &'a CustomerSet {
        &self.ng_filter[customer]
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    pub fn enforced_bonus(&self) -> f64 {
        self.enforced_bonus
    }
}

/// Partial path state: endpoint, reduced cost and consumed resources.
///
/// # Examples
///
/// ```
/// use u_pricing::labeling::{Direction, ResourceLabel};
///
/// let start = ResourceLabel::depot(Direction::Forward, -3.0, 0.0, 2);
/// assert_eq!(start.customer(), 0);
/// assert_eq!(start.capacity(), 0);
/// assert_eq!(start.cut_states(), &[0.0, 0.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceLabel {
    customer: usize,
    reduced_cost: f64,
    capacity: i32,
    time: f64,
    travel: f64,
    ng_memory: CustomerSet,
    enforced: CustomerSet,
    cut_states: Vec<f64>,
}

impl ResourceLabel {
    /// Empty path at the depot.
    pub fn depot(direction: Direction, reduced_cost: f64, start: f64, cuts: usize) -> Self {
        let time = match direction {
            Direction::Forward => start,
            Direction::Backward => 0.0,
        };
        Self {
            customer: 0,
            reduced_cost,
            capacity: 0,
            time,
            travel: 0.0,
            ng_memory: CustomerSet::EMPTY,
            enforced: CustomerSet::EMPTY,
            cut_states: vec![0.0; cuts],
        }
    }

    /// Initial label of `direction` on the scope's day.
    pub fn initial(direction: Direction, scope: &DayScope<'_>) -> Self {
        let rc = match direction {
            Direction::Forward => scope
                .ctx()
                .initial_forward_cost(scope.day().id(), scope.enforced_bonus()),
            Direction::Backward => 0.0,
        };
        Self::depot(direction, rc, scope.day().start(), scope.ctx().cuts().len())
    }

    pub fn customer(&self) -> usize {
        self.customer
    }

    pub fn reduced_cost(&self) -> f64 {
        self.reduced_cost
    }

    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Travel time accumulated along the path.
    pub fn travel(&self) -> f64 {
        self.travel
    }

    pub fn ng_memory(&self) -> &CustomerSet {
        &self.ng_memory
    }

    /// Enforced customers visited along the path.
    pub fn enforced(&self) -> &CustomerSet {
        &self.enforced
    }

    /// Fractional state per active subset-row cut, each in `[0, 1)`.
    pub fn cut_states(&self) -> &[f64] {
        &self.cut_states
    }

    /// Returns `true` if extending to `target` would revisit a customer
    /// still in memory or an enforced customer already served.
    pub fn blocks(&self, target: usize) -> bool {
        self.ng_memory.contains(target) || self.enforced.contains(target)
    }

    /// Extends the path to `target`.
    ///
    /// Returns `None` when the day's capacity or the target's time window
    /// would be violated.
    pub fn extend(
        &self,
        direction: Direction,
        target: usize,
        scope: &DayScope<'_>,
    ) -> Option<ResourceLabel> {
        let ctx = scope.ctx();
        let instance = ctx.instance();
        let day = scope.day();
        let from = self.customer;

        let capacity = self.capacity + instance.demand(target);
        if capacity > day.capacity() {
            return None;
        }

        let tw = instance.customers()[target].window(day.id())?;
        let (time, arc_travel, price) = match direction {
            Direction::Forward => {
                let travel = instance.travel(from, target);
                let arrival = self.time + travel;
                if tw.is_violated(arrival) {
                    return None;
                }
                let time = tw.service_start(arrival) + instance.service(target);
                (time, travel, ctx.prices().arc(from, target))
            }
            Direction::Backward => {
                let travel = instance.travel(target, from);
                let arrival = self.time + travel + instance.service(target);
                if arrival > day.horizon() - tw.ready() {
                    return None;
                }
                let time = arrival.max(day.horizon() - tw.due());
                (time, travel, ctx.prices().arc(target, from))
            }
        };

        let mut ng_memory = self.ng_memory.intersection(scope.ng_filter(target));
        ng_memory.insert(target);

        let mut reduced_cost = self.reduced_cost + price;
        let mut enforced = self.enforced;
        if ctx.enforced_day(target) == Some(day.id()) {
            reduced_cost -= scope.enforced_bonus();
            enforced.insert(target);
        }

        let mut cut_states = self.cut_states.clone();
        for (state, cut) in cut_states.iter_mut().zip(ctx.cuts()) {
            if !cut.covers(target) {
                continue;
            }
            *state += cut.parameter();
            if *state >= 1.0 - scope.epsilon() {
                reduced_cost -= cut.dual();
                *state -= 1.0;
            }
        }

        Some(ResourceLabel {
            customer: target,
            reduced_cost,
            capacity,
            time,
            travel: self.travel + arc_travel,
            ng_memory,
            enforced,
            cut_states,
        })
    }
}

#[cfg(test)]
impl ResourceLabel {
    pub(crate) fn from_parts(
        customer: usize,
        reduced_cost: f64,
        capacity: i32,
        time: f64,
        ng_memory: CustomerSet,
        cut_states: Vec<f64>,
    ) -> Self {
        Self {
            customer,
            reduced_cost,
            capacity,
            time,
            travel: 0.0,
            ng_memory,
            enforced: CustomerSet::EMPTY,
            cut_states,
        }
    }

    pub(crate) fn with_enforced(mut self, enforced: CustomerSet) -> Self {
        self.enforced = enforced;
        self
    }
}
