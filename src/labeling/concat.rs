//! Joining settled forward and backward labels into complete tours.
//!
//! A forward label ending at `i` and a backward label starting at `j` form
//! the tour `depot → … → i → j → … → depot`. The joined reduced cost is the
//! sum of both labels plus the price of arc `(i, j)`, corrected for cuts whose
//! two halves add up to a full crossing.

use std::iter;

use super::engine::LabelSets;
use super::label::{DayScope, ResourceLabel};
use super::pool::{LabelId, LabelPool};
use crate::distance::Matrix;
use crate::models::Tour;
use crate::pricing::SubsetRowCut;

/// Reduced cost of joining `f` and `b`, before the cut correction.
fn base_cost(scope: &DayScope<'_>, f: &ResourceLabel, b: &ResourceLabel) -> f64 {
    f.reduced_cost() + b.reduced_cost() + scope.ctx().prices().arc(f.customer(), b.customer())
}

fn is_compatible(scope: &DayScope<'_>, f: &ResourceLabel, b: &ResourceLabel) -> bool {
    let day = scope.day();
    let travel = scope.ctx().instance().travel(f.customer(), b.customer());
    f.capacity() + b.capacity() <= day.capacity()
        && f.time() + travel + b.time() <= day.horizon()
        && f.ng_memory().is_disjoint(b.ng_memory())
        && f.enforced().is_disjoint(b.enforced())
}

fn cut_correction(cuts: &[SubsetRowCut], f: &ResourceLabel, b: &ResourceLabel, epsilon: f64) -> f64 {
    f.cut_states()
        .iter()
        .zip(b.cut_states())
        .zip(cuts)
        .filter(|((sf, sb), _)| *sf + *sb >= 1.0 - epsilon)
        .map(|(_, cut)| -cut.dual())
        .sum()
}

/// Reduced cost of the tour formed by `f` and `b`, or `None` if the halves
/// can't be joined.
///
/// The halves are incompatible when their capacities exceed the day's
/// capacity, the joined schedule misses the horizon, or their ng-memories
/// or visited enforced customers overlap.
pub fn join_cost(scope: &DayScope<'_>, f: &ResourceLabel, b: &ResourceLabel) -> Option<f64> {
    if !is_compatible(scope, f, b) {
        return None;
    }
    let cuts = scope.ctx().cuts();
    Some(base_cost(scope, f, b) + cut_correction(cuts, f, b, scope.epsilon()))
}

/// Join candidates of one day: the depot first, then the day's customers.
fn endpoints<'s>(scope: &DayScope<'s>) -> impl Iterator<Item = usize> + Clone + 's {
    iter::once(0).chain(scope.graph().customers().iter().copied())
}

#[derive(Debug, Clone, Copy)]
struct Pair {
    forward: LabelId,
    backward: LabelId,
    reduced_cost: f64,
}

/// Finds negative joins and turns the best of them into tours.
///
/// The scan stops once more than `max_pairs` negative joins were found; at
/// most `max_tours` tours with distinct reduced costs are returned, sorted
/// ascending.
pub fn best_tours(
    scope: &DayScope<'_>,
    sets: &LabelSets,
    max_pairs: usize,
    max_tours: usize,
) -> Vec<Tour> {
    let eps = scope.epsilon();
    let branching = scope.ctx().branching();
    let cuts = scope.ctx().cuts();
    let mut pairs = Vec::new();

    'scan: for i in endpoints(scope) {
        for fid in sets.forward.settled(i) {
            let f = sets.forward.label(fid);
            for j in endpoints(scope) {
                if i == j || branching.is_forbidden(i, j) {
                    continue;
                }
                for bid in sets.backward.settled(j) {
                    let b = sets.backward.label(bid);
                    let base = base_cost(scope, f, b);
                    if base >= -eps {
                        break;
                    }
                    let rc = base + cut_correction(cuts, f, b, eps);
                    if rc < -eps && is_compatible(scope, f, b) {
                        pairs.push(Pair {
                            forward: fid,
                            backward: bid,
                            reduced_cost: rc,
                        });
                        if pairs.len() > max_pairs {
                            break 'scan;
                        }
                    }
                }
            }
        }
    }

    pairs.sort_by(|a, b| a.reduced_cost.total_cmp(&b.reduced_cost));
    let mut tours = Vec::new();
    let mut last: Option<f64> = None;
    for pair in pairs {
        if tours.len() >= max_tours {
            break;
        }
        if last.is_some_and(|l| (pair.reduced_cost - l).abs() <= eps) {
            continue;
        }
        last = Some(pair.reduced_cost);
        tours.push(build_tour(scope, &sets.forward, &sets.backward, pair));
    }
    tours
}

fn build_tour(scope: &DayScope<'_>, forward: &LabelPool, backward: &LabelPool, pair: Pair) -> Tour {
    let f = forward.label(pair.forward);
    let b = backward.label(pair.backward);
    let mut customers = forward.path_customers(pair.forward);
    customers.reverse();
    customers.extend(backward.path_customers(pair.backward));
    let objective =
        f.travel() + b.travel() + scope.ctx().instance().travel(f.customer(), b.customer());
    Tour::new(scope.day().id(), customers)
        .with_objective(objective)
        .with_capacity(f.capacity() + b.capacity())
        .with_reduced_cost(pair.reduced_cost)
}

/// Lower bounds on the reduced cost of tours on one day.
#[derive(Debug, Clone)]
pub struct DayBounds {
    day: usize,
    arcs: Matrix<f64>,
    customers: Vec<f64>,
    best: f64,
}

impl DayBounds {
    pub fn day(&self) -> usize {
        self.day
    }

    /// Smallest reduced cost of a tour using arc `(i, j)`; infinite if
    /// none exists.
    pub fn arc(&self, i: usize, j: usize) -> f64 {
        self.arcs.get(i, j)
    }

    /// Arc bounds of the day as a matrix.
    pub fn arcs(&self) -> &Matrix<f64> {
        &self.arcs
    }

    /// Smallest reduced cost of a tour whose forward half ends at
    /// `customer`; infinite if none exists.
    pub fn customer(&self, customer: usize) -> f64 {
        self.customers[customer]
    }

    /// Smallest reduced cost of any tour on the day, capped at zero.
    pub fn best(&self) -> f64 {
        self.best
    }
}

/// Computes the reduced-cost bounds of one day.
///
/// Every feasible join is considered unless a cheaper one is already known
/// for its arc and its forward endpoint. Without active cuts the first
/// feasible backward label of a scan is the cheapest.
pub fn day_bounds(scope: &DayScope<'_>, sets: &LabelSets) -> DayBounds {
    let n = scope.ctx().instance().num_locations();
    let eps = scope.epsilon();
    let branching = scope.ctx().branching();
    let cuts = scope.ctx().cuts();
    let mut bounds = DayBounds {
        day: scope.day().id(),
        arcs: Matrix::filled(n, f64::INFINITY),
        customers: vec![f64::INFINITY; n],
        best: 0.0,
    };

    for i in endpoints(scope) {
        let mut min_i = f64::INFINITY;
        for fid in sets.forward.settled(i) {
            let f = sets.forward.label(fid);
            for j in endpoints(scope) {
                if i == j || branching.is_forbidden(i, j) {
                    continue;
                }
                let mut min_ij = f64::INFINITY;
                for bid in sets.backward.settled(j) {
                    let b = sets.backward.label(bid);
                    let base = base_cost(scope, f, b);
                    if base >= min_ij - eps && base >= min_i - eps {
                        break;
                    }
                    if !is_compatible(scope, f, b) {
                        continue;
                    }
                    let rc = base + cut_correction(cuts, f, b, eps);
                    min_ij = min_ij.min(rc);
                    min_i = min_i.min(rc);
                    bounds.best = bounds.best.min(rc);
                    if cuts.is_empty() {
                        break;
                    }
                }
                if min_ij < bounds.arcs.get(i, j) {
                    bounds.arcs.set(i, j, min_ij);
                }
            }
        }
        bounds.customers[i] = min_i;
    }
    bounds
}
