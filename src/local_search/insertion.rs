//! Travel deltas of single-position tour edits.
//!
//! Tours are customer sequences with the depot (location 0) implied at both
//! ends.

use crate::models::Instance;

fn neighbours(tour: &[usize], pos: usize, replaced: bool) -> (usize, usize) {
    let prev = if pos == 0 { 0 } else { tour[pos - 1] };
    let next_pos = if replaced { pos + 1 } else { pos };
    let next = tour.get(next_pos).copied().unwrap_or(0);
    (prev, next)
}

/// Travel added by inserting `customer` before position `pos`
/// (`pos == tour.len()` appends).
pub fn insertion_cost(instance: &Instance, tour: &[usize], pos: usize, customer: usize) -> f64 {
    let (prev, next) = neighbours(tour, pos, false);
    // old: prev → next, new: prev → customer → next
    instance.travel(prev, customer) + instance.travel(customer, next) - instance.travel(prev, next)
}

/// Travel added by removing the customer at `pos`; usually negative.
pub fn removal_cost(instance: &Instance, tour: &[usize], pos: usize) -> f64 {
    let (prev, next) = neighbours(tour, pos, true);
    let c = tour[pos];
    // old: prev → c → next, new: prev → next
    instance.travel(prev, next) - instance.travel(prev, c) - instance.travel(c, next)
}

/// Travel added by replacing the customer at `pos` with `customer`.
pub fn exchange_cost(instance: &Instance, tour: &[usize], pos: usize, customer: usize) -> f64 {
    let (prev, next) = neighbours(tour, pos, true);
    let old = tour[pos];
    instance.travel(prev, customer) + instance.travel(customer, next)
        - instance.travel(prev, old)
        - instance.travel(old, next)
}

/// Predecessor and successor of position `pos` when the customer there is
/// replaced or removed.
pub(crate) fn around(tour: &[usize], pos: usize) -> (usize, usize) {
    neighbours(tour, pos, true)
}

/// Predecessor and successor of an insertion before `pos`.
pub(crate) fn gap(tour: &[usize], pos: usize) -> (usize, usize) {
    neighbours(tour, pos, false)
}
