//! Column extension: cheapest insertion of unused customers.

use super::column::WorkingColumn;
use super::insertion::{gap, insertion_cost};

/// Inserts every unused customer with a positive dual at its cheapest
/// feasible position, as long as the extra travel stays below the dual.
///
/// When travel isn't priced any feasible position is accepted. Returns
/// `true` if at least one customer was inserted.
pub(crate) fn extend_column(col: &mut WorkingColumn<'_>) -> bool {
    let mut success = false;
    for &cust in col.candidates() {
        if col.in_tour[cust] {
            continue;
        }
        let dual = col.dual(cust);
        if dual <= col.epsilon {
            continue;
        }
        if col.load + col.demand(cust) > col.capacity() {
            continue;
        }
        let threshold = if col.prices_travel() {
            dual
        } else {
            f64::INFINITY
        };
        if let Some(pos) = cheapest_insertion(col, cust, threshold) {
            col.customers.insert(pos, cust);
            col.in_tour[cust] = true;
            col.load += col.demand(cust);
            success = true;
        }
    }
    success
}

/// Cheapest feasible position for `cust` whose extra travel is below
/// `threshold`. Ties keep the earliest position.
fn cheapest_insertion(col: &WorkingColumn<'_>, cust: usize, threshold: f64) -> Option<usize> {
    let instance = col.instance();
    let mut best = threshold;
    let mut best_pos = None;
    let mut trial = Vec::with_capacity(col.customers.len() + 1);

    for pos in 0..=col.customers.len() {
        let (prev, next) = gap(&col.customers, pos);
        if col.is_forbidden(prev, cust) || col.is_forbidden(cust, next) {
            continue;
        }
        let extra = insertion_cost(instance, &col.customers, pos, cust);
        if extra - best >= -col.epsilon {
            continue;
        }
        trial.clear();
        trial.extend_from_slice(&col.customers[..pos]);
        trial.push(cust);
        trial.extend_from_slice(&col.customers[pos..]);
        if col.is_feasible_sequence(&trial) {
            best = extra;
            best_pos = Some(pos);
        }
    }
    best_pos
}
