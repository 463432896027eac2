//! Column shift: swapping a tour customer for an unused one.

use super::column::WorkingColumn;
use super::insertion::{around, exchange_cost};

/// For every unused customer, replaces the first tour customer whose
/// exchange lowers the reduced cost and keeps the tour feasible.
///
/// Enforced customers of the column's day are never replaced. Returns
/// `true` if any exchange was made.
pub(crate) fn shift_column(col: &mut WorkingColumn<'_>) -> bool {
    let instance = col.instance();
    let weight = col.travel_weight();
    let mut success = false;

    for &cust in col.candidates() {
        if col.in_tour[cust] {
            continue;
        }
        for pos in 0..col.customers.len() {
            let old = col.customers[pos];
            if col.is_enforced_here(old) {
                continue;
            }
            if col.load + col.demand(cust) - col.demand(old) > col.capacity() {
                continue;
            }
            let (prev, next) = around(&col.customers, pos);
            if col.is_forbidden(prev, cust) || col.is_forbidden(cust, next) {
                continue;
            }
            let travel = exchange_cost(instance, &col.customers, pos, cust);
            let delta = weight * travel - col.dual(cust) + col.dual(old);
            if delta >= -col.epsilon {
                continue;
            }
            col.customers[pos] = cust;
            if col.is_feasible() {
                col.load += col.demand(cust) - col.demand(old);
                col.in_tour[cust] = true;
                col.in_tour[old] = false;
                success = true;
                break;
            }
            col.customers[pos] = old;
        }
    }
    success
}
