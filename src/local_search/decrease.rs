//! Column decrease: dropping customers that don't pay for their detour.

use super::column::WorkingColumn;
use super::insertion::{around, removal_cost};

/// Removes, front to back, every customer whose dual is smaller than the
/// travel saved by skipping it.
///
/// Enforced customers stay, and so does a customer whose neighbours may not
/// be joined directly. Returns `true` if any customer was removed.
pub(crate) fn decrease_column(col: &mut WorkingColumn<'_>) -> bool {
    let instance = col.instance();
    let weight = col.travel_weight();
    let mut success = false;
    let mut pos = 0;

    while pos < col.customers.len() {
        let cust = col.customers[pos];
        let (prev, next) = around(&col.customers, pos);
        if col.is_enforced_here(cust) || col.is_forbidden(prev, next) {
            pos += 1;
            continue;
        }
        let delta = weight * removal_cost(instance, &col.customers, pos) + col.dual(cust);
        if delta >= -col.epsilon {
            pos += 1;
            continue;
        }
        col.customers.remove(pos);
        if !col.is_feasible() {
            col.customers.insert(pos, cust);
            pos += 1;
            continue;
        }
        col.in_tour[cust] = false;
        col.load -= col.demand(cust);
        success = true;
    }
    success
}
