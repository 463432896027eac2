//! Branching decisions seen by pricing and the per-day filtered graph.

use crate::distance::Matrix;
use crate::error::PricingError;
use crate::models::Instance;
use serde::{Deserialize, Serialize};

/// Branching decisions of the current tree node.
///
/// The timetable tells on which days a customer may still be visited,
/// `forbidden` holds prohibited arcs and fixed days are skipped by pricing.
///
/// # Examples
///
/// ```
/// use u_pricing::models::{Customer, Day, Instance, TimeWindow};
/// use u_pricing::distance::DistanceMatrix;
/// use u_pricing::pricing::BranchingState;
///
/// let tw = TimeWindow::new(0.0, 100.0).unwrap();
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 1.0, 0.0, 1, 0.0).with_window(0, tw).with_window(1, tw),
///     Customer::new(2, 2.0, 0.0, 1, 0.0).with_window(0, tw),
/// ];
/// let travel = DistanceMatrix::from_customers(&customers);
/// let days = vec![Day::new(0, 10, 100.0), Day::new(1, 10, 100.0)];
/// let instance = Instance::new(customers, days, travel, 2).unwrap();
///
/// let mut branching = BranchingState::root(&instance);
/// assert_eq!(branching.enforced_days(&instance), vec![None, None, Some(0)]);
/// branching.enforce_day(1, 1);
/// assert!(!branching.is_available(1, 0));
/// assert_eq!(branching.enforced_days(&instance)[1], Some(1));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BranchingState {
    timetable: Vec<Vec<bool>>,
    forbidden: Matrix<bool>,
    fixed_days: Vec<bool>,
}

impl BranchingState {
    /// Decisions of the root node: customers are available on the days
    /// they have a window, no arc is forbidden, no day is fixed.
    pub fn root(instance: &Instance) -> Self {
        let days = instance.num_days();
        let timetable = instance
            .customers()
            .iter()
            .enumerate()
            .map(|(i, c)| (0..days).map(|d| i == 0 || c.is_available(d)).collect())
            .collect();
        Self {
            timetable,
            forbidden: Matrix::filled(instance.num_locations(), false),
            fixed_days: vec![false; days],
        }
    }

    /// Checks the dimensions against the instance.
    pub fn check(&self, instance: &Instance) -> Result<(), PricingError> {
        if self.timetable.len() != instance.num_locations()
            || self.forbidden.size() != instance.num_locations()
        {
            return Err(PricingError::DimensionMismatch {
                what: "branching state",
                expected: instance.num_locations(),
                actual: self.timetable.len(),
            });
        }
        if self.fixed_days.len() != instance.num_days()
            || self.timetable.iter().any(|row| row.len() != instance.num_days())
        {
            return Err(PricingError::DimensionMismatch {
                what: "branching timetable days",
                expected: instance.num_days(),
                actual: self.fixed_days.len(),
            });
        }
        Ok(())
    }

    /// Returns `true` if `customer` may still be visited on `day`.
    pub fn is_available(&self, customer: usize, day: usize) -> bool {
        self.timetable[customer][day]
    }

    /// Prohibits `customer` on `day`.
    pub fn remove_day(&mut self, customer: usize, day: usize) {
        if customer != 0 {
            self.timetable[customer][day] = false;
        }
    }

    /// Forces `customer` onto `day` by prohibiting every other day.
    pub fn enforce_day(&mut self, customer: usize, day: usize) {
        if customer == 0 {
            return;
        }
        for (d, slot) in self.timetable[customer].iter_mut().enumerate() {
            *slot = *slot && d == day;
        }
    }

    /// Days that were forced for each location: a customer available on a
    /// single day served by a single vehicle must be visited on that day.
    pub fn enforced_days(&self, instance: &Instance) -> Vec<Option<usize>> {
        self.timetable
            .iter()
            .enumerate()
            .map(|(c, row)| {
                if c == 0 {
                    return None;
                }
                let mut open = row.iter().enumerate().filter(|(_, &a)| a).map(|(d, _)| d);
                match (open.next(), open.next()) {
                    (Some(d), None) if instance.day(d).vehicles() == 1 => Some(d),
                    _ => None,
                }
            })
            .collect()
    }

    /// Prohibits the arc `from → to`.
    pub fn forbid_arc(&mut self, from: usize, to: usize) {
        self.forbidden.set(from, to, true);
    }

    /// Forces the arc `from → to` by prohibiting the competing arcs.
    ///
    /// Between two customers every other arc leaving `from` and entering
    /// `to` is prohibited. An arc into the depot prohibits `from → j` for
    /// all customers `j`; an arc out of the depot prohibits `j → to`.
    pub fn enforce_arc(&mut self, from: usize, to: usize) {
        let n = self.forbidden.size();
        if from != 0 && to != 0 {
            for j in 0..n {
                if j != to {
                    self.forbidden.set(from, j, true);
                }
                if j != from {
                    self.forbidden.set(j, to, true);
                }
            }
        } else if to == 0 {
            for j in 1..n {
                self.forbidden.set(from, j, true);
            }
        } else {
            for j in 1..n {
                self.forbidden.set(j, to, true);
            }
        }
    }

    /// Returns `true` if the arc `from → to` is prohibited.
    pub fn is_forbidden(&self, from: usize, to: usize) -> bool {
        self.forbidden.get(from, to)
    }

    /// Returns `true` if a tour may return to the depot directly after
    /// `customer`.
    pub fn allows_depot_return(&self, customer: usize) -> bool {
        !self.forbidden.get(customer, 0)
    }

    /// Excludes `day` from pricing.
    pub fn fix_day(&mut self, day: usize) {
        self.fixed_days[day] = true;
    }

    /// Returns `true` if `day` is excluded from pricing.
    pub fn is_day_fixed(&self, day: usize) -> bool {
        self.fixed_days[day]
    }
}

/// Adjacency of one day after filtering by availability, reachability and
/// forbidden arcs.
///
/// Successor lists never contain the depot; the depot's predecessor list
/// holds the customers that may close a tour.
#[derive(Debug, Clone)]
pub struct DayGraph {
    day: usize,
    customers: Vec<usize>,
    available: Vec<bool>,
    successors: Vec<Vec<usize>>,
    predecessors: Vec<Vec<usize>>,
}

impl DayGraph {
    /// Builds the graph of `day`.
    pub fn build(instance: &Instance, branching: &BranchingState, day: usize) -> Self {
        let n = instance.num_locations();
        let available: Vec<bool> = (0..n).map(|c| branching.is_available(c, day)).collect();
        let mut successors = vec![Vec::new(); n];
        let mut predecessors = vec![Vec::new(); n];
        for u in (0..n).filter(|&u| available[u]) {
            for v in (0..n).filter(|&v| available[v]) {
                if branching.is_forbidden(u, v) || !instance.is_reachable(day, u, v) {
                    continue;
                }
                if v != 0 {
                    successors[u].push(v);
                }
                if u != 0 {
                    predecessors[v].push(u);
                }
            }
        }
        Self {
            day,
            customers: (1..n).filter(|&c| available[c]).collect(),
            available,
            successors,
            predecessors,
        }
    }

    /// Day of the graph.
    pub fn day(&self) -> usize {
        self.day
    }

    /// Customers available on the day (depot excluded).
    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    /// Returns `true` if `location` may be visited on the day.
    pub fn is_available(&self, location: usize) -> bool {
        self.available[location]
    }

    /// Forward neighbours of `u`.
    pub fn successors(&self, u: usize) -> &[usize] {
        &self.successors[u]
    }

    /// Backward neighbours of `v`.
    pub fn predecessors(&self, v: usize) -> &[usize] {
        &self.predecessors[v]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::{Customer, Day, TimeWindow};

    fn instance() -> Instance {
        let tw = TimeWindow::new(0.0, 100.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 1.0, 0.0, 1, 0.0).with_window(0, tw).with_window(1, tw),
            Customer::new(2, 2.0, 0.0, 1, 0.0).with_window(0, tw),
            Customer::new(3, 3.0, 0.0, 1, 0.0).with_window(1, tw),
        ];
        let travel = DistanceMatrix::from_customers(&customers);
        let days = vec![Day::new(0, 10, 100.0), Day::new(1, 10, 100.0).with_vehicles(2)];
        Instance::new(customers, days, travel, 2).expect("valid")
    }

    #[test]
    fn test_root_enforced_needs_single_vehicle() {
        let inst = instance();
        let b = BranchingState::root(&inst);
        // customer 3 is only available on day 1, which has two vehicles
        assert_eq!(b.enforced_days(&inst), vec![None, None, Some(0), None]);
    }

    #[test]
    fn test_remove_day() {
        let inst = instance();
        let mut b = BranchingState::root(&inst);
        b.remove_day(1, 1);
        assert!(b.is_available(1, 0));
        assert!(!b.is_available(1, 1));
        assert_eq!(b.enforced_days(&inst)[1], Some(0));
        b.remove_day(0, 0);
        assert!(b.is_available(0, 0));
    }

    #[test]
    fn test_enforce_arc_between_customers() {
        let inst = instance();
        let mut b = BranchingState::root(&inst);
        b.enforce_arc(1, 2);
        assert!(!b.is_forbidden(1, 2));
        assert!(b.is_forbidden(1, 3));
        assert!(b.is_forbidden(1, 0));
        assert!(b.is_forbidden(3, 2));
        assert!(b.is_forbidden(0, 2));
        assert!(!b.allows_depot_return(1));
        assert!(b.allows_depot_return(2));
    }

    #[test]
    fn test_enforce_arc_with_depot() {
        let inst = instance();
        let mut b = BranchingState::root(&inst);
        b.enforce_arc(2, 0);
        assert!(b.is_forbidden(2, 1));
        assert!(!b.is_forbidden(2, 0));
        b.enforce_arc(0, 3);
        assert!(b.is_forbidden(1, 3));
        assert!(!b.is_forbidden(0, 3));
    }

    #[test]
    fn test_day_graph() {
        let inst = instance();
        let mut b = BranchingState::root(&inst);
        b.forbid_arc(2, 1);
        let g = DayGraph::build(&inst, &b, 0);
        assert_eq!(g.customers(), &[1, 2]);
        assert_eq!(g.successors(0), &[1, 2]);
        assert_eq!(g.successors(1), &[2]);
        assert!(g.successors(2).is_empty());
        assert_eq!(g.predecessors(0), &[1, 2]);
        assert_eq!(g.predecessors(2), &[1]);
        assert!(g.predecessors(1).is_empty());
        assert!(!g.is_available(3));
    }

    #[test]
    fn test_check_dimensions() {
        let inst = instance();
        assert!(BranchingState::root(&inst).check(&inst).is_ok());
        let mut b = BranchingState::root(&inst);
        b.timetable.pop();
        assert!(b.check(&inst).is_err());
    }
}
