//! Tours (candidate columns) and existing master columns.

use serde::{Deserialize, Serialize};

/// An ordered sequence of customers served by one vehicle on one day.
///
/// The tour starts and ends at the depot, which is not stored in the
/// sequence. Objective, capacity and reduced cost are filled in by whoever
/// produces the tour (labeling, local search or the evaluator).
///
/// # Examples
///
/// ```
/// use u_pricing::models::Tour;
///
/// let tour = Tour::new(2, vec![4, 1, 7]);
/// assert_eq!(tour.day(), 2);
/// assert_eq!(tour.len(), 3);
/// assert!(tour.is_elementary());
/// assert!(tour.contains(7));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    day: usize,
    customers: Vec<usize>,
    objective: f64,
    capacity: i32,
    reduced_cost: f64,
}

impl Tour {
    /// Creates a tour for `day` visiting `customers` in order.
    pub fn new(day: usize, customers: Vec<usize>) -> Self {
        Self {
            day,
            customers,
            objective: 0.0,
            capacity: 0,
            reduced_cost: 0.0,
        }
    }

    /// Sets the travel objective.
    pub fn with_objective(mut self, objective: f64) -> Self {
        self.objective = objective;
        self
    }

    /// Sets the consumed capacity.
    pub fn with_capacity(mut self, capacity: i32) -> Self {
        self.capacity = capacity;
        self
    }

    /// Sets the reduced cost.
    pub fn with_reduced_cost(mut self, reduced_cost: f64) -> Self {
        self.reduced_cost = reduced_cost;
        self
    }

    /// Day the tour is driven on.
    pub fn day(&self) -> usize {
        self.day
    }

    /// Customers in visiting order (depot excluded).
    pub fn customers(&self) -> &[usize] {
        &self.customers
    }

    /// Number of customers visited.
    pub fn len(&self) -> usize {
        self.customers.len()
    }

    /// Returns `true` if the tour visits no customer.
    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    /// Returns `true` if the tour visits `customer`.
    pub fn contains(&self, customer: usize) -> bool {
        self.customers.contains(&customer)
    }

    /// Returns `true` if no customer is visited twice.
    pub fn is_elementary(&self) -> bool {
        let mut seen = std::collections::HashSet::with_capacity(self.customers.len());
        self.customers.iter().all(|c| seen.insert(*c))
    }

    /// Total travel time of the closed tour.
    pub fn objective(&self) -> f64 {
        self.objective
    }

    /// Sets the travel objective.
    pub fn set_objective(&mut self, objective: f64) {
        self.objective = objective;
    }

    /// Total demand served.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Sets the consumed capacity.
    pub fn set_capacity(&mut self, capacity: i32) {
        self.capacity = capacity;
    }

    /// Reduced cost with respect to the duals the tour was priced with.
    pub fn reduced_cost(&self) -> f64 {
        self.reduced_cost
    }

    /// Sets the reduced cost.
    pub fn set_reduced_cost(&mut self, reduced_cost: f64) {
        self.reduced_cost = reduced_cost;
    }

    /// Returns `true` if both tours drive the same sequence on the same day.
    pub fn same_route(&self, other: &Tour) -> bool {
        self.day == other.day && self.customers == other.customers
    }
}

/// A column already present in the master problem, with its LP value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    /// The tour behind the column.
    pub tour: Tour,
    /// Value of the column in the current LP solution.
    pub lp_value: f64,
}

impl Column {
    /// Creates a column.
    pub fn new(tour: Tour, lp_value: f64) -> Self {
        Self { tour, lp_value }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tour_empty() {
        let t = Tour::new(0, vec![]);
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
        assert!(t.is_elementary());
    }

    #[test]
    fn test_tour_not_elementary() {
        let t = Tour::new(1, vec![3, 5, 3]);
        assert!(!t.is_elementary());
    }

    #[test]
    fn test_tour_builder_values() {
        let t = Tour::new(1, vec![2, 3])
            .with_objective(12.5)
            .with_capacity(30)
            .with_reduced_cost(-4.0);
        assert_eq!(t.objective(), 12.5);
        assert_eq!(t.capacity(), 30);
        assert_eq!(t.reduced_cost(), -4.0);
    }

    #[test]
    fn test_same_route() {
        let a = Tour::new(1, vec![2, 3]).with_reduced_cost(-1.0);
        let b = Tour::new(1, vec![2, 3]).with_reduced_cost(-2.0);
        let c = Tour::new(0, vec![2, 3]);
        assert!(a.same_route(&b));
        assert!(!a.same_route(&c));
    }

    #[test]
    fn test_tour_serializes() {
        let t = Tour::new(1, vec![2, 3]).with_objective(7.0);
        let json = serde_json::to_string(&t).expect("serialize");
        assert!(json.contains("\"customers\":[2,3]"));
    }
}
