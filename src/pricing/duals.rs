//! Dual prices of the master problem and the derived arc-price table.

use crate::distance::Matrix;
use crate::error::PricingError;
use crate::models::Instance;
use serde::{Deserialize, Serialize};

/// Whether the master LP was feasible (reduced-cost pricing) or infeasible
/// (Farkas pricing, travel cost not priced).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingMode {
    /// Regular reduced-cost pricing.
    ReducedCost,
    /// Farkas pricing against an infeasible restricted master.
    Farkas,
}

/// Objective of the master problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Objective {
    /// Minimise total travel time; a column costs its travel time.
    MinTravel,
    /// Minimise the number of vehicles; every column costs 1.
    MinVehicles,
}

/// Dual values of the master constraints.
///
/// `customers[0]` belongs to the depot and is forced to zero.
///
/// # Examples
///
/// ```
/// use u_pricing::pricing::DualValues;
///
/// let duals = DualValues::new(vec![0.0, 12.0, 7.5], vec![-3.0]).with_vehicle_count(-1.0);
/// assert_eq!(duals.customer(1), 12.0);
/// assert_eq!(duals.day(0), -3.0);
/// assert_eq!(duals.vehicle_count(), -1.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DualValues {
    customers: Vec<f64>,
    days: Vec<f64>,
    vehicle_count: f64,
}

impl DualValues {
    /// Creates duals for customer-covering rows and per-day vehicle rows.
    pub fn new(mut customers: Vec<f64>, days: Vec<f64>) -> Self {
        if let Some(depot) = customers.first_mut() {
            *depot = 0.0;
        }
        Self {
            customers,
            days,
            vehicle_count: 0.0,
        }
    }

    /// Sets the dual of the vehicle-count branching row.
    pub fn with_vehicle_count(mut self, dual: f64) -> Self {
        self.vehicle_count = dual;
        self
    }

    /// Dual of the covering row of customer `i` (0 for the depot).
    pub fn customer(&self, i: usize) -> f64 {
        self.customers[i]
    }

    /// Dual of the vehicle row of `day`.
    pub fn day(&self, day: usize) -> f64 {
        self.days[day]
    }

    /// Dual of the vehicle-count row.
    pub fn vehicle_count(&self) -> f64 {
        self.vehicle_count
    }

    /// Checks the vector lengths against the instance.
    pub fn check(&self, instance: &Instance) -> Result<(), PricingError> {
        if self.customers.len() != instance.num_locations() {
            return Err(PricingError::DimensionMismatch {
                what: "customer duals",
                expected: instance.num_locations(),
                actual: self.customers.len(),
            });
        }
        if self.days.len() != instance.num_days() {
            return Err(PricingError::DimensionMismatch {
                what: "day duals",
                expected: instance.num_days(),
                actual: self.days.len(),
            });
        }
        Ok(())
    }
}

/// Arc prices of one pricing round: `price(i, j) = w * travel(i, j) - dual(j)`.
///
/// `w` is 1 when travel is priced (reduced-cost pricing of the travel
/// objective) and 0 otherwise. The column offset is the constant cost of a
/// column that is not attributable to arcs.
#[derive(Debug, Clone)]
pub struct PriceTable {
    arcs: Matrix<f64>,
    travel_weight: f64,
    column_offset: f64,
}

impl PriceTable {
    /// Builds the table from the duals.
    pub fn new(
        instance: &Instance,
        duals: &DualValues,
        mode: PricingMode,
        objective: Objective,
    ) -> Self {
        let prices_travel = mode == PricingMode::ReducedCost && objective == Objective::MinTravel;
        let travel_weight = if prices_travel { 1.0 } else { 0.0 };
        let column_offset =
            if mode == PricingMode::ReducedCost && objective == Objective::MinVehicles {
                1.0
            } else {
                0.0
            };
        let n = instance.num_locations();
        let mut arcs = Matrix::filled(n, 0.0);
        for i in 0..n {
            for j in 0..n {
                if i != j {
                    arcs.set(i, j, travel_weight * instance.travel(i, j) - duals.customer(j));
                }
            }
        }
        Self {
            arcs,
            travel_weight,
            column_offset,
        }
    }

    /// Price of the arc `i → j`.
    pub fn arc(&self, i: usize, j: usize) -> f64 {
        self.arcs.get(i, j)
    }

    /// Folds the dual of a robust (arc-based) cut into an arc price.
    pub fn adjust_arc(&mut self, i: usize, j: usize, delta: f64) {
        self.arcs.set(i, j, self.arcs.get(i, j) + delta);
    }

    /// `true` when travel time contributes to reduced costs.
    pub fn prices_travel(&self) -> bool {
        self.travel_weight > 0.0
    }

    /// Weight of travel time in the arc prices (0 or 1).
    pub fn travel_weight(&self) -> f64 {
        self.travel_weight
    }

    /// Constant reduced-cost term of every column.
    pub fn column_offset(&self) -> f64 {
        self.column_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::models::{Customer, Day};

    fn instance() -> Instance {
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 3.0, 4.0, 1, 0.0),
            Customer::new(2, 6.0, 8.0, 1, 0.0),
        ];
        let travel = DistanceMatrix::from_customers(&customers);
        Instance::new(customers, vec![Day::new(0, 10, 100.0)], travel, 2).expect("valid")
    }

    #[test]
    fn test_depot_dual_forced_to_zero() {
        let duals = DualValues::new(vec![9.0, 1.0, 2.0], vec![0.0]);
        assert_eq!(duals.customer(0), 0.0);
    }

    #[test]
    fn test_prices_reduced_cost_travel() {
        let inst = instance();
        let duals = DualValues::new(vec![0.0, 4.0, 6.0], vec![0.0]);
        let p = PriceTable::new(&inst, &duals, PricingMode::ReducedCost, Objective::MinTravel);
        assert!(p.prices_travel());
        assert!((p.arc(0, 1) - (5.0 - 4.0)).abs() < 1e-10);
        assert!((p.arc(1, 2) - (5.0 - 6.0)).abs() < 1e-10);
        assert!((p.arc(2, 0) - 10.0).abs() < 1e-10);
        assert_eq!(p.column_offset(), 0.0);
    }

    #[test]
    fn test_prices_farkas_and_vehicles() {
        let inst = instance();
        let duals = DualValues::new(vec![0.0, 4.0, 6.0], vec![0.0]);
        let f = PriceTable::new(&inst, &duals, PricingMode::Farkas, Objective::MinTravel);
        assert!(!f.prices_travel());
        assert_eq!(f.arc(0, 1), -4.0);
        let v = PriceTable::new(&inst, &duals, PricingMode::ReducedCost, Objective::MinVehicles);
        assert_eq!(v.column_offset(), 1.0);
        assert_eq!(v.arc(1, 2), -6.0);
    }

    #[test]
    fn test_adjust_arc() {
        let inst = instance();
        let duals = DualValues::new(vec![0.0, 0.0, 0.0], vec![0.0]);
        let mut p = PriceTable::new(&inst, &duals, PricingMode::Farkas, Objective::MinTravel);
        p.adjust_arc(1, 2, -2.5);
        assert_eq!(p.arc(1, 2), -2.5);
        assert_eq!(p.arc(2, 1), 0.0);
    }

    #[test]
    fn test_check_lengths() {
        let inst = instance();
        assert!(DualValues::new(vec![0.0, 1.0, 1.0], vec![0.0]).check(&inst).is_ok());
        assert!(DualValues::new(vec![0.0, 1.0], vec![0.0]).check(&inst).is_err());
        assert!(DualValues::new(vec![0.0, 1.0, 1.0], vec![]).check(&inst).is_err());
    }
}
