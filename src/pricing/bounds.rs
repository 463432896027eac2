//! Reduced-cost bounds collected over all days of a bounds round.

use crate::distance::Matrix;
use crate::labeling::DayBounds;
use serde::{Deserialize, Serialize};

/// Lower bounds on the reduced cost of any tour, per arc, per
/// (customer, day) assignment and per day.
///
/// Entries nobody could reach stay infinite; so do all entries of days that
/// were not priced.
///
/// # Examples
///
/// ```
/// use u_pricing::pricing::ReducedCostBounds;
///
/// let bounds = ReducedCostBounds::new(4, 2);
/// assert!(bounds.arc(1, 2).is_infinite());
/// assert!(bounds.best().is_infinite());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReducedCostBounds {
    arcs: Matrix<f64>,
    customer_day: Vec<Vec<f64>>,
    days: Vec<f64>,
}

impl ReducedCostBounds {
    /// Empty bounds for `locations` locations and `days` days.
    pub fn new(locations: usize, days: usize) -> Self {
        Self {
            arcs: Matrix::filled(locations, f64::INFINITY),
            customer_day: vec![vec![f64::INFINITY; days]; locations],
            days: vec![f64::INFINITY; days],
        }
    }

    /// Folds the bounds of one day in. Arc bounds are minima over days.
    pub fn merge(&mut self, day: &DayBounds) {
        self.arcs.min_assign(day.arcs());
        for (i, row) in self.customer_day.iter_mut().enumerate() {
            row[day.day()] = day.customer(i);
        }
        self.days[day.day()] = day.best();
    }

    /// Bound for tours using arc `(i, j)` on any day.
    pub fn arc(&self, i: usize, j: usize) -> f64 {
        self.arcs.get(i, j)
    }

    /// Bound for tours on `day` whose forward half ends at `customer`.
    pub fn customer_day(&self, customer: usize, day: usize) -> f64 {
        self.customer_day[customer][day]
    }

    /// Bound for any tour on `day`.
    pub fn day(&self, day: usize) -> f64 {
        self.days[day]
    }

    /// Bound for any tour on any day.
    pub fn best(&self) -> f64 {
        self.days.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::labeling::{day_bounds, DayScope, LabelingEngine};
    use crate::models::{Customer, Day, Instance, TimeWindow};
    use crate::pricing::{
        BranchingState, DualValues, Objective, PricingConfig, PricingContext, PricingMode,
    };

    #[test]
    fn test_merge_takes_arc_minimum_over_days() {
        let tw = TimeWindow::new(0.0, 100.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 4.0, 0.0, 1, 0.0).with_window(0, tw).with_window(1, tw),
            Customer::new(2, 0.0, 3.0, 1, 0.0).with_window(0, tw).with_window(1, tw),
        ];
        let travel = DistanceMatrix::from_customers(&customers);
        let days = vec![Day::new(0, 10, 100.0), Day::new(1, 10, 100.0)];
        let inst = Instance::new(customers, days, travel, 2).expect("valid");
        let branching = BranchingState::root(&inst);
        // day 1 is cheaper by its larger dual
        let duals = DualValues::new(vec![0.0, 10.0, 10.0], vec![1.0, 3.0]);
        let ctx = PricingContext::new(
            &inst,
            &branching,
            &duals,
            &[],
            PricingMode::ReducedCost,
            Objective::MinTravel,
        )
        .expect("valid");
        let config = PricingConfig::default();

        let mut bounds = ReducedCostBounds::new(3, 2);
        let mut per_day = Vec::new();
        for d in 0..2 {
            let scope = DayScope::new(&ctx, d, &config);
            let sets = LabelingEngine::new(scope, true, false).run();
            let day = day_bounds(&scope, &sets);
            bounds.merge(&day);
            per_day.push(day);
        }
        // best tour through 0 -> 1 on day 0 is 0 -> 1 -> 2 -> 0: 12 - 20 - 1
        assert!((per_day[0].arc(0, 1) - (-9.0)).abs() < 1e-9);
        assert!((bounds.arc(0, 1) - per_day[1].arc(0, 1)).abs() < 1e-12);
        assert!(bounds.day(1) < bounds.day(0));
        assert!((bounds.best() - bounds.day(1)).abs() < 1e-12);
        assert!((bounds.customer_day(1, 0) - per_day[0].customer(1)).abs() < 1e-12);
        for i in 0..3 {
            for j in 0..3 {
                assert_eq!(bounds.arc(i, j), per_day[0].arc(i, j).min(per_day[1].arc(i, j)));
            }
        }
    }
}
