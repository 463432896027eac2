//! Periodic routing instance seen by the pricing problem.

use super::{Customer, Day};
use crate::bitset::{CustomerSet, SET_WIDTH};
use crate::distance::DistanceMatrix;
use crate::error::PricingError;

/// Locations, scheduling days, travel times and ng-neighbourhoods.
///
/// Location 0 is the depot; locations `1..n` are customers. The travel
/// matrix is indexed by location. Each customer's ng-neighbourhood holds its
/// `ng_size` nearest customers by travel time (itself and the depot
/// excluded).
///
/// # Examples
///
/// ```
/// use u_pricing::models::{Customer, Day, Instance, TimeWindow};
/// use u_pricing::distance::DistanceMatrix;
///
/// let tw = TimeWindow::new(0.0, 100.0).unwrap();
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 3.0, 4.0, 10, 5.0).with_window(0, tw),
///     Customer::new(2, 6.0, 8.0, 20, 5.0).with_window(0, tw),
/// ];
/// let travel = DistanceMatrix::from_customers(&customers);
/// let instance = Instance::new(customers, vec![Day::new(0, 50, 100.0)], travel, 8).unwrap();
/// assert_eq!(instance.num_customers(), 2);
/// assert!(instance.ng_set(1).contains(2));
/// ```
#[derive(Debug, Clone)]
pub struct Instance {
    customers: Vec<Customer>,
    days: Vec<Day>,
    travel: DistanceMatrix,
    ng_sets: Vec<CustomerSet>,
}

impl Instance {
    /// Builds an instance and derives the ng-neighbourhoods.
    ///
    /// Fails if the instance is empty, has more than
    /// [`SET_WIDTH`] locations, location or day ids don't match their index, or the
    /// travel matrix size differs from the number of locations.
    pub fn new(
        customers: Vec<Customer>,
        days: Vec<Day>,
        travel: DistanceMatrix,
        ng_size: usize,
    ) -> Result<Self, PricingError> {
        if customers.is_empty() {
            return Err(PricingError::EmptyInstance);
        }
        if customers.len() > SET_WIDTH {
            return Err(PricingError::TooManyLocations {
                locations: customers.len(),
            });
        }
        if travel.size() != customers.len() {
            return Err(PricingError::DimensionMismatch {
                what: "travel matrix",
                expected: customers.len(),
                actual: travel.size(),
            });
        }
        if let Some((index, c)) = customers.iter().enumerate().find(|(i, c)| c.id() != *i) {
            return Err(PricingError::LocationIdMismatch { index, id: c.id() });
        }
        if let Some((index, d)) = days.iter().enumerate().find(|(i, d)| d.id() != *i) {
            return Err(PricingError::DayIdMismatch { index, id: d.id() });
        }
        let ng_sets = nearest_neighbourhoods(&travel, ng_size);
        Ok(Self {
            customers,
            days,
            travel,
            ng_sets,
        })
    }

    /// Replaces the derived ng-neighbourhoods.
    pub fn with_ng_sets(mut self, ng_sets: Vec<CustomerSet>) -> Result<Self, PricingError> {
        if ng_sets.len() != self.customers.len() {
            return Err(PricingError::DimensionMismatch {
                what: "ng-neighbourhoods",
                expected: self.customers.len(),
                actual: ng_sets.len(),
            });
        }
        self.ng_sets = ng_sets;
        Ok(self)
    }

    /// All locations (index 0 = depot).
    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    /// Number of locations, depot included.
    pub fn num_locations(&self) -> usize {
        self.customers.len()
    }

    /// Number of customers (depot excluded).
    pub fn num_customers(&self) -> usize {
        self.customers.len() - 1
    }

    /// Scheduling days.
    pub fn days(&self) -> &[Day] {
        &self.days
    }

    /// Number of scheduling days.
    pub fn num_days(&self) -> usize {
        self.days.len()
    }

    /// Day `day`.
    pub fn day(&self, day: usize) -> &Day {
        &self.days[day]
    }

    /// Travel-time matrix.
    pub fn travel_matrix(&self) -> &DistanceMatrix {
        &self.travel
    }

    /// Travel time from `from` to `to`.
    pub fn travel(&self, from: usize, to: usize) -> f64 {
        self.travel.get(from, to)
    }

    /// Demand of location `i`.
    pub fn demand(&self, i: usize) -> i32 {
        self.customers[i].demand()
    }

    /// Service duration of location `i`.
    pub fn service(&self, i: usize) -> f64 {
        self.customers[i].service_duration()
    }

    /// ng-neighbourhood of location `i`.
    pub fn ng_set(&self, i: usize) -> &CustomerSet {
        &self.ng_sets[i]
    }

    /// All ng-neighbourhoods, indexed by location.
    pub fn ng_sets(&self) -> &[CustomerSet] {
        &self.ng_sets
    }

    /// Returns `true` if customer `u` can be served directly before
    /// customer `v` on `day`, judged by the earliest possible service start
    /// at `u` and the time windows. The depot is always available.
    pub fn is_reachable(&self, day: usize, u: usize, v: usize) -> bool {
        if u == v {
            return false;
        }
        let d = &self.days[day];
        let (ready_u, service_u) = if u == 0 {
            (d.start(), 0.0)
        } else {
            match self.customers[u].window(day) {
                Some(tw) => (
                    tw.service_start(d.start() + self.travel(0, u)),
                    self.service(u),
                ),
                None => return false,
            }
        };
        let arrival = ready_u + service_u + self.travel(u, v);
        if v == 0 {
            return arrival <= d.horizon();
        }
        match self.customers[v].window(day) {
            Some(tw) => !tw.is_violated(arrival),
            None => false,
        }
    }
}

/// Nearest `ng_size` customers of every customer by travel time.
fn nearest_neighbourhoods(travel: &DistanceMatrix, ng_size: usize) -> Vec<CustomerSet> {
    let n = travel.size();
    let mut sets = vec![CustomerSet::EMPTY; n];
    for (i, set) in sets.iter_mut().enumerate().skip(1) {
        let row = travel.row(i);
        let mut others: Vec<usize> = (1..n).filter(|&j| j != i).collect();
        others.sort_by(|&a, &b| row[a].total_cmp(&row[b]));
        *set = others.into_iter().take(ng_size).collect();
    }
    sets
}
