//! Tour evaluator that computes travel, load and feasibility on a day.

use crate::models::{Instance, Tour, Violation, ViolationType};
use crate::pricing::BranchingState;

/// Slack allowed on time-window and horizon checks of complete tours.
pub const FEASIBILITY_TOLERANCE: f64 = 1e-5;

/// Evaluates customer sequences on a scheduling day: travel objective,
/// consumed capacity, and the capacity, availability, time-window and
/// horizon constraints. With a branching state attached, forbidden arcs are
/// checked as well.
///
/// The vehicle leaves the depot at the day's start; service at a customer
/// starts at `max(arrival, ready)`.
///
/// # Examples
///
/// ```
/// use u_pricing::models::{Customer, Day, Instance, TimeWindow};
/// use u_pricing::distance::DistanceMatrix;
/// use u_pricing::evaluation::TourEvaluator;
///
/// let tw = TimeWindow::new(0.0, 100.0).unwrap();
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 3.0, 4.0, 10, 5.0).with_window(0, tw),
///     Customer::new(2, 6.0, 8.0, 20, 5.0).with_window(0, tw),
/// ];
/// let travel = DistanceMatrix::from_customers(&customers);
/// let instance = Instance::new(customers, vec![Day::new(0, 100, 200.0)], travel, 4).unwrap();
///
/// let evaluator = TourEvaluator::new(&instance);
/// let (tour, violations) = evaluator.build_tour(0, &[1, 2]);
/// assert!(violations.is_empty());
/// assert!((tour.objective() - 20.0).abs() < 1e-10);
/// assert_eq!(tour.capacity(), 30);
/// ```
pub struct TourEvaluator<'a> {
    instance: &'a Instance,
    branching: Option<&'a BranchingState>,
}

impl<'a> TourEvaluator<'a> {
    /// Creates an evaluator for the given instance.
    pub fn new(instance: &'a Instance) -> Self {
        Self {
            instance,
            branching: None,
        }
    }

    /// Also checks the arcs forbidden by `branching`.
    pub fn with_branching(mut self, branching: &'a BranchingState) -> Self {
        self.branching = Some(branching);
        self
    }

    /// Travel time of the closed tour `depot → customers → depot`.
    pub fn objective(&self, customers: &[usize]) -> f64 {
        let mut total = 0.0;
        let mut prev = 0;
        for &c in customers {
            total += self.instance.travel(prev, c);
            prev = c;
        }
        if !customers.is_empty() {
            total += self.instance.travel(prev, 0);
        }
        total
    }

    /// Total demand of the customers.
    pub fn load(&self, customers: &[usize]) -> i32 {
        customers.iter().map(|&c| self.instance.demand(c)).sum()
    }

    /// Returns `true` if the sequence can be driven on `day`.
    pub fn is_feasible(&self, day: usize, customers: &[usize]) -> bool {
        let d = self.instance.day(day);
        if self.load(customers) > d.capacity() {
            return false;
        }
        let mut time = d.start();
        let mut prev = 0;
        for &c in customers {
            if self.is_forbidden(prev, c) {
                return false;
            }
            let Some(tw) = self.instance.customers()[c].window(day) else {
                return false;
            };
            let arrival = time + self.instance.travel(prev, c);
            if arrival > tw.due() + FEASIBILITY_TOLERANCE {
                return false;
            }
            time = tw.service_start(arrival) + self.instance.service(c);
            prev = c;
        }
        if customers.is_empty() {
            return true;
        }
        !self.is_forbidden(prev, 0)
            && time + self.instance.travel(prev, 0) <= d.horizon() + FEASIBILITY_TOLERANCE
    }

    /// Builds a tour on `day` with objective and capacity filled in, and
    /// lists every constraint it violates.
    pub fn build_tour(&self, day: usize, customers: &[usize]) -> (Tour, Vec<Violation>) {
        let d = self.instance.day(day);
        let mut violations = Vec::new();
        let mut time = d.start();
        let mut prev = 0;

        for &c in customers {
            if self.is_forbidden(prev, c) {
                violations.push(Violation::new(ViolationType::ForbiddenArc { from: prev, to: c }));
            }
            let arrival = time + self.instance.travel(prev, c);
            let service_start = match self.instance.customers()[c].window(day) {
                Some(tw) => {
                    if arrival > tw.due() + FEASIBILITY_TOLERANCE {
                        violations.push(Violation::new(ViolationType::TimeWindowViolated {
                            customer_id: c,
                            arrival,
                            due: tw.due(),
                        }));
                    }
                    tw.service_start(arrival)
                }
                None => {
                    violations.push(Violation::new(ViolationType::Unavailable {
                        customer_id: c,
                        day,
                    }));
                    arrival
                }
            };
            time = service_start + self.instance.service(c);
            prev = c;
        }

        if !customers.is_empty() {
            if self.is_forbidden(prev, 0) {
                violations.push(Violation::new(ViolationType::ForbiddenArc { from: prev, to: 0 }));
            }
            let back = time + self.instance.travel(prev, 0);
            if back > d.horizon() + FEASIBILITY_TOLERANCE {
                violations.push(Violation::new(ViolationType::LateReturn {
                    arrival: back,
                    horizon: d.horizon(),
                }));
            }
        }

        let load = self.load(customers);
        if load > d.capacity() {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                load,
                capacity: d.capacity(),
            }));
        }

        let tour = Tour::new(day, customers.to_vec())
            .with_objective(self.objective(customers))
            .with_capacity(load);
        (tour, violations)
    }

    fn is_forbidden(&self, from: usize, to: usize) -> bool {
        self.branching.is_some_and(|b| b.is_forbidden(from, to))
    }
}
