//! Local-search pricing: improving existing master columns.
//!
//! # Algorithm
//!
//! Columns with a positive LP value are taken in descending LP order. Each
//! one is copied and edited by three operators in turn:
//!
//! 1. `extend`: insert unused customers with a positive
//!    dual at their cheapest feasible position.
//! 2. `shift`: replace a customer by an unused one with a
//!    larger net dual.
//! 3. `decrease`: drop customers whose dual doesn't pay
//!    for their detour (only when travel is priced).
//!
//! An edited column whose reduced cost is negative becomes a new tour.
//!
//! # Complexity
//!
//! O(n² × L) feasibility checks per column, n = customers on the day,
//! L = tour length.

use super::{decrease, extend, shift};
use crate::evaluation::TourEvaluator;
use crate::models::{Column, Instance, Tour};
use crate::pricing::{PricingConfig, PricingContext};
use tracing::{debug, trace};

/// Tour being edited by the operators.
pub(crate) struct WorkingColumn<'c> {
    pub(crate) ctx: &'c PricingContext<'c>,
    evaluator: TourEvaluator<'c>,
    pub(crate) day: usize,
    pub(crate) customers: Vec<usize>,
    pub(crate) in_tour: Vec<bool>,
    pub(crate) load: i32,
    pub(crate) epsilon: f64,
}

impl<'c> WorkingColumn<'c> {
    fn new(ctx: &'c PricingContext<'c>, tour: &Tour, epsilon: f64) -> Self {
        let instance = ctx.instance();
        let mut in_tour = vec![false; instance.num_locations()];
        for &c in tour.customers() {
            in_tour[c] = true;
        }
        Self {
            ctx,
            evaluator: TourEvaluator::new(instance).with_branching(ctx.branching()),
            day: tour.day(),
            customers: tour.customers().to_vec(),
            in_tour,
            load: tour.customers().iter().map(|&c| instance.demand(c)).sum(),
            epsilon,
        }
    }

    pub(crate) fn instance(&self) -> &'c Instance {
        self.ctx.instance()
    }

    /// Customers available on the column's day.
    pub(crate) fn candidates(&self) -> &'c [usize] {
        self.ctx.graph(self.day).customers()
    }

    pub(crate) fn is_feasible(&self) -> bool {
        self.is_feasible_sequence(&self.customers)
    }

    /// Feasibility of an edited copy of the column on its day.
    pub(crate) fn is_feasible_sequence(&self, customers: &[usize]) -> bool {
        self.evaluator.is_feasible(self.day, customers)
    }

    pub(crate) fn dual(&self, customer: usize) -> f64 {
        self.ctx.duals().customer(customer)
    }

    pub(crate) fn demand(&self, customer: usize) -> i32 {
        self.ctx.instance().demand(customer)
    }

    pub(crate) fn capacity(&self) -> i32 {
        self.ctx.instance().day(self.day).capacity()
    }

    /// `true` when travel time counts towards the reduced cost.
    pub(crate) fn prices_travel(&self) -> bool {
        self.ctx.prices().prices_travel()
    }

    /// Weight of travel in the reduced cost (0 or 1).
    pub(crate) fn travel_weight(&self) -> f64 {
        self.ctx.prices().travel_weight()
    }

    pub(crate) fn is_forbidden(&self, from: usize, to: usize) -> bool {
        self.ctx.branching().is_forbidden(from, to)
    }

    /// `true` if `customer` must be served on the column's day.
    pub(crate) fn is_enforced_here(&self, customer: usize) -> bool {
        self.ctx.enforced_day(customer) == Some(self.day)
    }
}

/// Edits one column and returns the result if it improved into a tour with
/// negative reduced cost.
///
/// Columns on fixed days, columns visiting customers no longer available on
/// their day, and columns violating the current branching decisions are
/// left alone.
pub fn investigate_column(ctx: &PricingContext<'_>, tour: &Tour, epsilon: f64) -> Option<Tour> {
    let day = tour.day();
    if ctx.branching().is_day_fixed(day) {
        return None;
    }
    let graph = ctx.graph(day);
    if tour.customers().iter().any(|&c| !graph.is_available(c)) {
        return None;
    }
    let mut col = WorkingColumn::new(ctx, tour, epsilon);
    if !col.is_feasible() {
        return None;
    }

    let mut improved = extend::extend_column(&mut col);
    improved |= shift::shift_column(&mut col);
    if col.prices_travel() {
        improved |= decrease::decrease_column(&mut col);
    }
    if !improved || col.customers.is_empty() {
        return None;
    }

    let reduced_cost = ctx.tour_reduced_cost(day, &col.customers);
    if reduced_cost >= -epsilon {
        return None;
    }
    let (tour, _) = col.evaluator.build_tour(day, &col.customers);
    Some(tour.with_reduced_cost(reduced_cost))
}

/// Runs the local search over the given master columns.
///
/// Only columns with LP value in `(ε, 1 + ε]` that visit no customer twice
/// are edited. Stops after `config.max_local_search_tours` distinct tours.
///
/// # Examples
///
/// ```
/// use u_pricing::distance::DistanceMatrix;
/// use u_pricing::local_search::local_search_pricing;
/// use u_pricing::models::{Column, Customer, Day, Instance, TimeWindow, Tour};
/// use u_pricing::pricing::{
///     BranchingState, DualValues, Objective, PricingConfig, PricingContext, PricingMode,
/// };
///
/// let tw = TimeWindow::new(0.0, 100.0).unwrap();
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 1.0, 0.0, 1, 0.0).with_window(0, tw),
///     Customer::new(2, 2.0, 0.0, 1, 0.0).with_window(0, tw),
/// ];
/// let travel = DistanceMatrix::from_customers(&customers);
/// let day = Day::new(0, 10, 100.0).with_vehicles(2);
/// let instance = Instance::new(customers, vec![day], travel, 2).unwrap();
/// let branching = BranchingState::root(&instance);
/// let duals = DualValues::new(vec![0.0, 3.0, 3.0], vec![0.0]);
/// let ctx = PricingContext::new(
///     &instance, &branching, &duals, &[], PricingMode::ReducedCost, Objective::MinTravel,
/// ).unwrap();
///
/// let columns = vec![Column::new(Tour::new(0, vec![1]), 0.5)];
/// let tours = local_search_pricing(&ctx, &columns, &PricingConfig::default());
/// assert_eq!(tours.len(), 1);
/// assert_eq!(tours[0].len(), 2);
/// assert!(tours[0].reduced_cost() < 0.0);
/// ```
#[tracing::instrument(skip_all, fields(columns = columns.len()))]
pub fn local_search_pricing(
    ctx: &PricingContext<'_>,
    columns: &[Column],
    config: &PricingConfig,
) -> Vec<Tour> {
    let eps = config.epsilon;
    let mut candidates: Vec<&Column> = columns
        .iter()
        .filter(|c| c.lp_value > eps && c.lp_value <= 1.0 + eps && c.tour.is_elementary())
        .collect();
    candidates.sort_by(|a, b| b.lp_value.total_cmp(&a.lp_value));

    let mut found: Vec<Tour> = Vec::new();
    for column in &candidates {
        if found.len() >= config.max_local_search_tours {
            break;
        }
        let Some(tour) = investigate_column(ctx, &column.tour, eps) else {
            continue;
        };
        if found.iter().any(|t| t.same_route(&tour)) {
            trace!(day = tour.day(), "duplicate local search tour");
            continue;
        }
        found.push(tour);
    }
    debug!(candidates = candidates.len(), found = found.len(), "local search finished");
    found
}
