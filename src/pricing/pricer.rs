//! Pricing round driver.
//!
//! A round first tries the local-search heuristic on the current master
//! columns. If that finds nothing, every non-fixed day is labeled
//! independently (in parallel with rayon unless disabled), the settled
//! labels are joined into tours, and the tours of all days are merged.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::bounds::ReducedCostBounds;
use super::config::{NgMode, PricingConfig};
use super::context::PricingContext;
use super::dssr::NgOverrides;
use crate::bitset::CustomerSet;
use crate::error::PricingError;
use crate::labeling::{best_tours, day_bounds, DayScope, EngineStats, LabelSets, LabelingEngine};
use crate::local_search::local_search_pricing;
use crate::models::{Column, Tour};

/// How a round produced its tours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingMethod {
    /// Skipped by a probing context.
    Aborted,
    /// The local-search heuristic found improving tours.
    LocalSearch,
    /// Exact labeling ran on the non-fixed days.
    Labeling,
}

/// Result of one pricing round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingOutcome {
    /// Tours with negative reduced cost, ascending by reduced cost.
    pub tours: Vec<Tour>,
    pub method: PricingMethod,
    /// Label counters summed over all days.
    pub stats: EngineStats,
    /// Tours discarded for containing an ng-cycle (decremental mode only).
    pub ng_cycles: usize,
}

impl PricingOutcome {
    fn empty(method: PricingMethod) -> Self {
        Self {
            tours: Vec::new(),
            method,
            stats: EngineStats::default(),
            ng_cycles: 0,
        }
    }

    /// Most negative reduced cost found, if any.
    pub fn best_reduced_cost(&self) -> Option<f64> {
        self.tours.first().map(Tour::reduced_cost)
    }
}

/// Output of one day task.
struct DayTask<T> {
    found: Vec<T>,
    stats: EngineStats,
}

/// Runs pricing rounds and keeps the decremental ng filters between them.
///
/// # Examples
///
/// ```
/// use u_pricing::distance::DistanceMatrix;
/// use u_pricing::models::{Customer, Day, Instance, TimeWindow};
/// use u_pricing::pricing::{
///     BranchingState, DualValues, Objective, Pricer, PricingConfig, PricingContext,
///     PricingMethod, PricingMode,
/// };
///
/// let tw = TimeWindow::new(0.0, 100.0).unwrap();
/// let customers = vec![
///     Customer::depot(0.0, 0.0),
///     Customer::new(1, 3.0, 4.0, 1, 0.0).with_window(0, tw),
///     Customer::new(2, 6.0, 8.0, 1, 0.0).with_window(0, tw),
/// ];
/// let travel = DistanceMatrix::from_customers(&customers);
/// let day = Day::new(0, 10, 100.0).with_vehicles(2);
/// let instance = Instance::new(customers, vec![day], travel, 2).unwrap();
/// let branching = BranchingState::root(&instance);
/// let duals = DualValues::new(vec![0.0, 15.0, 15.0], vec![0.0]);
/// let ctx = PricingContext::new(
///     &instance, &branching, &duals, &[], PricingMode::ReducedCost, Objective::MinTravel,
/// ).unwrap();
///
/// let mut pricer = Pricer::new(PricingConfig::default()).unwrap();
/// let outcome = pricer.price(&ctx, &[]);
/// assert_eq!(outcome.method, PricingMethod::Labeling);
/// // 0 -> 1 -> 2 -> 0 costs 20 and collects 30
/// assert!((outcome.best_reduced_cost().unwrap() + 10.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone)]
pub struct Pricer {
    config: PricingConfig,
    overrides: NgOverrides,
}

impl Pricer {
    /// Creates a pricer after validating `config`.
    pub fn new(config: PricingConfig) -> Result<Self, PricingError> {
        config.validate()?;
        Ok(Self {
            config,
            overrides: NgOverrides::new(0),
        })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Decremental ng filters grown so far.
    pub fn ng_overrides(&self) -> &NgOverrides {
        &self.overrides
    }

    /// Replaces the decremental ng filters, e.g. to restore them at another
    /// node of the search tree.
    pub fn set_ng_overrides(&mut self, overrides: NgOverrides) {
        self.overrides = overrides;
    }

    /// Runs one pricing round.
    ///
    /// `columns` are the master columns with their LP values; they seed the
    /// local-search heuristic, which is skipped while cuts are active or a
    /// probing context is present.
    #[tracing::instrument(level = "debug", skip_all, fields(mode = ?ctx.mode()))]
    pub fn price(&mut self, ctx: &PricingContext<'_>, columns: &[Column]) -> PricingOutcome {
        let eps = self.config.epsilon;
        if ctx.probing().is_some_and(|p| p.aborts(eps)) {
            info!("probing bound reached, pricing skipped");
            return PricingOutcome::empty(PricingMethod::Aborted);
        }

        if self.config.local_search_first && ctx.cuts().is_empty() && ctx.probing().is_none() {
            let mut tours = local_search_pricing(ctx, columns, &self.config);
            if !tours.is_empty() {
                tours.sort_by(|a, b| a.reduced_cost().total_cmp(&b.reduced_cost()));
                info!(tours = tours.len(), "local search pricing succeeded");
                return PricingOutcome {
                    tours,
                    ..PricingOutcome::empty(PricingMethod::LocalSearch)
                };
            }
        }

        self.prepare_overrides(ctx);
        let halfway = self.config.halfway_pruning;
        let results = self.run_days(ctx, halfway, |scope, sets| {
            let mut tours =
                best_tours(scope, sets, self.config.max_pairs, self.config.max_tours);
            if let Some(probing) = ctx.probing() {
                tours.retain(|t| !probing.excludes(t, eps));
            }
            tours
        });

        let limit = self.config.columns_per_day(ctx.instance().num_customers());
        let ng_sets = ctx.instance().ng_sets();
        let mut outcome = PricingOutcome::empty(PricingMethod::Labeling);
        for result in results {
            outcome.stats.absorb(&result.stats);
            let mut kept = 0;
            for tour in result.found {
                if kept >= limit {
                    break;
                }
                if self.config.ng_mode == NgMode::Decremental
                    && self.overrides.tighten(ng_sets, tour.customers())
                {
                    outcome.ng_cycles += 1;
                    continue;
                }
                outcome.tours.push(tour);
                kept += 1;
            }
        }
        outcome
            .tours
            .sort_by(|a, b| a.reduced_cost().total_cmp(&b.reduced_cost()));

        info!(
            tours = outcome.tours.len(),
            best = outcome.best_reduced_cost().unwrap_or(0.0),
            ng_cycles = outcome.ng_cycles,
            labels = outcome.stats.created,
            "labeling pricing finished"
        );
        outcome
    }

    /// Computes lower bounds on the reduced cost of every tour.
    ///
    /// Labels are expanded up to the horizon regardless of
    /// `halfway_pruning`; fixed days keep infinite bounds.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn reduced_cost_bounds(&mut self, ctx: &PricingContext<'_>) -> ReducedCostBounds {
        self.prepare_overrides(ctx);
        let instance = ctx.instance();
        let mut bounds = ReducedCostBounds::new(instance.num_locations(), instance.num_days());
        let results = self.run_days(ctx, false, |scope, sets| vec![day_bounds(scope, sets)]);
        for day in results.iter().flat_map(|r| &r.found) {
            bounds.merge(day);
        }
        info!(best = bounds.best(), "reduced-cost bounds computed");
        bounds
    }

    fn prepare_overrides(&mut self, ctx: &PricingContext<'_>) {
        let n = ctx.instance().num_locations();
        if self.overrides.len() != n {
            self.overrides = NgOverrides::new(n);
        }
    }

    /// Labels every non-fixed day and hands the settled labels to `join`.
    fn run_days<T, F>(&self, ctx: &PricingContext<'_>, halfway: bool, join: F) -> Vec<DayTask<T>>
    where
        T: Send,
        F: Fn(&DayScope<'_>, &LabelSets) -> Vec<T> + Sync,
    {
        let filter: Option<&[CustomerSet]> = match self.config.ng_mode {
            NgMode::Static => None,
            NgMode::Decremental => Some(self.overrides.sets()),
        };
        let days: Vec<usize> = (0..ctx.instance().num_days())
            .filter(|&d| !ctx.branching().is_day_fixed(d))
            .collect();
        let task = |day: usize| {
            let mut scope = DayScope::new(ctx, day, &self.config);
            if let Some(sets) = filter {
                scope = scope.with_ng_filter(sets);
            }
            let dominance = self.config.dominance
                && !ctx.probing().is_some_and(|p| p.disables_dominance(day));
            let sets = LabelingEngine::new(scope, dominance, halfway).run();
            let found = join(&scope, &sets);
            debug!(day, found = found.len(), labels = sets.stats.created, "day priced");
            DayTask {
                found,
                stats: sets.stats,
            }
        };
        if self.config.parallel {
            days.into_par_iter().map(task).collect()
        } else {
            days.into_iter().map(task).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMatrix;
    use crate::evaluation::TourEvaluator;
    use crate::models::{Customer, Day, Instance, TimeWindow};
    use crate::pricing::{
        find_ng_cycle, BranchingState, DualValues, Objective, PricingMode, ProbingContext,
    };

    // customers on a circle of radius 10 around the depot
    fn circle(n: usize, days: usize) -> Instance {
        let tw = TimeWindow::new(0.0, 200.0).expect("valid");
        let mut customers = vec![Customer::depot(0.0, 0.0)];
        for i in 1..=n {
            let angle = i as f64 * std::f64::consts::TAU / n as f64;
            let mut c = Customer::new(i, 10.0 * angle.cos(), 10.0 * angle.sin(), 1, 1.0);
            for d in 0..days {
                c = c.with_window(d, tw);
            }
            customers.push(c);
        }
        let travel = DistanceMatrix::from_customers(&customers);
        let days = (0..days)
            .map(|d| Day::new(d, 4, 200.0).with_vehicles(3))
            .collect();
        Instance::new(customers, days, travel, 3).expect("valid")
    }

    fn context<'a>(
        inst: &'a Instance,
        branching: &'a BranchingState,
        duals: &'a DualValues,
    ) -> PricingContext<'a> {
        PricingContext::new(
            inst,
            branching,
            duals,
            &[],
            PricingMode::ReducedCost,
            Objective::MinTravel,
        )
        .expect("valid")
    }

    fn labeling_only() -> PricingConfig {
        PricingConfig::default()
            .with_local_search_first(false)
            .with_parallel(false)
    }

    #[test]
    fn test_rejects_invalid_config() {
        assert!(Pricer::new(PricingConfig::default().with_epsilon(0.0)).is_err());
    }

    #[test]
    fn test_labeling_tours_are_sorted_and_feasible() {
        let inst = circle(6, 2);
        let branching = BranchingState::root(&inst);
        let duals = DualValues::new(vec![16.0; 7], vec![0.0, 1.0]);
        let ctx = context(&inst, &branching, &duals);
        let mut pricer = Pricer::new(labeling_only()).expect("valid");
        let outcome = pricer.price(&ctx, &[]);

        assert_eq!(outcome.method, PricingMethod::Labeling);
        assert!(!outcome.tours.is_empty());
        assert!(outcome.stats.created > 4);
        let evaluator = TourEvaluator::new(&inst);
        for pair in outcome.tours.windows(2) {
            assert!(pair[0].reduced_cost() <= pair[1].reduced_cost());
        }
        let limit = pricer.config().columns_per_day(6);
        for day in 0..2 {
            assert!(outcome.tours.iter().filter(|t| t.day() == day).count() <= limit);
        }
        for tour in &outcome.tours {
            assert!(tour.reduced_cost() < 0.0);
            assert!(evaluator.is_feasible(tour.day(), tour.customers()));
            let rc = ctx.tour_reduced_cost(tour.day(), tour.customers());
            assert!((rc - tour.reduced_cost()).abs() < 1e-6);
        }
    }

    #[test]
    fn test_min_vehicles_tours_pay_unit_cost() {
        let inst = circle(6, 1);
        let branching = BranchingState::root(&inst);
        let duals = DualValues::new(vec![0.0, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8], vec![0.2])
            .with_vehicle_count(0.1);
        let ctx = PricingContext::new(
            &inst,
            &branching,
            &duals,
            &[],
            PricingMode::ReducedCost,
            Objective::MinVehicles,
        )
        .expect("valid");
        let mut pricer = Pricer::new(labeling_only()).expect("valid");
        let outcome = pricer.price(&ctx, &[]);

        assert_eq!(outcome.method, PricingMethod::Labeling);
        let best = outcome.tours.first().expect("negative tour");
        // four customers fit: the best pays 1 against duals 0.8 + 0.7 + 0.6 + 0.5
        assert!(best.reduced_cost() <= 1.0 - 2.6 - 0.3 + 1e-6);
        for tour in &outcome.tours {
            let rc = ctx.tour_reduced_cost(tour.day(), tour.customers());
            assert!((rc - tour.reduced_cost()).abs() < 1e-6);
            let collected: f64 = tour.customers().iter().map(|&c| duals.customer(c)).sum();
            assert!((tour.reduced_cost() - (1.0 - collected - 0.3)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let inst = circle(6, 3);
        let branching = BranchingState::root(&inst);
        let duals = DualValues::new(vec![16.0; 7], vec![0.0, 0.5, 1.0]);
        let ctx = context(&inst, &branching, &duals);
        let mut seq = Pricer::new(labeling_only()).expect("valid");
        let mut par = Pricer::new(labeling_only().with_parallel(true)).expect("valid");
        let a = seq.price(&ctx, &[]);
        let b = par.price(&ctx, &[]);
        assert_eq!(a.tours.len(), b.tours.len());
        assert_eq!(a.stats, b.stats);
        let best_a = a.best_reduced_cost().expect("found");
        let best_b = b.best_reduced_cost().expect("found");
        assert!((best_a - best_b).abs() < 1e-12);
    }

    #[test]
    fn test_fixed_day_is_skipped() {
        let inst = circle(4, 2);
        let mut branching = BranchingState::root(&inst);
        branching.fix_day(0);
        let duals = DualValues::new(vec![20.0; 5], vec![0.0, 0.0]);
        let ctx = context(&inst, &branching, &duals);
        let mut pricer = Pricer::new(labeling_only()).expect("valid");
        let outcome = pricer.price(&ctx, &[]);
        assert!(!outcome.tours.is_empty());
        assert!(outcome.tours.iter().all(|t| t.day() == 1));
        let bounds = pricer.reduced_cost_bounds(&ctx);
        assert!(bounds.day(0).is_infinite());
        assert!(bounds.day(1) < 0.0);
    }

    #[test]
    fn test_probing_abort() {
        let inst = circle(4, 1);
        let branching = BranchingState::root(&inst);
        let duals = DualValues::new(vec![20.0; 5], vec![0.0]);
        let fixed = Tour::new(0, vec![1]).with_objective(20.0);
        let ctx = context(&inst, &branching, &duals)
            .with_probing(ProbingContext::new(10.0, 12.0, fixed, true));
        let mut pricer = Pricer::new(labeling_only()).expect("valid");
        let outcome = pricer.price(&ctx, &[]);
        assert_eq!(outcome.method, PricingMethod::Aborted);
        assert!(outcome.tours.is_empty());
        assert_eq!(outcome.stats, EngineStats::default());
    }

    #[test]
    fn test_tour_fixed_up_is_never_returned() {
        let inst = circle(4, 1);
        let branching = BranchingState::root(&inst);
        // only customer 1 is worth a tour of its own
        let duals = DualValues::new(vec![0.0, 25.0, 20.0, 21.0, 20.0], vec![0.0]);
        let evaluator = TourEvaluator::new(&inst);
        let (fixed, _) = evaluator.build_tour(0, &[1]);
        let plain = context(&inst, &branching, &duals);
        let config = labeling_only()
            .with_max_pairs(1000)
            .with_max_tours(1000)
            .with_max_columns_per_day(1000);
        let mut pricer = Pricer::new(config).expect("valid");
        let before = pricer.price(&plain, &[]);
        assert!(before.tours.iter().any(|t| t.same_route(&fixed)));

        let probing = context(&inst, &branching, &duals)
            .with_probing(ProbingContext::new(30.0, 12.0, fixed.clone(), true));
        let after = pricer.price(&probing, &[]);
        assert_eq!(after.method, PricingMethod::Labeling);
        assert!(!after.tours.is_empty());
        assert!(after.tours.iter().all(|t| !t.same_route(&fixed)));
    }

    #[test]
    fn test_bounds_below_priced_tours() {
        let inst = circle(7, 2);
        let branching = BranchingState::root(&inst);
        let duals = DualValues::new(vec![13.0; 8], vec![0.5, 0.0]);
        let ctx = context(&inst, &branching, &duals);
        let mut pricer = Pricer::new(labeling_only()).expect("valid");
        let outcome = pricer.price(&ctx, &[]);
        let bounds = pricer.reduced_cost_bounds(&ctx);
        assert!(!outcome.tours.is_empty());
        for tour in &outcome.tours {
            assert!(bounds.day(tour.day()) <= tour.reduced_cost() + 1e-6);
        }
        assert!(bounds.best() <= outcome.best_reduced_cost().expect("found") + 1e-6);
    }

    #[test]
    fn test_local_search_runs_first() {
        let inst = circle(4, 1);
        let branching = BranchingState::root(&inst);
        let duals = DualValues::new(vec![20.0; 5], vec![0.0]);
        let ctx = context(&inst, &branching, &duals);
        let columns = vec![Column::new(Tour::new(0, vec![1]), 1.0)];
        let config = PricingConfig::default().with_parallel(false);
        let mut pricer = Pricer::new(config).expect("valid");
        let outcome = pricer.price(&ctx, &columns);
        assert_eq!(outcome.method, PricingMethod::LocalSearch);
        assert_eq!(outcome.stats, EngineStats::default());
        assert!(outcome.tours.iter().all(|t| t.reduced_cost() < 0.0));

        // nothing to improve: falls through to labeling
        let outcome = pricer.price(&ctx, &[]);
        assert_eq!(outcome.method, PricingMethod::Labeling);
    }

    #[test]
    fn test_decremental_ng_removes_cycles() {
        // two close customers far from the depot: cycling between them pays
        let tw = TimeWindow::new(0.0, 500.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 20.0, 0.0, 1, 0.0).with_window(0, tw),
            Customer::new(2, 21.0, 0.0, 1, 0.0).with_window(0, tw),
        ];
        let travel = DistanceMatrix::from_customers(&customers);
        let day = Day::new(0, 4, 500.0).with_vehicles(2);
        let inst = Instance::new(customers, vec![day], travel, 2).expect("valid");
        let branching = BranchingState::root(&inst);
        let duals = DualValues::new(vec![0.0, 25.0, 25.0], vec![0.0]);
        let ctx = context(&inst, &branching, &duals);
        let config = labeling_only()
            .with_ng_mode(NgMode::Decremental)
            .with_max_columns_per_day(10);
        let mut pricer = Pricer::new(config).expect("valid");

        let first = pricer.price(&ctx, &[]);
        assert!(first.ng_cycles > 0);
        assert!(!pricer.ng_overrides().sets().iter().all(CustomerSet::is_empty));

        let mut rounds = 1;
        let mut outcome = first;
        while outcome.ng_cycles > 0 {
            assert!(rounds < 5, "filters don't converge");
            outcome = pricer.price(&ctx, &[]);
            rounds += 1;
        }
        assert!(!outcome.tours.is_empty());
        for tour in &outcome.tours {
            assert_eq!(find_ng_cycle(inst.ng_sets(), tour.customers()), None);
            assert!(tour.is_elementary());
        }
    }
}
