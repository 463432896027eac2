//! Immutable snapshot of everything one pricing round reads.

use super::branching::{BranchingState, DayGraph};
use super::cuts::{validate_cuts, SubsetRowCut};
use super::duals::{DualValues, Objective, PriceTable, PricingMode};
use crate::error::PricingError;
use crate::models::{Instance, Tour};
use serde::{Deserialize, Serialize};

/// State of a tentative tour fixing.
///
/// While probing, a round whose LP objective is already below the
/// comparison bound is skipped. When fixed to 1 the tour is priced
/// without dominance on its day and never returned again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbingContext {
    /// Objective of the current LP.
    pub lp_objective: f64,
    /// Bound the LP objective is compared against.
    pub comparison_bound: f64,
    /// The tentatively fixed tour.
    pub fixed_tour: Tour,
    /// `true` if the tour was fixed to 1.
    pub up: bool,
}

impl ProbingContext {
    /// Creates a probing context.
    pub fn new(lp_objective: f64, comparison_bound: f64, fixed_tour: Tour, up: bool) -> Self {
        Self {
            lp_objective,
            comparison_bound,
            fixed_tour,
            up,
        }
    }

    /// Returns `true` if the round must be skipped.
    pub fn aborts(&self, epsilon: f64) -> bool {
        self.lp_objective < self.comparison_bound - epsilon
    }

    /// Returns `true` if `tour` is the tour fixed to 1.
    pub fn excludes(&self, tour: &Tour, epsilon: f64) -> bool {
        self.up
            && tour.same_route(&self.fixed_tour)
            && (tour.objective() - self.fixed_tour.objective()).abs() <= epsilon
    }

    /// Returns `true` if `day` must be priced without dominance.
    pub fn disables_dominance(&self, day: usize) -> bool {
        self.up && self.fixed_tour.day() == day
    }
}

/// Read-only inputs of one pricing round.
///
/// Built once per round and shared by all day tasks.
#[derive(Debug)]
pub struct PricingContext<'a> {
    instance: &'a Instance,
    branching: &'a BranchingState,
    duals: &'a DualValues,
    cuts: &'a [SubsetRowCut],
    mode: PricingMode,
    objective: Objective,
    prices: PriceTable,
    graphs: Vec<DayGraph>,
    enforced: Vec<Option<usize>>,
    enforced_per_day: Vec<usize>,
    probing: Option<ProbingContext>,
}

impl<'a> PricingContext<'a> {
    /// Validates the inputs and derives prices, day graphs and enforced
    /// customers.
    pub fn new(
        instance: &'a Instance,
        branching: &'a BranchingState,
        duals: &'a DualValues,
        cuts: &'a [SubsetRowCut],
        mode: PricingMode,
        objective: Objective,
    ) -> Result<Self, PricingError> {
        duals.check(instance)?;
        branching.check(instance)?;
        validate_cuts(cuts)?;
        let prices = PriceTable::new(instance, duals, mode, objective);
        let graphs = (0..instance.num_days())
            .map(|d| DayGraph::build(instance, branching, d))
            .collect();
        let enforced = branching.enforced_days(instance);
        let mut enforced_per_day = vec![0; instance.num_days()];
        for day in enforced.iter().flatten() {
            enforced_per_day[*day] += 1;
        }
        Ok(Self {
            instance,
            branching,
            duals,
            cuts,
            mode,
            objective,
            prices,
            graphs,
            enforced,
            enforced_per_day,
            probing: None,
        })
    }

    /// Attaches a probing context.
    pub fn with_probing(mut self, probing: ProbingContext) -> Self {
        self.probing = Some(probing);
        self
    }

    /// Adds `delta` to the price of arc `from → to` (dual of a robust cut).
    pub fn with_arc_adjustment(mut self, from: usize, to: usize, delta: f64) -> Self {
        self.prices.adjust_arc(from, to, delta);
        self
    }

    pub fn instance(&self) -> &'a Instance {
        self.instance
    }

    pub fn branching(&self) -> &'a BranchingState {
        self.branching
    }

    pub fn duals(&self) -> &'a DualValues {
        self.duals
    }

    /// Active subset-row cuts.
    pub fn cuts(&self) -> &'a [SubsetRowCut] {
        self.cuts
    }

    pub fn mode(&self) -> PricingMode {
        self.mode
    }

    pub fn objective(&self) -> Objective {
        self.objective
    }

    pub fn prices(&self) -> &PriceTable {
        &self.prices
    }

    /// Filtered graph of `day`.
    pub fn graph(&self, day: usize) -> &DayGraph {
        &self.graphs[day]
    }

    /// Day `customer` is enforced on, if any.
    pub fn enforced_day(&self, customer: usize) -> Option<usize> {
        self.enforced[customer]
    }

    /// Number of customers enforced on `day`.
    pub fn enforced_count(&self, day: usize) -> usize {
        self.enforced_per_day[day]
    }

    pub fn probing(&self) -> Option<&ProbingContext> {
        self.probing.as_ref()
    }

    /// Reduced cost of the empty forward path at the depot of `day`.
    pub fn initial_forward_cost(&self, day: usize, enforced_bonus: f64) -> f64 {
        self.prices.column_offset() - self.duals.day(day) - self.duals.vehicle_count()
            + self.enforced_count(day) as f64 * enforced_bonus
    }

    /// Reduced cost of a complete tour: column offset, day and vehicle
    /// duals, arc prices around the closed tour and subset-row penalties.
    pub fn tour_reduced_cost(&self, day: usize, customers: &[usize]) -> f64 {
        let mut rc = self.prices.column_offset() - self.duals.day(day) - self.duals.vehicle_count();
        let mut prev = 0;
        for &c in customers {
            rc += self.prices.arc(prev, c);
            prev = c;
        }
        rc += self.prices.arc(prev, 0);
        rc + self
            .cuts
            .iter()
            .map(|cut| cut.tour_penalty(customers))
            .sum::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitset::CustomerSet;
    use crate::distance::DistanceMatrix;
    use crate::labeling::{DayScope, Direction, ResourceLabel};
    use crate::models::{Customer, Day, TimeWindow};
    use crate::pricing::PricingConfig;

    fn instance() -> Instance {
        let tw = TimeWindow::new(0.0, 100.0).expect("valid");
        let customers = vec![
            Customer::depot(0.0, 0.0),
            Customer::new(1, 3.0, 4.0, 1, 0.0).with_window(0, tw),
            Customer::new(2, 3.0, 0.0, 1, 0.0).with_window(0, tw).with_window(1, tw),
        ];
        let travel = DistanceMatrix::from_customers(&customers);
        let days = vec![Day::new(0, 10, 100.0), Day::new(1, 10, 100.0)];
        Instance::new(customers, days, travel, 2).expect("valid")
    }

    // forward reduced cost of the path from the depot of day 0
    fn path_cost<'a>(ctx: &'a PricingContext<'a>, path: &[usize]) -> f64 {
        let config = PricingConfig::default();
        let scope = DayScope::new(ctx, 0, &config);
        let mut label = ResourceLabel::initial(Direction::Forward, &scope);
        for &c in path {
            label = label.extend(Direction::Forward, c, &scope).expect("feasible");
        }
        label.reduced_cost()
    }

    #[test]
    fn test_context_derivations() {
        let inst = instance();
        let branching = BranchingState::root(&inst);
        let duals = DualValues::new(vec![0.0, 10.0, 8.0], vec![-1.0, -2.0]);
        let ctx = PricingContext::new(
            &inst,
            &branching,
            &duals,
            &[],
            PricingMode::ReducedCost,
            Objective::MinTravel,
        )
        .expect("valid inputs");
        assert_eq!(ctx.enforced_day(1), Some(0));
        assert_eq!(ctx.enforced_day(2), None);
        assert_eq!(ctx.enforced_count(0), 1);
        assert_eq!(ctx.enforced_count(1), 0);
        assert!((ctx.initial_forward_cost(0, 100.0) - 101.0).abs() < 1e-10);
        assert_eq!(ctx.graph(1).customers(), &[2]);
    }

    #[test]
    fn test_tour_reduced_cost() {
        let inst = instance();
        let branching = BranchingState::root(&inst);
        let duals = DualValues::new(vec![0.0, 10.0, 8.0], vec![-1.0, 0.0]);
        let cut = SubsetRowCut::new(CustomerSet::from_indices([1, 2]), 0.5, -0.5);
        let cuts = vec![cut];
        let ctx = PricingContext::new(
            &inst,
            &branching,
            &duals,
            &cuts,
            PricingMode::ReducedCost,
            Objective::MinTravel,
        )
        .expect("valid inputs");
        // 0 -> 1 -> 2 -> 0: travel 5 + 4 + 3 = 12, duals 18, day dual -1, cut 0.5
        let rc = ctx.tour_reduced_cost(0, &[1, 2]);
        assert!((rc - (12.0 - 18.0 + 1.0 + 0.5)).abs() < 1e-9);
    }

    #[test]
    fn test_arc_adjustment_reaches_labels() {
        let inst = instance();
        let branching = BranchingState::root(&inst);
        let duals = DualValues::new(vec![0.0, 10.0, 8.0], vec![0.0, 0.0]);
        let plain = PricingContext::new(
            &inst,
            &branching,
            &duals,
            &[],
            PricingMode::ReducedCost,
            Objective::MinTravel,
        )
        .expect("valid inputs");
        let adjusted = PricingContext::new(
            &inst,
            &branching,
            &duals,
            &[],
            PricingMode::ReducedCost,
            Objective::MinTravel,
        )
        .expect("valid inputs")
        .with_arc_adjustment(1, 2, 3.0);

        let diff = adjusted.tour_reduced_cost(0, &[1, 2]) - plain.tour_reduced_cost(0, &[1, 2]);
        assert!((diff - 3.0).abs() < 1e-9);
        let diff = adjusted.tour_reduced_cost(0, &[2, 1]) - plain.tour_reduced_cost(0, &[2, 1]);
        assert!(diff.abs() < 1e-9);
        // forward labels pay the adjusted price on 1 -> 2 only
        assert!((path_cost(&adjusted, &[1, 2]) - path_cost(&plain, &[1, 2]) - 3.0).abs() < 1e-9);
        assert!((path_cost(&adjusted, &[2, 1]) - path_cost(&plain, &[2, 1])).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_wrong_duals() {
        let inst = instance();
        let branching = BranchingState::root(&inst);
        let duals = DualValues::new(vec![0.0, 10.0], vec![0.0, 0.0]);
        assert!(PricingContext::new(
            &inst,
            &branching,
            &duals,
            &[],
            PricingMode::Farkas,
            Objective::MinTravel
        )
        .is_err());
    }

    #[test]
    fn test_probing_rules() {
        let fixed = Tour::new(1, vec![2]).with_objective(6.0);
        let up = ProbingContext::new(10.0, 12.0, fixed.clone(), true);
        assert!(up.aborts(1e-6));
        assert!(up.disables_dominance(1));
        assert!(!up.disables_dominance(0));
        assert!(up.excludes(&fixed, 1e-6));
        assert!(!up.excludes(&Tour::new(1, vec![1]), 1e-6));
        let down = ProbingContext::new(13.0, 12.0, fixed.clone(), false);
        assert!(!down.aborts(1e-6));
        assert!(!down.excludes(&fixed, 1e-6));
    }
}
