//! Pricing inputs and the pricing round driver.
//!
//! - [`duals`]: dual values, pricing mode and the arc-price table
//! - [`cuts`]: subset-row cuts and their per-label state
//! - [`branching`]: branching decisions and the filtered day graph
//! - [`config`]: pricing configuration
//! - [`context`]: immutable snapshot shared by all day tasks
//! - [`dssr`]: decremental ng-memory tightening
//! - [`bounds`]: reduced-cost bounds over all days
//! - [`pricer`]: orchestration of heuristic and exact pricing

pub mod bounds;
pub mod branching;
pub mod config;
pub mod context;
pub mod cuts;
pub mod dssr;
pub mod duals;
pub mod pricer;

pub use bounds::ReducedCostBounds;
pub use branching::{BranchingState, DayGraph};
pub use config::{NgMode, PricingConfig, ENFORCED_BONUS};
pub use context::{PricingContext, ProbingContext};
pub use cuts::{validate_cuts, SubsetRowCut};
pub use dssr::{find_ng_cycle, NgOverrides};
pub use duals::{DualValues, Objective, PriceTable, PricingMode};
pub use pricer::{Pricer, PricingMethod, PricingOutcome};
