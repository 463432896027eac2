//! # u-pricing
//!
//! Pricing subproblem of a column-generation solver for the periodic vehicle
//! routing problem with time windows: bidirectional ng-route labeling with
//! dominance and subset-row cuts, plus a local-search pricing heuristic.
//!
//! ## Modules
//!
//! - [`bitset`]: Fixed-width customer sets for ng-memory and enforced visits
//! - [`models`]: Domain model types (Customer, Day, Instance, Tour)
//! - [`distance`]: Travel time and per-arc matrices
//! - [`evaluation`]: Tour feasibility checking and travel objective
//! - [`labeling`]: Resource labels, dominance, propagation and concatenation
//! - [`local_search`]: Column extend/shift/decrease pricing heuristic
//! - [`pricing`]: Duals, cuts, branching state and the pricing round driver
//! - [`error`]: Input validation errors

pub mod bitset;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod labeling;
pub mod local_search;
pub mod models;
pub mod pricing;

pub use error::PricingError;
