//! Local-search pricing heuristic.
//!
//! Edits the columns of the current master solution into new tours with
//! negative reduced cost, without running the labeling algorithm.
//!
//! - [`column`]: candidate selection and the per-column driver
//! - [`insertion`]: travel deltas of single-position edits
//! - `extend`, `shift`, `decrease`: the three column operators

pub mod column;
mod decrease;
mod extend;
pub mod insertion;
mod shift;

pub use column::{investigate_column, local_search_pricing};
pub use insertion::{exchange_cost, insertion_cost, removal_cost};
