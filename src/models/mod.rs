//! Domain model types for periodic vehicle routing pricing.
//!
//! Provides customers with per-day time windows, scheduling days with their
//! vehicle resources, the instance tying them to a travel matrix and
//! ng-neighbourhoods, tours produced by pricing, and tour violations.

mod customer;
mod day;
mod instance;
mod tour;
mod violation;

pub use customer::{Customer, TimeWindow};
pub use day::Day;
pub use instance::Instance;
pub use tour::{Column, Tour};
pub use violation::{Violation, ViolationType};
