//! Travel-time and per-arc matrices.
//!
//! Provides a dense square matrix used for travel times, arc prices,
//! branching-forbidden arcs and reduced-cost bounds.

mod matrix;

pub use matrix::{DistanceMatrix, Matrix};
