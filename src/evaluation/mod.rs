//! Tour evaluation: travel objective, load and feasibility checks.

mod evaluator;

pub use evaluator::{TourEvaluator, FEASIBILITY_TOLERANCE};
