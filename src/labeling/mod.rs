//! Bidirectional ng-route labeling.
//!
//! Forward labels grow from the depot along the day graph, backward labels
//! grow from the depot against it. Both fronts are kept in per-direction
//! [`LabelPool`] arenas, pruned by [`dominance`], and finally joined into
//! tours by [`concat`].
//!
//! - [`label`]: resource labels and arc extension
//! - [`pool`]: label arena with rank lists and generation tree
//! - [`dominance`]: dominance test and its application to a pool
//! - [`engine`]: FIFO propagation loop of one day
//! - [`concat`]: joining forward and backward labels, reduced-cost bounds

pub mod concat;
pub mod dominance;
pub mod engine;
pub mod label;
pub mod pool;

pub use concat::{best_tours, day_bounds, join_cost, DayBounds};
pub use dominance::{dominates, DominanceOutcome};
pub use engine::{EngineStats, LabelSets, LabelingEngine};
pub use label::{DayScope, Direction, ResourceLabel};
pub use pool::{LabelId, LabelPool, NodeState};
