//! Tour feasibility violations.

use serde::{Deserialize, Serialize};

/// A type of constraint violation in a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ViolationType {
    /// Day capacity exceeded.
    CapacityExceeded {
        /// Load of the tour.
        load: i32,
        /// Capacity of the day.
        capacity: i32,
    },
    /// Arrival after the customer's time window closes.
    TimeWindowViolated {
        /// Customer where the violation occurred.
        customer_id: usize,
        /// Actual arrival time.
        arrival: f64,
        /// Latest allowed service start.
        due: f64,
    },
    /// Vehicle returns to the depot after the horizon.
    LateReturn {
        /// Return time.
        arrival: f64,
        /// Depot closing time.
        horizon: f64,
    },
    /// Customer has no time window on the tour's day.
    Unavailable {
        /// Customer id.
        customer_id: usize,
        /// Day of the tour.
        day: usize,
    },
    /// The tour uses an arc forbidden by branching.
    ForbiddenArc {
        /// Tail of the arc.
        from: usize,
        /// Head of the arc.
        to: usize,
    },
}

/// A constraint violation in a tour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}
