//! Scheduling day with its vehicle resources.

use serde::{Deserialize, Serialize};

/// A scheduling day: the number of vehicles and their capacity, and the
/// planning horizon (depot opening and closing time).
///
/// # Examples
///
/// ```
/// use u_pricing::models::Day;
///
/// let d = Day::new(0, 200, 480.0);
/// assert_eq!(d.capacity(), 200);
/// assert_eq!(d.horizon(), 480.0);
/// assert_eq!(d.half_horizon(), 240.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Day {
    id: usize,
    capacity: i32,
    vehicles: usize,
    start: f64,
    horizon: f64,
}

impl Day {
    /// Creates a day with one vehicle of the given capacity; the depot opens
    /// at 0 and closes at `horizon`.
    pub fn new(id: usize, capacity: i32, horizon: f64) -> Self {
        Self {
            id,
            capacity,
            vehicles: 1,
            start: 0.0,
            horizon,
        }
    }

    /// Sets the depot opening time.
    pub fn with_start(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    /// Sets the number of vehicles available on this day.
    pub fn with_vehicles(mut self, vehicles: usize) -> Self {
        self.vehicles = vehicles;
        self
    }

    /// Day index.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Vehicle capacity on this day.
    pub fn capacity(&self) -> i32 {
        self.capacity
    }

    /// Number of vehicles available on this day.
    pub fn vehicles(&self) -> usize {
        self.vehicles
    }

    /// Depot opening time.
    pub fn start(&self) -> f64 {
        self.start
    }

    /// Depot closing time; every tour must be back by then.
    pub fn horizon(&self) -> f64 {
        self.horizon
    }

    /// Meeting point of the forward and backward labeling fronts.
    pub fn half_horizon(&self) -> f64 {
        self.horizon / 2.0
    }
}
