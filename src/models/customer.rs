//! Customer and time window types.

use serde::{Deserialize, Serialize};

/// A time window constraint for service at a location on one day.
///
/// Service may start no later than `due`; arriving before `ready` means
/// waiting.
///
/// # Examples
///
/// ```
/// use u_pricing::models::TimeWindow;
///
/// let tw = TimeWindow::new(100.0, 200.0).unwrap();
/// assert!(tw.contains(150.0));
/// assert_eq!(tw.service_start(80.0), 100.0);
/// assert!(tw.is_violated(250.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    ready: f64,
    due: f64,
}

impl TimeWindow {
    /// Creates a new time window.
    ///
    /// Returns `None` if `ready > due` or either value is non-finite.
    pub fn new(ready: f64, due: f64) -> Option<Self> {
        if !ready.is_finite() || !due.is_finite() || ready > due {
            return None;
        }
        Some(Self { ready, due })
    }

    /// Earliest service start.
    pub fn ready(&self) -> f64 {
        self.ready
    }

    /// Latest service start.
    pub fn due(&self) -> f64 {
        self.due
    }

    /// Returns `true` if the given time falls within this window.
    pub fn contains(&self, time: f64) -> bool {
        time >= self.ready && time <= self.due
    }

    /// Service start when arriving at `arrival` (waits until `ready`).
    pub fn service_start(&self, arrival: f64) -> f64 {
        arrival.max(self.ready)
    }

    /// Returns `true` if arriving at the given time violates this window.
    pub fn is_violated(&self, arrival: f64) -> bool {
        arrival > self.due
    }
}

/// A customer (or the depot) of a periodic routing instance.
///
/// Location 0 is the depot. Each location has a demand, a service duration
/// and one optional time window per scheduling day; a location without a
/// window on a day cannot be visited that day.
///
/// # Examples
///
/// ```
/// use u_pricing::models::{Customer, TimeWindow};
///
/// let c = Customer::new(1, 41.0, 49.0, 10, 10.0)
///     .with_window(0, TimeWindow::new(0.0, 100.0).unwrap());
/// assert_eq!(c.demand(), 10);
/// assert!(c.is_available(0));
/// assert!(!c.is_available(1));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    id: usize,
    x: f64,
    y: f64,
    demand: i32,
    service_duration: f64,
    windows: Vec<Option<TimeWindow>>,
}

impl Customer {
    /// Creates a customer without any time window.
    pub fn new(id: usize, x: f64, y: f64, demand: i32, service_duration: f64) -> Self {
        Self {
            id,
            x,
            y,
            demand,
            service_duration,
            windows: Vec::new(),
        }
    }

    /// Creates a depot at the given coordinates (id=0, demand=0).
    pub fn depot(x: f64, y: f64) -> Self {
        Self::new(0, x, y, 0, 0.0)
    }

    /// Sets the time window for `day`.
    pub fn with_window(mut self, day: usize, tw: TimeWindow) -> Self {
        self.set_window(day, Some(tw));
        self
    }

    /// Sets or clears the time window for `day`.
    pub fn set_window(&mut self, day: usize, tw: Option<TimeWindow>) {
        if self.windows.len() <= day {
            self.windows.resize(day + 1, None);
        }
        self.windows[day] = tw;
    }

    /// Location id (0 = depot).
    pub fn id(&self) -> usize {
        self.id
    }

    /// X-coordinate.
    pub fn x(&self) -> f64 {
        self.x
    }

    /// Y-coordinate.
    pub fn y(&self) -> f64 {
        self.y
    }

    /// Demand at this customer.
    pub fn demand(&self) -> i32 {
        self.demand
    }

    /// Service duration at this customer.
    pub fn service_duration(&self) -> f64 {
        self.service_duration
    }

    /// Time window on `day`, if the customer can be served that day.
    pub fn window(&self, day: usize) -> Option<&TimeWindow> {
        self.windows.get(day).and_then(|w| w.as_ref())
    }

    /// Returns `true` if the customer has a time window on `day`.
    pub fn is_available(&self, day: usize) -> bool {
        self.window(day).is_some()
    }

    /// Days on which the customer can be served.
    pub fn available_days(&self) -> Vec<usize> {
        (0..self.windows.len())
            .filter(|&d| self.is_available(d))
            .collect()
    }

    /// Euclidean distance to another location.
    pub fn distance_to(&self, other: &Customer) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }
}
