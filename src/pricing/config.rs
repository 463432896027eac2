//! Pricing configuration.

use crate::error::PricingError;
use serde::{Deserialize, Serialize};

/// Bonus subtracted from the reduced cost of a label for every enforced
/// customer it visits.
pub const ENFORCED_BONUS: f64 = 10_000.0;

/// How the ng-memory of a label is filtered on extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NgMode {
    /// Memory is intersected with the ng-neighbourhood of the target.
    Static,
    /// Decremental state-space relaxation: memory is intersected with a
    /// per-customer override set that grows whenever a priced tour turns out
    /// to contain a cycle.
    Decremental,
}

/// Configuration of the pricing problem.
///
/// # Examples
///
/// ```
/// use u_pricing::pricing::{NgMode, PricingConfig};
///
/// let config = PricingConfig::default()
///     .with_ng_mode(NgMode::Decremental)
///     .with_max_pairs(20)
///     .with_parallel(false);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Numerical tolerance for reduced costs and time comparisons.
    pub epsilon: f64,

    /// Settle labels whose time exceeds half the horizon without extending
    /// them. Ignored when computing reduced-cost bounds.
    pub halfway_pruning: bool,

    /// Run the dominance check on new labels.
    pub dominance: bool,

    /// ng-memory filtering.
    pub ng_mode: NgMode,

    /// Concatenation stops once more than this many negative pairs were
    /// found on a day.
    pub max_pairs: usize,

    /// Maximum number of distinct reduced-cost values turned into tours per
    /// day.
    pub max_tours: usize,

    /// Maximum number of tours returned per day. `None` = customers / 4 + 1.
    pub max_columns_per_day: Option<usize>,

    /// Reduced-cost bonus for visiting an enforced customer.
    pub enforced_bonus: f64,

    /// Try the local-search heuristic before exact labeling when no
    /// subset-row cuts are active.
    pub local_search_first: bool,

    /// The local search stops after this many improving tours.
    pub max_local_search_tours: usize,

    /// Price the days in parallel.
    pub parallel: bool,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            epsilon: 1e-6,
            halfway_pruning: true,
            dominance: true,
            ng_mode: NgMode::Static,
            max_pairs: 10,
            max_tours: 21,
            max_columns_per_day: None,
            enforced_bonus: ENFORCED_BONUS,
            local_search_first: true,
            max_local_search_tours: 10,
            parallel: true,
        }
    }
}

impl PricingConfig {
    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_halfway_pruning(mut self, enabled: bool) -> Self {
        self.halfway_pruning = enabled;
        self
    }

    pub fn with_dominance(mut self, enabled: bool) -> Self {
        self.dominance = enabled;
        self
    }

    pub fn with_ng_mode(mut self, mode: NgMode) -> Self {
        self.ng_mode = mode;
        self
    }

    pub fn with_max_pairs(mut self, n: usize) -> Self {
        self.max_pairs = n;
        self
    }

    pub fn with_max_tours(mut self, n: usize) -> Self {
        self.max_tours = n;
        self
    }

    pub fn with_max_columns_per_day(mut self, n: usize) -> Self {
        self.max_columns_per_day = Some(n);
        self
    }

    pub fn with_enforced_bonus(mut self, bonus: f64) -> Self {
        self.enforced_bonus = bonus;
        self
    }

    pub fn with_local_search_first(mut self, enabled: bool) -> Self {
        self.local_search_first = enabled;
        self
    }

    pub fn with_max_local_search_tours(mut self, n: usize) -> Self {
        self.max_local_search_tours = n;
        self
    }

    pub fn with_parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Tour limit per day for an instance with `customers` customers.
    pub fn columns_per_day(&self, customers: usize) -> usize {
        self.max_columns_per_day.unwrap_or(customers / 4 + 1)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), PricingError> {
        if !(self.epsilon > 0.0 && self.epsilon < 1.0) {
            return Err(PricingError::InvalidConfig(format!(
                "epsilon must be in (0, 1), got {}",
                self.epsilon
            )));
        }
        if self.max_tours == 0 {
            return Err(PricingError::InvalidConfig(
                "max_tours must be at least 1".into(),
            ));
        }
        if self.max_columns_per_day == Some(0) {
            return Err(PricingError::InvalidConfig(
                "max_columns_per_day must be positive or None".into(),
            ));
        }
        if !(self.enforced_bonus > 0.0) {
            return Err(PricingError::InvalidConfig(
                "enforced_bonus must be positive".into(),
            ));
        }
        Ok(())
    }
}
