//! Subset-row cuts with a non-zero dual in the current master LP.

use crate::bitset::CustomerSet;
use crate::error::PricingError;
use serde::{Deserialize, Serialize};

/// A subset-row cut `Σ_r floor(p · |S ∩ r|) x_r ≤ floor(p · |S|)`.
///
/// Only cuts with a negative dual affect pricing. Labels accumulate `p` for
/// every visit to `S` and pay `-dual` each time the accumulated state
/// reaches 1.
///
/// # Examples
///
/// ```
/// use u_pricing::bitset::CustomerSet;
/// use u_pricing::pricing::SubsetRowCut;
///
/// let cut = SubsetRowCut::new(CustomerSet::from_indices([2, 3, 5]), 0.5, -1.2);
/// // visiting 2 and 5 crosses the threshold once
/// assert!((cut.tour_penalty(&[2, 4, 5]) - 1.2).abs() < 1e-9);
/// assert_eq!(cut.tour_penalty(&[2, 4]), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubsetRowCut {
    customers: CustomerSet,
    parameter: f64,
    dual: f64,
}

impl SubsetRowCut {
    /// Creates a cut over `customers` with multiplier `parameter` and LP
    /// dual `dual`.
    pub fn new(customers: CustomerSet, parameter: f64, dual: f64) -> Self {
        Self {
            customers,
            parameter,
            dual,
        }
    }

    /// Customers of the cut.
    pub fn customers(&self) -> &CustomerSet {
        &self.customers
    }

    /// Multiplier `p`.
    pub fn parameter(&self) -> f64 {
        self.parameter
    }

    /// Dual value (negative).
    pub fn dual(&self) -> f64 {
        self.dual
    }

    /// Returns `true` if the cut covers `customer`.
    pub fn covers(&self, customer: usize) -> bool {
        self.customers.contains(customer)
    }

    /// Reduced-cost contribution of the cut to a complete tour:
    /// `-dual · floor(p · |S ∩ tour|)`.
    pub fn tour_penalty(&self, tour: &[usize]) -> f64 {
        let state: f64 = tour
            .iter()
            .filter(|&&c| self.covers(c))
            .map(|_| self.parameter)
            .sum();
        -self.dual * (state + 1e-9).floor()
    }
}

/// Rejects cuts that the labeling cannot handle.
pub fn validate_cuts(cuts: &[SubsetRowCut]) -> Result<(), PricingError> {
    for (i, cut) in cuts.iter().enumerate() {
        if !(cut.parameter > 0.0 && cut.parameter <= 1.0) {
            return Err(PricingError::InvalidCutParameter {
                cut: i,
                parameter: cut.parameter,
            });
        }
        if cut.dual >= 0.0 || cut.dual.is_nan() {
            return Err(PricingError::NonNegativeCutDual {
                cut: i,
                dual: cut.dual,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tour_penalty_thresholds() {
        let cut = SubsetRowCut::new(CustomerSet::from_indices([1, 2, 3]), 0.5, -2.0);
        assert_eq!(cut.tour_penalty(&[1]), 0.0);
        assert!((cut.tour_penalty(&[1, 2]) - 2.0).abs() < 1e-12);
        assert!((cut.tour_penalty(&[1, 2, 3]) - 2.0).abs() < 1e-12);
        assert_eq!(cut.tour_penalty(&[4, 5]), 0.0);
    }

    #[test]
    fn test_validate_cuts() {
        let set = CustomerSet::from_indices([1, 2, 3]);
        assert!(validate_cuts(&[SubsetRowCut::new(set, 0.5, -1.0)]).is_ok());
        assert!(matches!(
            validate_cuts(&[SubsetRowCut::new(set, 1.5, -1.0)]),
            Err(PricingError::InvalidCutParameter { cut: 0, .. })
        ));
        assert!(matches!(
            validate_cuts(&[
                SubsetRowCut::new(set, 0.5, -1.0),
                SubsetRowCut::new(set, 0.5, 0.0)
            ]),
            Err(PricingError::NonNegativeCutDual { cut: 1, .. })
        ));
    }
}
