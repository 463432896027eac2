//! Error type for invalid pricing inputs.
//!
//! Infeasible extensions and dominated labels are ordinary outcomes and never
//! surface here; only malformed instance data, duals, cuts or configuration
//! do.

use crate::bitset::SET_WIDTH;

/// Errors raised while building pricing inputs.
#[derive(Debug, Clone, PartialEq)]
pub enum PricingError {
    /// More locations than a [`CustomerSet`](crate::bitset::CustomerSet) can hold.
    TooManyLocations {
        /// Number of locations supplied (depot included).
        locations: usize,
    },
    /// The instance has no locations at all.
    EmptyInstance,
    /// A matrix or vector does not match the number of locations or days.
    DimensionMismatch {
        /// What was being checked.
        what: &'static str,
        /// Expected length.
        expected: usize,
        /// Supplied length.
        actual: usize,
    },
    /// Location ids must equal their index.
    LocationIdMismatch {
        /// Position in the location list.
        index: usize,
        /// Id stored in the customer.
        id: usize,
    },
    /// Day ids must equal their index.
    DayIdMismatch {
        /// Position in the day list.
        index: usize,
        /// Id stored in the day.
        id: usize,
    },
    /// A subset-row cut has a parameter outside `(0, 1]`.
    InvalidCutParameter {
        /// Index of the cut.
        cut: usize,
        /// Offending parameter.
        parameter: f64,
    },
    /// A subset-row cut with a non-negative dual value was handed to pricing.
    NonNegativeCutDual {
        /// Index of the cut.
        cut: usize,
        /// Offending dual value.
        dual: f64,
    },
    /// Configuration rejected by [`PricingConfig::validate`](crate::pricing::PricingConfig::validate).
    InvalidConfig(String),
}

impl std::fmt::Display for PricingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PricingError::TooManyLocations { locations } => write!(
                f,
                "{locations} locations exceed the supported maximum of {SET_WIDTH}"
            ),
            PricingError::EmptyInstance => write!(f, "the instance has no locations"),
            PricingError::DimensionMismatch {
                what,
                expected,
                actual,
            } => write!(f, "{what}: expected length {expected}, got {actual}"),
            PricingError::LocationIdMismatch { index, id } => {
                write!(f, "location at index {index} has id {id}")
            }
            PricingError::DayIdMismatch { index, id } => {
                write!(f, "day at index {index} has id {id}")
            }
            PricingError::InvalidCutParameter { cut, parameter } => write!(
                f,
                "subset-row cut {cut} has parameter {parameter}, expected a value in (0, 1]"
            ),
            PricingError::NonNegativeCutDual { cut, dual } => write!(
                f,
                "subset-row cut {cut} has dual value {dual}, only negative duals are priced"
            ),
            PricingError::InvalidConfig(msg) => write!(f, "invalid pricing configuration: {msg}"),
        }
    }
}

impl std::error::Error for PricingError {}
