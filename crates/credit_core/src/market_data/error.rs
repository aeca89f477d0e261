//! Curve construction and portfolio validation errors.

use thiserror::Error;

/// Errors raised when building or mutating curves and issuer pools.
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CurveError {
    /// The portfolio contains no issuer curves.
    #[error("Portfolio contains no issuer curves")]
    EmptyPortfolio,

    /// An issuer's knot times differ from the first issuer's.
    #[error("Issuer {issuer} has knot times differing from issuer 0")]
    MismatchedTenors {
        /// Index of the offending issuer
        issuer: usize,
    },

    /// A survival probability knot is outside `(0, 1]`.
    #[error("Survival probability {value} at knot {index} outside (0, 1]")]
    InvalidKnot {
        /// Knot index
        index: usize,
        /// Offending value
        value: f64,
    },

    /// Survival probabilities increase between consecutive knots.
    #[error("Survival probability increases at knot {index}")]
    NonMonotonicSurvival {
        /// Knot index where the increase occurs
        index: usize,
    },

    /// Knot times are not strictly increasing and positive.
    #[error("Knot times not strictly increasing and positive at index {index}")]
    NonMonotonicTimes {
        /// Index where the ordering breaks
        index: usize,
    },

    /// Knot time and value arrays have different lengths.
    #[error("Curve has {times} knot times but {values} values")]
    LengthMismatch {
        /// Number of knot times
        times: usize,
        /// Number of knot values
        values: usize,
    },

    /// Recovery rate outside `[0, 1)`.
    #[error("Recovery rate {value} outside [0, 1)")]
    InvalidRecovery {
        /// Offending recovery rate
        value: f64,
    },
}
