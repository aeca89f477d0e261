//! Loss model input errors.

use thiserror::Error;

/// Errors from the tranche loss models.
///
/// Every variant is a precondition failure on the inputs; the models
/// themselves do not fail once inputs are validated.
#[derive(Error, Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LossModelError {
    /// Attachment points violate `0 <= k1 < k2 <= 1`.
    #[error("Invalid attachment points: k1 = {k1}, k2 = {k2} (need 0 <= k1 < k2 <= 1)")]
    InvalidAttachment {
        /// Attachment point
        k1: f64,
        /// Detachment point
        k2: f64,
    },

    /// The portfolio contains no issuers.
    #[error("Portfolio contains no issuers")]
    EmptyPortfolio,

    /// Input slices have inconsistent lengths.
    #[error(
        "Mismatched input lengths: {survival} survival probabilities, \
         {recovery} recovery rates, {loadings} loadings"
    )]
    MismatchedLengths {
        /// Number of survival probabilities
        survival: usize,
        /// Number of recovery rates
        recovery: usize,
        /// Number of factor loadings
        loadings: usize,
    },

    /// A survival probability is outside `(0, 1]`.
    #[error("Issuer {issuer} has survival probability {value} outside (0, 1]")]
    InvalidProbability {
        /// Issuer index
        issuer: usize,
        /// Offending value
        value: f64,
    },

    /// A recovery rate is outside `[0, 1)`.
    #[error("Issuer {issuer} has recovery rate {value} outside [0, 1)")]
    InvalidRecovery {
        /// Issuer index
        issuer: usize,
        /// Offending value
        value: f64,
    },

    /// A factor loading is outside `[0, 1)`.
    #[error("Issuer {issuer} has factor loading {value} outside [0, 1)")]
    InvalidCorrelation {
        /// Issuer index
        issuer: usize,
        /// Offending value
        value: f64,
    },

    /// The quadrature point count is unusable.
    #[error("Quadrature point count {points} must be positive")]
    InvalidQuadrature {
        /// Requested point count
        points: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = LossModelError::InvalidAttachment { k1: 0.07, k2: 0.03 };
        assert!(format!("{}", err).contains("k1 = 0.07"));

        let err = LossModelError::MismatchedLengths {
            survival: 3,
            recovery: 2,
            loadings: 3,
        };
        assert!(format!("{}", err).contains("2 recovery rates"));
    }

    #[test]
    fn test_error_trait() {
        let err = LossModelError::EmptyPortfolio;
        let _: &dyn std::error::Error = &err;
    }
}
