//! Pricing and calibration errors.

use credit_core::market_data::CurveError;
use credit_core::types::SolverError;
use credit_models::loss::LossModelError;
use thiserror::Error;

/// Errors from CDS, tranche and basket pricing.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PricingError {
    /// Attachment points violate `0 <= k1 <= k2 <= 1`.
    #[error("Invalid attachment points: k1 = {k1}, k2 = {k2}")]
    InvalidAttachment {
        /// Attachment point
        k1: f64,
        /// Detachment point
        k2: f64,
    },

    /// The tranche survival curve lost monotonicity.
    ///
    /// Tranche survival probabilities must not increase with time; a
    /// violation means the loss model inputs are inconsistent and the
    /// valuation is abandoned rather than patched.
    #[error("Tranche survival probability increased at t = {time}")]
    NonMonotonicSurvivalCurve {
        /// Payment time where the violation was detected
        time: f64,
    },

    /// Contract maturity is not positive.
    #[error("Contract maturity {value} must be positive")]
    InvalidMaturity {
        /// Offending maturity
        value: f64,
    },

    /// Basket order outside `1..=n`.
    #[error("Basket order {order} outside 1..={issuers}")]
    InvalidBasketOrder {
        /// Requested nth-to-default order
        order: usize,
        /// Number of issuers in the pool
        issuers: usize,
    },

    /// A risky annuity collapsed to zero, so no par spread exists.
    #[error("Risky PV01 is zero at maturity {maturity}")]
    ZeroRiskyAnnuity {
        /// Contract maturity
        maturity: f64,
    },

    /// Loss model failure.
    #[error(transparent)]
    Model(#[from] LossModelError),

    /// Curve construction failure.
    #[error(transparent)]
    Curve(#[from] CurveError),

    /// Root-finding failure.
    #[error(transparent)]
    Solver(#[from] SolverError),
}

/// Errors from index basis calibration.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// A calibration bucket failed to converge within the iteration cap.
    #[error("Calibration bucket {bucket} failed to converge after {iterations} iterations")]
    IterationLimitExceeded {
        /// Index of the calibration bucket (target tenor)
        bucket: usize,
        /// Iteration cap that was exhausted
        iterations: usize,
    },

    /// Calibration target maturities are not strictly increasing.
    #[error("Calibration target maturities must increase strictly; bucket {bucket} does not")]
    TargetsNotIncreasing {
        /// Index of the first out-of-order bucket
        bucket: usize,
    },

    /// A calibration target has no matching curve tenor.
    #[error("Calibration bucket {bucket} (maturity {maturity}) has no matching curve tenor")]
    BucketTenorMismatch {
        /// Index of the calibration bucket
        bucket: usize,
        /// Target maturity that found no knot
        maturity: f64,
    },

    /// Pricing failed while evaluating the intrinsic index value.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Curve construction failed while rebuilding adjusted curves.
    #[error(transparent)]
    Curve(#[from] CurveError),
}

impl From<SolverError> for CalibrationError {
    /// Map solver failures into calibration terms.
    ///
    /// The bucket index is unknown at this level; callers re-tag it.
    fn from(err: SolverError) -> Self {
        match err {
            SolverError::MaxIterationsExceeded { iterations } => {
                CalibrationError::IterationLimitExceeded {
                    bucket: 0,
                    iterations,
                }
            }
            other => CalibrationError::Pricing(PricingError::Solver(other)),
        }
    }
}

impl From<LossModelError> for CalibrationError {
    fn from(err: LossModelError) -> Self {
        CalibrationError::Pricing(PricingError::Model(err))
    }
}
