//! Risk-free discounting.

use crate::market_data::CurveError;

/// Source of risk-free discount factors.
///
/// Implementations must satisfy `df(0) = 1` and be non-increasing in `t`
/// for non-negative rates. Pricing code holds curves behind
/// `Arc<dyn DiscountCurve + Send + Sync>` so a single curve can be shared
/// across issuers and threads.
pub trait DiscountCurve: Send + Sync {
    /// Discount factor for a cashflow at time `t` (in years).
    fn df(&self, t: f64) -> f64;
}

/// Flat continuously-compounded discount curve.
///
/// # Example
///
/// ```
/// use credit_core::market_data::curves::{DiscountCurve, FlatDiscountCurve};
///
/// let curve = FlatDiscountCurve::new(0.05);
/// assert!((curve.df(0.0) - 1.0).abs() < 1e-15);
/// assert!((curve.df(2.0) - (-0.1_f64).exp()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FlatDiscountCurve {
    rate: f64,
}

impl FlatDiscountCurve {
    /// Create a flat curve with the given continuously-compounded rate.
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// The continuously-compounded zero rate.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl DiscountCurve for FlatDiscountCurve {
    fn df(&self, t: f64) -> f64 {
        (-self.rate * t).exp()
    }
}

/// Discount curve built from discount factor pillars.
///
/// Interpolates log-linearly in the discount factor (piecewise-flat
/// forward rate), with flat forward extrapolation beyond the last pillar.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterpolatedDiscountCurve {
    times: Vec<f64>,
    factors: Vec<f64>,
}

impl InterpolatedDiscountCurve {
    /// Build a curve from discount factor pillars.
    ///
    /// # Arguments
    ///
    /// * `times` - Pillar times, strictly increasing and positive
    /// * `factors` - Discount factors at the pillars, each in `(0, 1]`
    ///
    /// # Errors
    ///
    /// Returns `CurveError` if the arrays are empty or mismatched, the
    /// times are not strictly increasing and positive, or a factor falls
    /// outside `(0, 1]`.
    pub fn new(times: Vec<f64>, factors: Vec<f64>) -> Result<Self, CurveError> {
        if times.len() != factors.len() {
            return Err(CurveError::LengthMismatch {
                times: times.len(),
                values: factors.len(),
            });
        }
        if times.is_empty() {
            return Err(CurveError::LengthMismatch {
                times: 0,
                values: 0,
            });
        }
        let mut prev = 0.0;
        for (i, &t) in times.iter().enumerate() {
            if t <= prev {
                return Err(CurveError::NonMonotonicTimes { index: i });
            }
            prev = t;
        }
        for (i, &f) in factors.iter().enumerate() {
            if !(f > 0.0 && f <= 1.0) {
                return Err(CurveError::InvalidKnot { index: i, value: f });
            }
        }
        Ok(Self { times, factors })
    }

    /// Pillar times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }
}

impl DiscountCurve for InterpolatedDiscountCurve {
    fn df(&self, t: f64) -> f64 {
        crate::math::interpolators::flat_forward(&self.times, &self.factors, t)
    }
}
