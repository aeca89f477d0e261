//! Issuer survival curves and pools.

use std::sync::Arc;

use crate::market_data::curves::DiscountCurve;
use crate::market_data::CurveError;
use crate::math::interpolators::flat_forward;

/// A par CDS quote used to strip one survival curve knot.
///
/// Spreads are annualised running premia in decimal (`0.01` = 100bp).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CdsQuote {
    /// Contract maturity in years.
    pub maturity: f64,
    /// Par running spread per annum.
    pub spread: f64,
}

impl CdsQuote {
    /// Create a quote from maturity and par spread.
    pub fn new(maturity: f64, spread: f64) -> Self {
        Self { maturity, spread }
    }
}

/// A bootstrapped issuer survival curve.
///
/// Knots hold survival probabilities `Q(0, t_i)`; between knots the curve
/// interpolates log-linearly (piecewise-flat forward hazard), with an
/// implied `(0, 1)` knot at the origin. The curve keeps a handle to the
/// discount curve and the CDS quotes it was stripped from so calibration
/// can re-bootstrap adjusted copies without outside bookkeeping.
///
/// Knot values may be overwritten individually via [`set_value`]; this is
/// how hazard-style index calibration perturbs a curve in place. Each
/// write is bounds-checked into `(0, 1]` but deliberately not checked
/// against neighbouring knots, since intermediate calibration states pass
/// through transient monotonicity violations.
///
/// [`set_value`]: SurvivalCurve::set_value
#[derive(Clone)]
pub struct SurvivalCurve {
    times: Vec<f64>,
    values: Vec<f64>,
    recovery_rate: f64,
    discount: Arc<dyn DiscountCurve + Send + Sync>,
    quotes: Vec<CdsQuote>,
}

impl std::fmt::Debug for SurvivalCurve {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SurvivalCurve")
            .field("times", &self.times)
            .field("values", &self.values)
            .field("recovery_rate", &self.recovery_rate)
            .field("quotes", &self.quotes)
            .finish_non_exhaustive()
    }
}

impl SurvivalCurve {
    /// Build a survival curve from bootstrapped knots.
    ///
    /// # Arguments
    ///
    /// * `times` - Knot times, strictly increasing and positive
    /// * `values` - Survival probabilities at the knots, each in `(0, 1]`
    ///   and non-increasing
    /// * `recovery_rate` - Expected recovery on default, in `[0, 1)`
    /// * `discount` - Shared risk-free discount curve
    /// * `quotes` - The CDS quotes the knots were stripped from (may be
    ///   empty for curves constructed directly from probabilities)
    ///
    /// # Errors
    ///
    /// Returns `CurveError` on mismatched array lengths, non-increasing
    /// or non-positive times, probabilities outside `(0, 1]`, rising
    /// probabilities between knots, or a recovery rate outside `[0, 1)`.
    pub fn new(
        times: Vec<f64>,
        values: Vec<f64>,
        recovery_rate: f64,
        discount: Arc<dyn DiscountCurve + Send + Sync>,
        quotes: Vec<CdsQuote>,
    ) -> Result<Self, CurveError> {
        if times.len() != values.len() {
            return Err(CurveError::LengthMismatch {
                times: times.len(),
                values: values.len(),
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
        for (i, &q) in values.iter().enumerate() {
            if !(q > 0.0 && q <= 1.0) {
                return Err(CurveError::InvalidKnot { index: i, value: q });
            }
            // Never silently repaired: a rising knot is a data error.
            if i > 0 && q > values[i - 1] {
                return Err(CurveError::NonMonotonicSurvival { index: i });
            }
        }
        if !(0.0..1.0).contains(&recovery_rate) {
            return Err(CurveError::InvalidRecovery {
                value: recovery_rate,
            });
        }
        Ok(Self {
            times,
            values,
            recovery_rate,
            discount,
            quotes,
        })
    }

    /// Survival probability `Q(0, t)`.
    ///
    /// Returns 1 for `t <= 0` and extrapolates the final forward hazard
    /// beyond the last knot.
    pub fn survival_probability(&self, t: f64) -> f64 {
        flat_forward(&self.times, &self.values, t)
    }

    /// Knot times.
    pub fn times(&self) -> &[f64] {
        &self.times
    }

    /// Knot survival probabilities.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Survival probability at knot `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn value(&self, index: usize) -> f64 {
        self.values[index]
    }

    /// Overwrite the survival probability at knot `index`.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::InvalidKnot` if `value` is outside `(0, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    pub fn set_value(&mut self, index: usize, value: f64) -> Result<(), CurveError> {
        if !(value > 0.0 && value <= 1.0) {
            return Err(CurveError::InvalidKnot { index, value });
        }
        self.values[index] = value;
        Ok(())
    }

    /// Expected recovery rate on default.
    pub fn recovery_rate(&self) -> f64 {
        self.recovery_rate
    }

    /// Shared discount curve handle.
    pub fn discount(&self) -> &Arc<dyn DiscountCurve + Send + Sync> {
        &self.discount
    }

    /// The CDS quotes the curve was stripped from.
    pub fn quotes(&self) -> &[CdsQuote] {
        &self.quotes
    }

    /// Number of knots.
    pub fn num_knots(&self) -> usize {
        self.times.len()
    }
}

/// A validated, non-empty collection of issuer survival curves.
///
/// Portfolio pricing and calibration assume every issuer curve shares the
/// same knot times; [`validate_tenors`] enforces this up front so the
/// models can index knots positionally.
///
/// [`validate_tenors`]: IssuerPool::validate_tenors
#[derive(Debug, Clone)]
pub struct IssuerPool {
    curves: Vec<SurvivalCurve>,
}

impl IssuerPool {
    /// Build a pool from issuer curves.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::EmptyPortfolio` if `curves` is empty.
    pub fn new(curves: Vec<SurvivalCurve>) -> Result<Self, CurveError> {
        if curves.is_empty() {
            return Err(CurveError::EmptyPortfolio);
        }
        Ok(Self { curves })
    }

    /// Check that all issuer curves share the first issuer's knot times.
    ///
    /// # Errors
    ///
    /// Returns `CurveError::MismatchedTenors` naming the first issuer
    /// whose knots differ.
    pub fn validate_tenors(&self) -> Result<(), CurveError> {
        let reference = self.curves[0].times();
        for (i, curve) in self.curves.iter().enumerate().skip(1) {
            let times = curve.times();
            let matches = times.len() == reference.len()
                && times
                    .iter()
                    .zip(reference.iter())
                    .all(|(a, b)| (a - b).abs() < 1e-10);
            if !matches {
                return Err(CurveError::MismatchedTenors { issuer: i });
            }
        }
        Ok(())
    }

    /// Issuer curves.
    pub fn curves(&self) -> &[SurvivalCurve] {
        &self.curves
    }

    /// Mutable issuer curves, for in-place calibration adjustments.
    pub fn curves_mut(&mut self) -> &mut [SurvivalCurve] {
        &mut self.curves
    }

    /// Number of issuers.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// Always false: construction rejects empty pools.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Survival probabilities of every issuer at time `t`.
    pub fn survival_probabilities(&self, t: f64) -> Vec<f64> {
        self.curves
            .iter()
            .map(|c| c.survival_probability(t))
            .collect()
    }

    /// Recovery rates of every issuer.
    pub fn recovery_rates(&self) -> Vec<f64> {
        self.curves.iter().map(|c| c.recovery_rate()).collect()
    }
}
