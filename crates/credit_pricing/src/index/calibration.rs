//! Index basis calibration.
//!
//! A traded index rarely reprices from its constituents' curves: the
//! basis between the index quote and the intrinsic value must be pushed
//! into the issuer curves before tranches are priced. Two strategies are
//! provided, both driving the ratio of market to intrinsic index value to
//! one with a bounded fixed-point iteration:
//!
//! - **Spread adjustment**: scale every issuer's quoted spread at the
//!   target tenor by a common multiplier and re-bootstrap the curves from
//!   scratch each step
//! - **Hazard adjustment**: work on value copies of the curves and
//!   reshape the survival knot at the target tenor directly, leaving the
//!   quotes untouched

use std::sync::Arc;

use credit_core::market_data::curves::{CdsQuote, IssuerPool, SurvivalCurve};
use credit_core::market_data::CurveError;
use credit_core::math::solvers::{SolverConfig, UnityFixedPoint};
use credit_core::types::SolverError;
use tracing::{debug, info};

use crate::bootstrap::CdsCurveBuilder;
use crate::cds::CdsContract;
use crate::error::CalibrationError;
use crate::schedule::PaymentFrequency;

/// Iteration cap for the spread adjustment strategy.
const SPREAD_ITERATION_CAP: usize = 20;

/// Iteration cap for the hazard adjustment strategy.
const HAZARD_ITERATION_CAP: usize = 100;

/// Tenor matching tolerance in years.
const TENOR_EPS: f64 = 1e-8;

/// One index quote the constituent curves must reprice.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexCalibrationTarget {
    /// Index contract maturity in years.
    pub maturity: f64,
    /// Index running coupon per annum.
    pub coupon: f64,
    /// Upfront value to the protection buyer per unit notional.
    pub upfront: f64,
}

impl IndexCalibrationTarget {
    /// A target quoted with an explicit coupon and upfront.
    pub fn new(maturity: f64, coupon: f64, upfront: f64) -> Self {
        Self {
            maturity,
            coupon,
            upfront,
        }
    }

    /// A par quote: the coupon is the breakeven spread, zero upfront.
    pub fn par(maturity: f64, spread: f64) -> Self {
        Self {
            maturity,
            coupon: spread,
            upfront: 0.0,
        }
    }
}

/// Calibrates issuer curves to index quotes.
#[derive(Debug, Clone)]
pub struct IndexCalibrator {
    frequency: PaymentFrequency,
    tolerance: f64,
}

impl IndexCalibrator {
    /// Create a calibrator with the default convergence tolerance of
    /// 1e-6 on the market-to-intrinsic ratio.
    pub fn new(frequency: PaymentFrequency) -> Self {
        Self {
            frequency,
            tolerance: 1e-6,
        }
    }

    /// Create a calibrator with an explicit convergence tolerance.
    pub fn with_tolerance(frequency: PaymentFrequency, tolerance: f64) -> Self {
        Self {
            frequency,
            tolerance,
        }
    }

    /// Calibrate by scaling quoted spreads and re-bootstrapping.
    ///
    /// Each target tenor gets one spread multiplier shared by all
    /// issuers. Buckets are processed shortest maturity first; within a
    /// bucket every step re-bootstraps all issuer curves from the scaled
    /// quotes, reprices the index and scales the multiplier by the ratio
    /// of market to intrinsic value. The original pool is never mutated.
    ///
    /// # Errors
    ///
    /// * `CalibrationError::TargetsNotIncreasing` if target maturities
    ///   are not strictly increasing
    /// * `CalibrationError::BucketTenorMismatch` if a target maturity
    ///   does not match a quoted tenor
    /// * `CalibrationError::IterationLimitExceeded` if a bucket fails to
    ///   converge within 20 iterations; partial convergence is never
    ///   accepted
    /// * curve and pricing failures from the re-bootstrap
    pub fn spread_adjust_intrinsic(
        &self,
        pool: &IssuerPool,
        targets: &[IndexCalibrationTarget],
    ) -> Result<IssuerPool, CalibrationError> {
        validate_target_order(targets)?;
        let reference = quote_maturities_checked(pool)?;
        let mut multipliers = vec![1.0_f64; reference.len()];

        for (bucket, target) in targets.iter().enumerate() {
            let idx = match_tenor(&reference, target.maturity)
                .ok_or(CalibrationError::BucketTenorMismatch {
                    bucket,
                    maturity: target.maturity,
                })?;

            let solver =
                UnityFixedPoint::new(SolverConfig::new(self.tolerance, SPREAD_ITERATION_CAP));
            let outcome = solver
                .solve(|iteration| -> Result<f64, CalibrationError> {
                    let adjusted = self.bootstrap_adjusted(pool, &multipliers)?;
                    let (protection, rpv01) = self.index_legs(&adjusted, target.maturity)?;
                    let alpha = (target.upfront + target.coupon * rpv01) / protection;
                    multipliers[idx] *= alpha;
                    debug!(bucket, iteration, alpha, "spread adjustment step");
                    Ok(alpha)
                })
                .map_err(|e| retag_bucket(e, bucket))?;
            info!(
                bucket,
                maturity = target.maturity,
                multiplier = multipliers[idx],
                iterations = outcome.iterations,
                "spread bucket calibrated"
            );
        }

        self.bootstrap_adjusted(pool, &multipliers)
    }

    /// Calibrate by reshaping survival knots on value copies.
    ///
    /// Works entirely on deep copies of the issuer curves: each step
    /// reprices the index and bends the survival knot at the target tenor
    /// by raising the forward survival ratio to the power of the
    /// market-to-intrinsic ratio,
    ///
    /// ```text
    /// q2' = q1 * (q2 / q1)^alpha
    /// ```
    ///
    /// where `q1` is the previous knot (1 at the first knot). Quotes are
    /// untouched and no re-bootstrap happens, which makes this strategy
    /// much cheaper per step at the cost of leaving the curves
    /// inconsistent with their own quotes.
    ///
    /// # Errors
    ///
    /// * `CalibrationError::TargetsNotIncreasing` if target maturities
    ///   are not strictly increasing
    /// * `CalibrationError::BucketTenorMismatch` if a target maturity
    ///   does not match a curve knot
    /// * `CalibrationError::IterationLimitExceeded` if a bucket fails to
    ///   converge within 100 iterations
    /// * `CalibrationError::Curve` if an adjustment pushes a knot out of
    ///   `(0, 1]`
    pub fn hazard_rate_adjust_intrinsic(
        &self,
        pool: &IssuerPool,
        targets: &[IndexCalibrationTarget],
    ) -> Result<IssuerPool, CalibrationError> {
        validate_target_order(targets)?;
        pool.validate_tenors()?;
        let mut adjusted = pool.clone();
        let knot_times = adjusted.curves()[0].times().to_vec();

        for (bucket, target) in targets.iter().enumerate() {
            let idx = match_tenor(&knot_times, target.maturity)
                .ok_or(CalibrationError::BucketTenorMismatch {
                    bucket,
                    maturity: target.maturity,
                })?;

            let solver =
                UnityFixedPoint::new(SolverConfig::new(self.tolerance, HAZARD_ITERATION_CAP));
            let outcome = solver
                .solve(|iteration| -> Result<f64, CalibrationError> {
                    let (protection, rpv01) = self.index_legs(&adjusted, target.maturity)?;
                    let alpha = (target.upfront + target.coupon * rpv01) / protection;

                    for curve in adjusted.curves_mut() {
                        let q1 = if idx == 0 { 1.0 } else { curve.value(idx - 1) };
                        let q2 = curve.value(idx);
                        curve.set_value(idx, q1 * (q2 / q1).powf(alpha))?;
                    }
                    debug!(bucket, iteration, alpha, "hazard adjustment step");
                    Ok(alpha)
                })
                .map_err(|e| retag_bucket(e, bucket))?;
            info!(
                bucket,
                maturity = target.maturity,
                iterations = outcome.iterations,
                "hazard bucket calibrated"
            );
        }

        Ok(adjusted)
    }

    /// Re-bootstrap every issuer from spread-scaled quotes.
    fn bootstrap_adjusted(
        &self,
        pool: &IssuerPool,
        multipliers: &[f64],
    ) -> Result<IssuerPool, CalibrationError> {
        let builder = CdsCurveBuilder::new(self.frequency);
        let curves = pool
            .curves()
            .iter()
            .map(|curve| {
                let scaled: Vec<CdsQuote> = curve
                    .quotes()
                    .iter()
                    .zip(multipliers.iter())
                    .map(|(q, &m)| CdsQuote::new(q.maturity, q.spread * m))
                    .collect();
                builder.build(&scaled, curve.recovery_rate(), Arc::clone(curve.discount()))
            })
            .collect::<Result<Vec<SurvivalCurve>, _>>()?;
        Ok(IssuerPool::new(curves)?)
    }

    /// Average protection leg and risky annuity of the index.
    fn index_legs(
        &self,
        pool: &IssuerPool,
        maturity: f64,
    ) -> Result<(f64, f64), CalibrationError> {
        let contract = CdsContract::new(maturity, 0.0, self.frequency)?;
        let mut protection = 0.0;
        let mut rpv01 = 0.0;
        for curve in pool.curves() {
            protection += contract.protection_leg_pv(curve);
            rpv01 += contract.risky_pv01(curve).clean;
        }
        let n = pool.len() as f64;
        protection /= n;
        rpv01 /= n;
        if protection <= 0.0 {
            return Err(SolverError::NumericalInstability(
                "intrinsic protection leg is zero".into(),
            )
            .into());
        }
        Ok((protection, rpv01))
    }
}

/// Buckets are processed shortest first and later buckets must not
/// disturb earlier ones, so target maturities have to rise strictly.
fn validate_target_order(targets: &[IndexCalibrationTarget]) -> Result<(), CalibrationError> {
    for (i, pair) in targets.windows(2).enumerate() {
        if pair[1].maturity <= pair[0].maturity {
            return Err(CalibrationError::TargetsNotIncreasing { bucket: i + 1 });
        }
    }
    Ok(())
}

/// Quote maturities of issuer 0, after checking all issuers agree.
fn quote_maturities_checked(pool: &IssuerPool) -> Result<Vec<f64>, CalibrationError> {
    let reference: Vec<f64> = pool.curves()[0].quotes().iter().map(|q| q.maturity).collect();
    if reference.is_empty() {
        return Err(CalibrationError::Curve(CurveError::LengthMismatch {
            times: 0,
            values: 0,
        }));
    }
    for (i, curve) in pool.curves().iter().enumerate().skip(1) {
        let maturities: Vec<f64> = curve.quotes().iter().map(|q| q.maturity).collect();
        let matches = maturities.len() == reference.len()
            && maturities
                .iter()
                .zip(reference.iter())
                .all(|(a, b)| (a - b).abs() < TENOR_EPS);
        if !matches {
            return Err(CalibrationError::Curve(CurveError::MismatchedTenors {
                issuer: i,
            }));
        }
    }
    Ok(reference)
}

fn match_tenor(tenors: &[f64], maturity: f64) -> Option<usize> {
    tenors.iter().position(|&t| (t - maturity).abs() < TENOR_EPS)
}

fn retag_bucket(err: CalibrationError, bucket: usize) -> CalibrationError {
    match err {
        CalibrationError::IterationLimitExceeded { iterations, .. } => {
            CalibrationError::IterationLimitExceeded { bucket, iterations }
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use credit_core::market_data::curves::{DiscountCurve, FlatDiscountCurve};

    fn discount() -> Arc<dyn DiscountCurve + Send + Sync> {
        Arc::new(FlatDiscountCurve::new(0.02))
    }

    fn bootstrapped_pool(spreads: &[f64]) -> IssuerPool {
        let builder = CdsCurveBuilder::new(PaymentFrequency::Quarterly);
        let curves = spreads
            .iter()
            .map(|&s| {
                let quotes = vec![
                    CdsQuote::new(3.0, s * 0.9),
                    CdsQuote::new(5.0, s),
                    CdsQuote::new(7.0, s * 1.05),
                ];
                builder.build(&quotes, 0.4, discount()).unwrap()
            })
            .collect();
        IssuerPool::new(curves).unwrap()
    }

    #[test]
    fn test_bucket_tenor_mismatch() {
        let pool = bootstrapped_pool(&[0.01, 0.02]);
        let calibrator = IndexCalibrator::new(PaymentFrequency::Quarterly);
        let targets = [IndexCalibrationTarget::par(4.0, 0.015)];

        let result = calibrator.spread_adjust_intrinsic(&pool, &targets);
        assert!(matches!(
            result,
            Err(CalibrationError::BucketTenorMismatch { bucket: 0, .. })
        ));

        let result = calibrator.hazard_rate_adjust_intrinsic(&pool, &targets);
        assert!(matches!(
            result,
            Err(CalibrationError::BucketTenorMismatch { bucket: 0, .. })
        ));
    }

    #[test]
    fn test_spread_adjust_hits_par_target() {
        let pool = bootstrapped_pool(&[0.008, 0.012, 0.02]);
        let index = crate::index::CdsIndexPortfolio::new(PaymentFrequency::Quarterly);
        let intrinsic = index.intrinsic_spread(&pool, 5.0).unwrap();

        // Ask for an index 20% wider than intrinsic.
        let target_spread = intrinsic * 1.2;
        let calibrator = IndexCalibrator::with_tolerance(PaymentFrequency::Quarterly, 1e-10);
        let adjusted = calibrator
            .spread_adjust_intrinsic(&pool, &[IndexCalibrationTarget::par(5.0, target_spread)])
            .unwrap();

        let achieved = index.intrinsic_spread(&adjusted, 5.0).unwrap();
        assert!(
            (achieved - target_spread).abs() < 1e-8,
            "achieved {achieved} vs target {target_spread}"
        );
        // The input pool is untouched.
        let untouched = index.intrinsic_spread(&pool, 5.0).unwrap();
        assert!((untouched - intrinsic).abs() < 1e-15);
    }

    #[test]
    fn test_hazard_adjust_hits_par_target() {
        let pool = bootstrapped_pool(&[0.008, 0.012, 0.02]);
        let index = crate::index::CdsIndexPortfolio::new(PaymentFrequency::Quarterly);
        let intrinsic = index.intrinsic_spread(&pool, 5.0).unwrap();

        let target_spread = intrinsic * 0.85;
        let calibrator = IndexCalibrator::with_tolerance(PaymentFrequency::Quarterly, 1e-10);
        let adjusted = calibrator
            .hazard_rate_adjust_intrinsic(&pool, &[IndexCalibrationTarget::par(5.0, target_spread)])
            .unwrap();

        let achieved = index.intrinsic_spread(&adjusted, 5.0).unwrap();
        assert!(
            (achieved - target_spread).abs() < 1e-8,
            "achieved {achieved} vs target {target_spread}"
        );
    }

    #[test]
    fn test_unordered_targets_rejected() {
        let pool = bootstrapped_pool(&[0.01, 0.02]);
        let calibrator = IndexCalibrator::new(PaymentFrequency::Quarterly);
        let targets = [
            IndexCalibrationTarget::par(5.0, 0.02),
            IndexCalibrationTarget::par(3.0, 0.015),
        ];
        assert!(matches!(
            calibrator.spread_adjust_intrinsic(&pool, &targets),
            Err(CalibrationError::TargetsNotIncreasing { bucket: 1 })
        ));
        assert!(matches!(
            calibrator.hazard_rate_adjust_intrinsic(&pool, &targets),
            Err(CalibrationError::TargetsNotIncreasing { bucket: 1 })
        ));
        // Duplicate maturities are just as unordered.
        let targets = [
            IndexCalibrationTarget::par(5.0, 0.02),
            IndexCalibrationTarget::par(5.0, 0.021),
        ];
        assert!(matches!(
            calibrator.spread_adjust_intrinsic(&pool, &targets),
            Err(CalibrationError::TargetsNotIncreasing { bucket: 1 })
        ));
    }

    #[test]
    fn test_iteration_cap_is_fatal() {
        let pool = bootstrapped_pool(&[0.01, 0.02]);
        // A tolerance no floating-point iteration can meet.
        let calibrator = IndexCalibrator::with_tolerance(PaymentFrequency::Quarterly, 1e-300);
        let targets = [IndexCalibrationTarget::par(5.0, 0.02)];
        let result = calibrator.spread_adjust_intrinsic(&pool, &targets);
        assert!(matches!(
            result,
            Err(CalibrationError::IterationLimitExceeded {
                bucket: 0,
                iterations: 20,
            })
        ));
    }
}
