//! Synthetic CDO tranche valuation.

use credit_core::market_data::curves::IssuerPool;
use credit_core::math::interpolators::flat_forward;
use credit_models::loss::{tranche_survival_probability, LossModel};
use tracing::debug;

use crate::cds::PROTECTION_STEPS_PER_YEAR;
use crate::error::PricingError;
use crate::schedule::{premium_schedule, PaymentFrequency};

/// Tranche survival probabilities are floored here before log-linear
/// interpolation of the protection grid.
const MIN_TRANCHE_SURVIVAL: f64 = 1e-16;

/// Tranches narrower than this value to the all-zero result.
const ZERO_WIDTH_FLOOR: f64 = 1e-8;

/// A synthetic CDO tranche on an issuer pool.
///
/// Attachment and detachment are fractions of total portfolio notional.
/// Legs and spreads are quoted per unit of tranche notional; `value`
/// scales by the tranche notional and carries the sign of the position.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CdsTranche {
    /// Attachment point `k1`, fraction of portfolio notional.
    pub attachment: f64,
    /// Detachment point `k2`, fraction of portfolio notional.
    pub detachment: f64,
    /// Contract maturity in years.
    pub maturity: f64,
    /// Upfront payment per unit tranche notional, paid by the buyer.
    pub upfront: f64,
    /// Running premium per annum on the tranche notional.
    pub coupon: f64,
    /// Tranche notional.
    pub notional: f64,
    /// Premium payment frequency.
    pub frequency: PaymentFrequency,
    /// True when the position is bought protection.
    pub long_protection: bool,
}

/// Valuation of a tranche contract.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrancheValuation {
    /// Present value of the protection leg per unit tranche notional.
    pub protection_leg_pv: f64,
    /// Present value of the running premium leg per unit tranche notional.
    pub premium_leg_pv: f64,
    /// Clean risky annuity of the tranche premium leg.
    pub rpv01: f64,
    /// Breakeven running spread.
    pub par_spread: f64,
    /// Mark-to-market of the position, scaled by notional and signed.
    pub value: f64,
}

impl TrancheValuation {
    fn zero() -> Self {
        Self {
            protection_leg_pv: 0.0,
            premium_leg_pv: 0.0,
            rpv01: 0.0,
            par_spread: 0.0,
            value: 0.0,
        }
    }
}

impl CdsTranche {
    /// Value the tranche under a loss model.
    ///
    /// The tranche survival curve is built at the premium payment dates
    /// by calling the loss model twice per date (once per equity tranche
    /// boundary), then both legs are priced off that curve: the premium
    /// leg by accrual-weighted discounted survival, the protection leg by
    /// fine-grid integration of the tranche loss increments with unit
    /// loss given default.
    ///
    /// # Errors
    ///
    /// * `PricingError::InvalidAttachment` for points outside
    ///   `0 <= k1 <= k2 <= 1`
    /// * `PricingError::NonMonotonicSurvivalCurve` if a later payment
    ///   date shows a higher tranche survival probability than an earlier
    ///   one; this is fatal and never clamped
    /// * `PricingError::Model` for loss model input failures
    ///
    /// A tranche narrower than 1e-8 is degenerate and values to an
    /// all-zero result rather than an error.
    pub fn value(
        &self,
        pool: &IssuerPool,
        loadings: &[f64],
        model: LossModel,
        num_points: usize,
    ) -> Result<TrancheValuation, PricingError> {
        self.value_with_skew(pool, loadings, loadings, model, num_points)
    }

    /// Value the tranche from scalar correlations at each boundary.
    ///
    /// Correlations are converted to factor loadings as `sqrt(corr)`,
    /// uniform across the pool. Pass the same correlation twice for a
    /// flat structure.
    pub fn value_with_correlations(
        &self,
        pool: &IssuerPool,
        attach_correlation: f64,
        detach_correlation: f64,
        model: LossModel,
        num_points: usize,
    ) -> Result<TrancheValuation, PricingError> {
        let attach = vec![attach_correlation.sqrt(); pool.len()];
        let detach = vec![detach_correlation.sqrt(); pool.len()];
        self.value_with_skew(pool, &attach, &detach, model, num_points)
    }

    /// Value the tranche with distinct factor loadings at each boundary.
    ///
    /// Base-correlation pricing quotes a separate correlation for the
    /// attachment and detachment equity tranches; the caller passes the
    /// square roots of those correlations as per-issuer loading slices.
    /// `value` is the special case where both slices coincide.
    pub fn value_with_skew(
        &self,
        pool: &IssuerPool,
        attach_loadings: &[f64],
        detach_loadings: &[f64],
        model: LossModel,
        num_points: usize,
    ) -> Result<TrancheValuation, PricingError> {
        let k1 = self.attachment;
        let k2 = self.detachment;

        if !(0.0..=1.0).contains(&k1) || !(0.0..=1.0).contains(&k2) || k1 > k2 {
            return Err(PricingError::InvalidAttachment { k1, k2 });
        }
        if (k2 - k1).abs() < ZERO_WIDTH_FLOOR {
            return Ok(TrancheValuation::zero());
        }
        let kappa = k2 / (k2 - k1);

        let schedule = premium_schedule(self.maturity, self.frequency)?;
        let recovery_rates = pool.recovery_rates();

        // Tranche survival curve at the payment dates, assembled from the
        // two boundary equity tranches:
        //   Q_tr = kappa * q(0, k2) + (1 - kappa) * q(0, k1)
        let mut pay_times = Vec::with_capacity(schedule.len());
        let mut tranche_survival = Vec::with_capacity(schedule.len());
        let mut q_attach_prev = 1.0;
        let mut q_detach_prev = 1.0;
        let mut q_prev = 1.0;
        for period in &schedule {
            let survival_probs = pool.survival_probabilities(period.end);
            let q_attach = tranche_survival_probability(
                model,
                0.0,
                k1,
                &survival_probs,
                &recovery_rates,
                attach_loadings,
                num_points,
            )?;
            let q_detach = tranche_survival_probability(
                model,
                0.0,
                k2,
                &survival_probs,
                &recovery_rates,
                detach_loadings,
                num_points,
            )?;
            // Each boundary sequence must be non-increasing on its own;
            // the kappa weights have opposite signs, so a rising boundary
            // could otherwise hide inside a falling combination.
            if q_attach > q_attach_prev + 1e-10 || q_detach > q_detach_prev + 1e-10 {
                return Err(PricingError::NonMonotonicSurvivalCurve { time: period.end });
            }
            let q = kappa * q_detach + (1.0 - kappa) * q_attach;
            if q > q_prev + 1e-10 {
                return Err(PricingError::NonMonotonicSurvivalCurve { time: period.end });
            }
            pay_times.push(period.end);
            tranche_survival.push(q);
            q_attach_prev = q_attach;
            q_detach_prev = q_detach;
            q_prev = q;
        }

        let discount = pool.curves()[0].discount();

        // Premium leg.
        let mut rpv01 = 0.0;
        let mut q_start = 1.0;
        for (period, &q_end) in schedule.iter().zip(tranche_survival.iter()) {
            rpv01 += period.accrual * discount.df(period.end) * 0.5 * (q_start + q_end);
            q_start = q_end;
        }

        // Protection leg: unit loss given default on the tranche notional.
        let floored: Vec<f64> = tranche_survival
            .iter()
            .map(|&q| q.max(MIN_TRANCHE_SURVIVAL))
            .collect();
        let steps = (PROTECTION_STEPS_PER_YEAR * self.maturity).ceil().max(1.0) as usize;
        let dt = self.maturity / steps as f64;
        let mut protection = 0.0;
        let mut q_grid_prev = 1.0;
        for s in 1..=steps {
            let t = s as f64 * dt;
            let q = flat_forward(&pay_times, &floored, t);
            protection += discount.df(t - 0.5 * dt) * (q_grid_prev - q);
            q_grid_prev = q;
        }

        if rpv01 <= 0.0 {
            return Err(PricingError::ZeroRiskyAnnuity {
                maturity: self.maturity,
            });
        }
        let par_spread = protection / rpv01;
        let premium_leg_pv = self.coupon * rpv01;
        let sign = if self.long_protection { 1.0 } else { -1.0 };
        let value = sign * self.notional * (protection - self.upfront - premium_leg_pv);
        debug!(
            k1,
            k2,
            par_spread,
            protection_leg_pv = protection,
            rpv01,
            "valued tranche"
        );

        Ok(TrancheValuation {
            protection_leg_pv: protection,
            premium_leg_pv,
            rpv01,
            par_spread,
            value,
        })
    }
}
