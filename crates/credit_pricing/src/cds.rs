//! Single-name credit default swap pricing.

use credit_core::market_data::curves::SurvivalCurve;

use crate::error::PricingError;
use crate::schedule::{premium_schedule, AccrualPeriod, PaymentFrequency};

/// Integration steps per year for the protection leg.
pub(crate) const PROTECTION_STEPS_PER_YEAR: f64 = 25.0;

/// Risky annuity of a premium leg, clean and dirty.
///
/// `clean` is the accrual-weighted discounted survival; `dirty` adds the
/// half-period accrued premium paid on default.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RiskyPv01 {
    /// Annuity excluding accrued-on-default.
    pub clean: f64,
    /// Annuity including half-period accrued-on-default.
    pub dirty: f64,
}

/// A credit default swap, priced off a survival curve.
///
/// Legs are quoted per unit notional from the protection buyer's side;
/// `value` scales by the contract notional. The premium leg is the clean
/// risky annuity: accrual-weighted discounted survival, with the average
/// of period-start and period-end survival standing in for mid-period
/// default timing.
#[derive(Debug, Clone)]
pub struct CdsContract {
    maturity: f64,
    coupon: f64,
    frequency: PaymentFrequency,
    notional: f64,
    schedule: Vec<AccrualPeriod>,
}

impl CdsContract {
    /// Create a contract.
    ///
    /// # Arguments
    ///
    /// * `maturity` - Contract maturity in years, positive
    /// * `coupon` - Running premium per annum, decimal
    /// * `frequency` - Premium payment frequency
    ///
    /// # Errors
    ///
    /// Returns `PricingError::InvalidMaturity` if `maturity <= 0`.
    pub fn new(
        maturity: f64,
        coupon: f64,
        frequency: PaymentFrequency,
    ) -> Result<Self, PricingError> {
        let schedule = premium_schedule(maturity, frequency)?;
        Ok(Self {
            maturity,
            coupon,
            frequency,
            notional: 1.0,
            schedule,
        })
    }

    /// Set the contract notional (defaults to 1).
    pub fn with_notional(mut self, notional: f64) -> Self {
        self.notional = notional;
        self
    }

    /// Contract maturity in years.
    pub fn maturity(&self) -> f64 {
        self.maturity
    }

    /// Running premium per annum.
    pub fn coupon(&self) -> f64 {
        self.coupon
    }

    /// Premium payment frequency.
    pub fn frequency(&self) -> PaymentFrequency {
        self.frequency
    }

    /// Contract notional.
    pub fn notional(&self) -> f64 {
        self.notional
    }

    /// Risky PV01: present value of a unit running premium.
    ///
    /// ```text
    /// clean = sum_i delta_i * df(t_i) * (Q(t_{i-1}) + Q(t_i)) / 2
    /// dirty = clean + sum_i (delta_i / 2) * df(t_i) * (Q(t_{i-1}) - Q(t_i))
    /// ```
    ///
    /// The dirty annuity pays half a period of accrued premium on
    /// default, discounted at the period end.
    pub fn risky_pv01(&self, curve: &SurvivalCurve) -> RiskyPv01 {
        let discount = curve.discount();
        let mut clean = 0.0;
        let mut accrued = 0.0;
        for period in &self.schedule {
            let q_start = curve.survival_probability(period.start);
            let q_end = curve.survival_probability(period.end);
            let df = discount.df(period.end);
            clean += period.accrual * df * 0.5 * (q_start + q_end);
            accrued += 0.5 * period.accrual * df * (q_start - q_end);
        }
        RiskyPv01 {
            clean,
            dirty: clean + accrued,
        }
    }

    /// Present value of the protection leg per unit notional.
    ///
    /// Integrates `(1 - R) df(t) dQ(t)` on a fine grid, discounting each
    /// default increment at the interval midpoint.
    pub fn protection_leg_pv(&self, curve: &SurvivalCurve) -> f64 {
        let discount = curve.discount();
        let lgd = 1.0 - curve.recovery_rate();

        let steps = (PROTECTION_STEPS_PER_YEAR * self.maturity).ceil().max(1.0) as usize;
        let dt = self.maturity / steps as f64;

        let mut pv = 0.0;
        let mut q_prev = 1.0;
        for s in 1..=steps {
            let t = s as f64 * dt;
            let q = curve.survival_probability(t);
            pv += discount.df(t - 0.5 * dt) * (q_prev - q);
            q_prev = q;
        }
        lgd * pv
    }

    /// Breakeven running spread: protection leg over risky annuity.
    ///
    /// # Errors
    ///
    /// Returns `PricingError::ZeroRiskyAnnuity` if the annuity vanishes.
    pub fn par_spread(&self, curve: &SurvivalCurve) -> Result<f64, PricingError> {
        let rpv01 = self.risky_pv01(curve).clean;
        if rpv01 <= 0.0 {
            return Err(PricingError::ZeroRiskyAnnuity {
                maturity: self.maturity,
            });
        }
        Ok(self.protection_leg_pv(curve) / rpv01)
    }

    /// Mark-to-market to the protection buyer.
    pub fn value(&self, curve: &SurvivalCurve) -> f64 {
        self.notional * (self.protection_leg_pv(curve) - self.coupon * self.risky_pv01(curve).clean)
    }
}
