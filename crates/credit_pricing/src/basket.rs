//! Nth-to-default basket pricing.

use credit_core::market_data::curves::IssuerPool;
use credit_models::loss::default_count_distribution;

use crate::error::PricingError;
use crate::schedule::{premium_schedule, PaymentFrequency};

/// An nth-to-default basket swap on an issuer pool.
///
/// The contract pays protection on the nth credit event in the basket
/// and its premium leg runs while fewer than `order` defaults have
/// occurred. Survival of the contract is read off the unconditional
/// default count distribution at each payment date.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NthToDefaultBasket {
    /// Which default triggers the contract (1 = first-to-default).
    pub order: usize,
    /// Contract maturity in years.
    pub maturity: f64,
    /// Running premium per annum.
    pub coupon: f64,
    /// Contract notional.
    pub notional: f64,
    /// Premium payment frequency.
    pub frequency: PaymentFrequency,
    /// True when the position is bought protection.
    pub long_protection: bool,
}

/// Valuation of a basket contract.
///
/// Legs and spreads are per unit notional; `value` is scaled by the
/// contract notional and signed by the position side.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BasketValuation {
    /// Present value of the protection leg.
    pub protection_leg_pv: f64,
    /// Clean risky annuity of the premium leg.
    pub rpv01: f64,
    /// Breakeven running spread.
    pub par_spread: f64,
    /// Mark-to-market of the position.
    pub value: f64,
}

impl NthToDefaultBasket {
    /// Value the basket under the one-factor Gaussian copula.
    ///
    /// The loss on trigger is `1 - R` with `R` the average pool recovery,
    /// which is exact for homogeneous recoveries and the usual
    /// approximation otherwise.
    ///
    /// # Errors
    ///
    /// * `PricingError::InvalidBasketOrder` if `order` is zero or larger
    ///   than the pool
    /// * `PricingError::Model` for loss model input failures
    pub fn value(
        &self,
        pool: &IssuerPool,
        loadings: &[f64],
        num_points: usize,
    ) -> Result<BasketValuation, PricingError> {
        if self.order == 0 || self.order > pool.len() {
            return Err(PricingError::InvalidBasketOrder {
                order: self.order,
                issuers: pool.len(),
            });
        }

        let schedule = premium_schedule(self.maturity, self.frequency)?;
        let discount = pool.curves()[0].discount();
        let recoveries = pool.recovery_rates();
        let lgd = 1.0 - recoveries.iter().sum::<f64>() / recoveries.len() as f64;

        let mut rpv01 = 0.0;
        let mut protection = 0.0;
        let mut q_prev = 1.0;
        for period in &schedule {
            let survival_probs = pool.survival_probabilities(period.end);
            let dbn = default_count_distribution(&survival_probs, loadings, num_points)?;
            // Contract alive while fewer than `order` defaults occurred.
            let q: f64 = dbn.iter().take(self.order).sum();

            rpv01 += period.accrual * discount.df(period.end) * 0.5 * (q_prev + q);
            protection +=
                discount.df(0.5 * (period.start + period.end)) * (q_prev - q) * lgd;
            q_prev = q;
        }

        if rpv01 <= 0.0 {
            return Err(PricingError::ZeroRiskyAnnuity {
                maturity: self.maturity,
            });
        }
        let par_spread = protection / rpv01;
        let sign = if self.long_protection { 1.0 } else { -1.0 };
        Ok(BasketValuation {
            protection_leg_pv: protection,
            rpv01,
            par_spread,
            value: sign * self.notional * (protection - self.coupon * rpv01),
        })
    }
}
