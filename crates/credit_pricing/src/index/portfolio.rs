//! Intrinsic index statistics over an issuer pool.

use credit_core::market_data::curves::IssuerPool;

use crate::cds::CdsContract;
use crate::error::PricingError;
use crate::schedule::PaymentFrequency;

/// Equal-weighted CDS index view of an issuer pool.
///
/// The intrinsic value of an index contract is the average of the
/// corresponding single-name contracts over the constituents. Spread
/// statistics treat each constituent's par spread individually.
#[derive(Debug, Clone, Copy)]
pub struct CdsIndexPortfolio {
    frequency: PaymentFrequency,
}

impl CdsIndexPortfolio {
    /// Create an index view with the given premium frequency.
    pub fn new(frequency: PaymentFrequency) -> Self {
        Self { frequency }
    }

    /// Premium payment frequency.
    pub fn frequency(&self) -> PaymentFrequency {
        self.frequency
    }

    /// Average risky PV01 of the constituents to `maturity`.
    pub fn intrinsic_rpv01(&self, pool: &IssuerPool, maturity: f64) -> Result<f64, PricingError> {
        let contract = CdsContract::new(maturity, 0.0, self.frequency)?;
        let total: f64 = pool
            .curves()
            .iter()
            .map(|curve| contract.risky_pv01(curve).clean)
            .sum();
        Ok(total / pool.len() as f64)
    }

    /// Average protection leg PV of the constituents to `maturity`.
    pub fn intrinsic_protection_leg_pv(
        &self,
        pool: &IssuerPool,
        maturity: f64,
    ) -> Result<f64, PricingError> {
        let contract = CdsContract::new(maturity, 0.0, self.frequency)?;
        let total: f64 = pool
            .curves()
            .iter()
            .map(|curve| contract.protection_leg_pv(curve))
            .sum();
        Ok(total / pool.len() as f64)
    }

    /// Intrinsic index spread: average protection over average annuity.
    ///
    /// This is the breakeven coupon of the index contract, which is not
    /// the average of the constituent par spreads: wide names carry
    /// shorter annuities, so the intrinsic spread sits below the
    /// arithmetic average in a dispersed pool.
    pub fn intrinsic_spread(&self, pool: &IssuerPool, maturity: f64) -> Result<f64, PricingError> {
        let rpv01 = self.intrinsic_rpv01(pool, maturity)?;
        if rpv01 <= 0.0 {
            return Err(PricingError::ZeroRiskyAnnuity { maturity });
        }
        Ok(self.intrinsic_protection_leg_pv(pool, maturity)? / rpv01)
    }

    /// Arithmetic average of the constituent par spreads.
    pub fn average_spread(&self, pool: &IssuerPool, maturity: f64) -> Result<f64, PricingError> {
        let spreads = self.par_spreads(pool, maturity)?;
        Ok(spreads.iter().sum::<f64>() / spreads.len() as f64)
    }

    /// Sum of the constituent par spreads.
    pub fn total_spread(&self, pool: &IssuerPool, maturity: f64) -> Result<f64, PricingError> {
        Ok(self.par_spreads(pool, maturity)?.iter().sum())
    }

    /// Lowest constituent par spread.
    pub fn min_spread(&self, pool: &IssuerPool, maturity: f64) -> Result<f64, PricingError> {
        let spreads = self.par_spreads(pool, maturity)?;
        Ok(spreads.iter().copied().fold(f64::INFINITY, f64::min))
    }

    /// Highest constituent par spread.
    pub fn max_spread(&self, pool: &IssuerPool, maturity: f64) -> Result<f64, PricingError> {
        let spreads = self.par_spreads(pool, maturity)?;
        Ok(spreads.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    fn par_spreads(&self, pool: &IssuerPool, maturity: f64) -> Result<Vec<f64>, PricingError> {
        let contract = CdsContract::new(maturity, 0.0, self.frequency)?;
        pool.curves()
            .iter()
            .map(|curve| contract.par_spread(curve))
            .collect()
    }
}
