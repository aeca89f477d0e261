//! Premium payment schedules.

use crate::error::PricingError;

/// Premium payment frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PaymentFrequency {
    /// One payment per year.
    Annual,
    /// Two payments per year.
    SemiAnnual,
    /// Four payments per year (the CDS market standard).
    Quarterly,
    /// Twelve payments per year.
    Monthly,
}

impl PaymentFrequency {
    /// Number of payments per year.
    pub fn periods_per_year(self) -> f64 {
        match self {
            PaymentFrequency::Annual => 1.0,
            PaymentFrequency::SemiAnnual => 2.0,
            PaymentFrequency::Quarterly => 4.0,
            PaymentFrequency::Monthly => 12.0,
        }
    }
}

/// One premium accrual period.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccrualPeriod {
    /// Period start time in years.
    pub start: f64,
    /// Payment time in years.
    pub end: f64,
    /// Year fraction of the period.
    pub accrual: f64,
}

/// Build the premium schedule for a contract of the given maturity.
///
/// Periods are regular from time zero; a short final stub is appended
/// when the maturity is not a whole number of periods.
///
/// # Errors
///
/// Returns `PricingError::InvalidMaturity` if `maturity <= 0`.
pub fn premium_schedule(
    maturity: f64,
    frequency: PaymentFrequency,
) -> Result<Vec<AccrualPeriod>, PricingError> {
    if !(maturity > 0.0) {
        return Err(PricingError::InvalidMaturity { value: maturity });
    }

    let step = 1.0 / frequency.periods_per_year();
    let mut periods = Vec::with_capacity((maturity / step).ceil() as usize);
    let mut start = 0.0;

    while start < maturity - 1e-10 {
        let end = (start + step).min(maturity);
        periods.push(AccrualPeriod {
            start,
            end,
            accrual: end - start,
        });
        start = end;
    }

    Ok(periods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_quarterly_five_years() {
        let schedule = premium_schedule(5.0, PaymentFrequency::Quarterly).unwrap();
        assert_eq!(schedule.len(), 20);
        assert_relative_eq!(schedule[0].end, 0.25);
        assert_relative_eq!(schedule[19].end, 5.0);
        let total: f64 = schedule.iter().map(|p| p.accrual).sum();
        assert_relative_eq!(total, 5.0, epsilon = 1e-12);
    }

    #[test]
    fn test_short_stub() {
        let schedule = premium_schedule(1.1, PaymentFrequency::SemiAnnual).unwrap();
        assert_eq!(schedule.len(), 3);
        assert_relative_eq!(schedule[2].accrual, 0.1, epsilon = 1e-12);
        assert_relative_eq!(schedule[2].end, 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_periods_chain() {
        let schedule = premium_schedule(3.0, PaymentFrequency::Monthly).unwrap();
        for pair in schedule.windows(2) {
            assert_relative_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_invalid_maturity() {
        assert!(matches!(
            premium_schedule(0.0, PaymentFrequency::Quarterly),
            Err(PricingError::InvalidMaturity { .. })
        ));
        assert!(matches!(
            premium_schedule(-1.0, PaymentFrequency::Quarterly),
            Err(PricingError::InvalidMaturity { .. })
        ));
    }
}
