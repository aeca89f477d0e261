//! Survival curve bootstrapping from CDS quotes.

use std::sync::Arc;

use credit_core::market_data::curves::{CdsQuote, DiscountCurve, SurvivalCurve};
use credit_core::market_data::CurveError;
use credit_core::math::solvers::{BrentSolver, SolverConfig};
use tracing::debug;

use crate::cds::CdsContract;
use crate::error::PricingError;
use crate::schedule::PaymentFrequency;

/// Hazard rate search bracket for one bootstrap knot.
const HAZARD_BRACKET: (f64, f64) = (1e-10, 5.0);

/// Sequential CDS curve bootstrapper.
///
/// Strips one survival knot per quote, shortest maturity first. Each
/// knot assumes a flat forward hazard between the previous knot and the
/// quote maturity and solves for the hazard that reprices the quote to
/// zero value at its own spread. Earlier knots are frozen, so the
/// procedure is exactly triangular.
#[derive(Debug, Clone)]
pub struct CdsCurveBuilder {
    frequency: PaymentFrequency,
    solver: BrentSolver<f64>,
}

impl CdsCurveBuilder {
    /// Create a builder with the default solver configuration.
    pub fn new(frequency: PaymentFrequency) -> Self {
        Self {
            frequency,
            solver: BrentSolver::new(SolverConfig::new(1e-12, 100)),
        }
    }

    /// Create a builder with an explicit solver configuration.
    pub fn with_solver_config(frequency: PaymentFrequency, config: SolverConfig<f64>) -> Self {
        Self {
            frequency,
            solver: BrentSolver::new(config),
        }
    }

    /// Bootstrap a survival curve from par CDS quotes.
    ///
    /// # Arguments
    ///
    /// * `quotes` - Par quotes, maturities strictly increasing
    /// * `recovery_rate` - Expected recovery, shared by all quotes
    /// * `discount` - Risk-free discount curve
    ///
    /// # Errors
    ///
    /// Returns `PricingError` when the quotes are empty or unordered,
    /// when a knot's repricing objective cannot be bracketed, or when
    /// the root search fails to converge.
    pub fn build(
        &self,
        quotes: &[CdsQuote],
        recovery_rate: f64,
        discount: Arc<dyn DiscountCurve + Send + Sync>,
    ) -> Result<SurvivalCurve, PricingError> {
        if quotes.is_empty() {
            return Err(PricingError::Curve(CurveError::LengthMismatch {
                times: 0,
                values: 0,
            }));
        }
        let mut prev_t = 0.0;
        for (i, quote) in quotes.iter().enumerate() {
            if quote.maturity <= prev_t {
                return Err(PricingError::Curve(CurveError::NonMonotonicTimes {
                    index: i,
                }));
            }
            prev_t = quote.maturity;
        }

        let mut times: Vec<f64> = Vec::with_capacity(quotes.len());
        let mut values: Vec<f64> = Vec::with_capacity(quotes.len());

        for quote in quotes {
            let t_prev = times.last().copied().unwrap_or(0.0);
            let q_prev = values.last().copied().unwrap_or(1.0);
            let span = quote.maturity - t_prev;

            let contract = CdsContract::new(quote.maturity, quote.spread, self.frequency)?;

            let objective = |hazard: f64| -> f64 {
                let mut trial_times = times.clone();
                let mut trial_values = values.clone();
                trial_times.push(quote.maturity);
                trial_values.push(q_prev * (-hazard * span).exp());
                // Knot data is valid by construction for any positive hazard.
                match SurvivalCurve::new(
                    trial_times,
                    trial_values,
                    recovery_rate,
                    Arc::clone(&discount),
                    vec![],
                ) {
                    Ok(curve) => contract.value(&curve),
                    Err(_) => f64::NAN,
                }
            };

            let hazard = self
                .solver
                .find_root(objective, HAZARD_BRACKET.0, HAZARD_BRACKET.1)?;
            debug!(
                maturity = quote.maturity,
                spread = quote.spread,
                hazard,
                "bootstrapped curve knot"
            );

            times.push(quote.maturity);
            values.push(q_prev * (-hazard * span).exp());
        }

        Ok(SurvivalCurve::new(
            times,
            values,
            recovery_rate,
            discount,
            quotes.to_vec(),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use credit_core::market_data::curves::FlatDiscountCurve;

    fn discount(rate: f64) -> Arc<dyn DiscountCurve + Send + Sync> {
        Arc::new(FlatDiscountCurve::new(rate))
    }

    /// Par spreads computed from a known flat-hazard curve.
    fn synthetic_quotes(hazard: f64, recovery: f64, rate: f64) -> Vec<CdsQuote> {
        let tenors = [1.0, 3.0, 5.0, 7.0, 10.0];
        let values = tenors.iter().map(|t| (-hazard * t).exp()).collect();
        let curve = SurvivalCurve::new(
            tenors.to_vec(),
            values,
            recovery,
            discount(rate),
            vec![],
        )
        .unwrap();

        tenors
            .iter()
            .map(|&t| {
                let cds = CdsContract::new(t, 0.0, PaymentFrequency::Quarterly).unwrap();
                CdsQuote::new(t, cds.par_spread(&curve).unwrap())
            })
            .collect()
    }

    #[test]
    fn test_recovers_flat_hazard_curve() {
        let hazard = 0.025;
        let quotes = synthetic_quotes(hazard, 0.4, 0.03);
        let builder = CdsCurveBuilder::new(PaymentFrequency::Quarterly);
        let curve = builder.build(&quotes, 0.4, discount(0.03)).unwrap();

        for (i, quote) in quotes.iter().enumerate() {
            assert_relative_eq!(
                curve.value(i),
                (-hazard * quote.maturity).exp(),
                epsilon = 1e-8
            );
        }
    }

    #[test]
    fn test_built_curve_reprices_quotes() {
        let quotes = vec![
            CdsQuote::new(1.0, 0.0060),
            CdsQuote::new(3.0, 0.0085),
            CdsQuote::new(5.0, 0.0110),
            CdsQuote::new(10.0, 0.0140),
        ];
        let builder = CdsCurveBuilder::new(PaymentFrequency::Quarterly);
        let curve = builder.build(&quotes, 0.4, discount(0.02)).unwrap();

        for quote in &quotes {
            let cds = CdsContract::new(quote.maturity, quote.spread, PaymentFrequency::Quarterly)
                .unwrap();
            // Zero value at the quoted spread is the bootstrap condition.
            assert_relative_eq!(cds.value(&curve), 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_quotes_carried_on_curve() {
        let quotes = vec![CdsQuote::new(3.0, 0.01), CdsQuote::new(5.0, 0.012)];
        let builder = CdsCurveBuilder::new(PaymentFrequency::Quarterly);
        let curve = builder.build(&quotes, 0.4, discount(0.02)).unwrap();
        assert_eq!(curve.quotes(), quotes.as_slice());
    }

    #[test]
    fn test_unordered_quotes_rejected() {
        let quotes = vec![CdsQuote::new(5.0, 0.01), CdsQuote::new(3.0, 0.012)];
        let builder = CdsCurveBuilder::new(PaymentFrequency::Quarterly);
        let result = builder.build(&quotes, 0.4, discount(0.02));
        assert!(matches!(
            result,
            Err(PricingError::Curve(CurveError::NonMonotonicTimes { index: 1 }))
        ));
    }

    #[test]
    fn test_empty_quotes_rejected() {
        let builder = CdsCurveBuilder::new(PaymentFrequency::Quarterly);
        assert!(builder.build(&[], 0.4, discount(0.02)).is_err());
    }

    #[test]
    fn test_upward_sloping_spreads_give_decreasing_survival() {
        let quotes = vec![
            CdsQuote::new(1.0, 0.005),
            CdsQuote::new(5.0, 0.015),
            CdsQuote::new(10.0, 0.022),
        ];
        let builder = CdsCurveBuilder::new(PaymentFrequency::Quarterly);
        let curve = builder.build(&quotes, 0.4, discount(0.02)).unwrap();
        assert!(curve.value(0) > curve.value(1));
        assert!(curve.value(1) > curve.value(2));
    }
}
