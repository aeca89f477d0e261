//! Tranche loss models under the one-factor Gaussian copula.
//!
//! Every model consumes the same inputs: per-issuer survival
//! probabilities to the horizon, recovery rates and factor loadings.
//! Conditional on the common factor `Z`, issuer defaults are independent
//! with probability
//!
//! ```text
//! p_j(z) = Phi((c_j - beta_j z) / sqrt(1 - beta_j^2)),
//! c_j = Phi^{-1}(1 - q_j)
//! ```
//!
//! and the models differ only in how they turn the conditional default
//! probabilities into a conditional loss distribution. Portfolio loss is
//! expressed as a fraction of total portfolio notional with equal issuer
//! notionals.

mod adjusted_binomial;
mod count;
mod error;
mod gaussian;
mod lhp;
mod recursion;

pub use count::default_count_distribution;
pub use error::LossModelError;

use credit_core::math::distributions::{gauss_legendre_nodes_weights, norm_cdf, norm_inv_cdf, norm_pdf};

/// Integration bound for the common factor, in standard deviations.
const FACTOR_BOUND: f64 = 6.0;

/// Tranches narrower than this fraction of notional are degenerate.
const MIN_TRANCHE_WIDTH: f64 = 1e-8;

/// The loss distribution model used for tranche pricing.
///
/// All four models price the same tranche contract and agree in the
/// large-portfolio, homogeneous limit; they trade accuracy for speed:
///
/// - `Recursion` is exact for the bucketed loss distribution and the
///   usual benchmark
/// - `AdjustedBinomial` matches the first two moments of the conditional
///   count distribution
/// - `Gaussian` replaces the conditional loss by a normal with matched
///   moments
/// - `LargeHomogeneousPool` is the closed-form infinite-portfolio limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LossModel {
    /// Exact bucketed loss recursion (Andersen-Sidenius-Basu).
    Recursion,
    /// Moment-matched adjusted binomial (Hull-White).
    AdjustedBinomial,
    /// Conditional Gaussian loss approximation.
    Gaussian,
    /// Large homogeneous pool closed form (Vasicek).
    LargeHomogeneousPool,
}

/// Survival probability of the `[k1, k2]` tranche to the horizon.
///
/// Defined as
///
/// ```text
/// Q_tr = 1 - E[min(max(L - k1, 0), k2 - k1)] / (k2 - k1)
/// ```
///
/// where `L` is the portfolio loss as a fraction of total notional. The
/// expectation is assembled from the two equity tranches `[0, k1]` and
/// `[0, k2]`:
///
/// ```text
/// Q_tr = kappa * q(0, k2) + (1 - kappa) * q(0, k1),
/// kappa = k2 / (k2 - k1)
/// ```
///
/// # Arguments
///
/// * `model` - Loss distribution model
/// * `k1` - Attachment point, fraction of portfolio notional
/// * `k2` - Detachment point, fraction of portfolio notional
/// * `survival_probs` - Per-issuer survival probabilities `Q_j(0, T)`
/// * `recovery_rates` - Per-issuer expected recovery rates
/// * `loadings` - Per-issuer factor loadings `beta_j` in `[0, 1)`.
///   `LargeHomogeneousPool` uses `loadings[0]` for the whole pool.
/// * `num_points` - Gauss-Legendre points for the factor integration
///   (ignored by `LargeHomogeneousPool`)
///
/// # Errors
///
/// Returns `LossModelError` for an empty portfolio, mismatched input
/// lengths, probabilities or loadings outside their domains, attachment
/// points violating `0 <= k1 < k2 <= 1`, or `num_points == 0`.
///
/// The degenerate all-zero tranche (both points below the 1e-8 width
/// floor) returns `Ok(0.0)`; any other tranche narrower than the floor
/// is rejected as `InvalidAttachment`, since dividing the expected loss
/// by a vanishing width is meaningless.
pub fn tranche_survival_probability(
    model: LossModel,
    k1: f64,
    k2: f64,
    survival_probs: &[f64],
    recovery_rates: &[f64],
    loadings: &[f64],
    num_points: usize,
) -> Result<f64, LossModelError> {
    if (0.0..MIN_TRANCHE_WIDTH).contains(&k1) && (0.0..MIN_TRANCHE_WIDTH).contains(&k2) {
        return Ok(0.0);
    }
    if !(0.0..=1.0).contains(&k1) || !(0.0..=1.0).contains(&k2) || k2 - k1 < MIN_TRANCHE_WIDTH {
        return Err(LossModelError::InvalidAttachment { k1, k2 });
    }
    validate_inputs(survival_probs, recovery_rates, loadings, num_points)?;

    let q2 = equity_tranche_survival(model, k2, survival_probs, recovery_rates, loadings, num_points);
    let q1 = if k1 > 0.0 {
        equity_tranche_survival(model, k1, survival_probs, recovery_rates, loadings, num_points)
    } else {
        0.0
    };

    let kappa = k2 / (k2 - k1);
    Ok(kappa * q2 + (1.0 - kappa) * q1)
}

/// Survival probability of the `[0, k]` equity tranche, `k > 0`.
fn equity_tranche_survival(
    model: LossModel,
    k: f64,
    survival_probs: &[f64],
    recovery_rates: &[f64],
    loadings: &[f64],
    num_points: usize,
) -> f64 {
    let expected = match model {
        LossModel::Recursion => {
            recursion::expected_tranche_loss(k, survival_probs, recovery_rates, loadings, num_points)
        }
        LossModel::AdjustedBinomial => adjusted_binomial::expected_tranche_loss(
            k,
            survival_probs,
            recovery_rates,
            loadings,
            num_points,
        ),
        LossModel::Gaussian => {
            gaussian::expected_tranche_loss(k, survival_probs, recovery_rates, loadings, num_points)
        }
        LossModel::LargeHomogeneousPool => {
            lhp::expected_tranche_loss(k, survival_probs, recovery_rates, loadings)
        }
    };
    // The true expectation lives in [0, k]; the Gaussian approximation
    // can leak mass below zero loss, so pin it back.
    let expected = expected.clamp(0.0, k);
    1.0 - expected / k
}

fn validate_inputs(
    survival_probs: &[f64],
    recovery_rates: &[f64],
    loadings: &[f64],
    num_points: usize,
) -> Result<(), LossModelError> {
    if survival_probs.is_empty() {
        return Err(LossModelError::EmptyPortfolio);
    }
    if survival_probs.len() != recovery_rates.len() || survival_probs.len() != loadings.len() {
        return Err(LossModelError::MismatchedLengths {
            survival: survival_probs.len(),
            recovery: recovery_rates.len(),
            loadings: loadings.len(),
        });
    }
    if num_points == 0 {
        return Err(LossModelError::InvalidQuadrature { points: num_points });
    }
    for (j, &q) in survival_probs.iter().enumerate() {
        if !(q > 0.0 && q <= 1.0) {
            return Err(LossModelError::InvalidProbability { issuer: j, value: q });
        }
    }
    for (j, &r) in recovery_rates.iter().enumerate() {
        if !(0.0..1.0).contains(&r) {
            return Err(LossModelError::InvalidRecovery { issuer: j, value: r });
        }
    }
    for (j, &beta) in loadings.iter().enumerate() {
        if !(0.0..1.0).contains(&beta) {
            return Err(LossModelError::InvalidCorrelation { issuer: j, value: beta });
        }
    }
    Ok(())
}

/// Default thresholds `c_j = Phi^{-1}(1 - q_j)`.
///
/// An issuer with `q_j = 1` cannot default and gets `c_j = -inf`, which
/// the conditional probability maps to zero.
pub(crate) fn default_thresholds(survival_probs: &[f64]) -> Vec<f64> {
    survival_probs.iter().map(|&q| norm_inv_cdf(1.0 - q)).collect()
}

/// Conditional default probability of one issuer given factor value `z`.
#[inline]
pub(crate) fn conditional_default_prob(threshold: f64, beta: f64, z: f64) -> f64 {
    norm_cdf((threshold - beta * z) / (1.0 - beta * beta).sqrt())
}

/// Per-issuer loss given default, as fraction of total portfolio notional.
///
/// Issuer notionals are equal, so issuer `j` contributes `(1 - R_j) / n`.
pub(crate) fn loss_fractions(recovery_rates: &[f64]) -> Vec<f64> {
    let n = recovery_rates.len() as f64;
    recovery_rates.iter().map(|&r| (1.0 - r) / n).collect()
}

/// Gauss-Legendre grid for the common factor on `[-FACTOR_BOUND, FACTOR_BOUND]`.
///
/// Weights absorb the normal density and are normalised to sum to one, so
/// truncating the tails never leaks probability mass.
pub(crate) fn factor_grid(num_points: usize) -> (Vec<f64>, Vec<f64>) {
    let (nodes, raw_weights) = gauss_legendre_nodes_weights(num_points);
    let z: Vec<f64> = nodes.iter().map(|&x| x * FACTOR_BOUND).collect();
    let mut weights: Vec<f64> = z
        .iter()
        .zip(raw_weights.iter())
        .map(|(&zi, &w)| w * norm_pdf(zi))
        .collect();
    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    (z, weights)
}
