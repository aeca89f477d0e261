//! Unconditional default count distribution.

use rayon::prelude::*;

use super::{conditional_default_prob, default_thresholds, factor_grid, LossModelError};

/// Unconditional distribution of the number of defaults to the horizon.
///
/// Returns a vector of length `n + 1` whose `c`-th entry is the
/// probability of exactly `c` defaults among the `n` issuers. This is the
/// recursion model with every issuer counting as one unit, and is the
/// input to nth-to-default basket pricing.
///
/// # Arguments
///
/// * `survival_probs` - Per-issuer survival probabilities `Q_j(0, T)`
/// * `loadings` - Per-issuer factor loadings `beta_j` in `[0, 1)`
/// * `num_points` - Gauss-Legendre points for the factor integration
///
/// # Errors
///
/// Returns `LossModelError` for an empty portfolio, mismatched lengths,
/// out-of-domain probabilities or loadings, or `num_points == 0`.
pub fn default_count_distribution(
    survival_probs: &[f64],
    loadings: &[f64],
    num_points: usize,
) -> Result<Vec<f64>, LossModelError> {
    if survival_probs.is_empty() {
        return Err(LossModelError::EmptyPortfolio);
    }
    if survival_probs.len() != loadings.len() {
        return Err(LossModelError::MismatchedLengths {
            survival: survival_probs.len(),
            recovery: survival_probs.len(),
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
    for (j, &beta) in loadings.iter().enumerate() {
        if !(0.0..1.0).contains(&beta) {
            return Err(LossModelError::InvalidCorrelation { issuer: j, value: beta });
        }
    }

    let n = survival_probs.len();
    let thresholds = default_thresholds(survival_probs);
    let (z, weights) = factor_grid(num_points);

    let dbn = z
        .par_iter()
        .zip(weights.par_iter())
        .map(|(&zi, &wi)| {
            let mut conditional = vec![0.0_f64; n + 1];
            conditional[0] = 1.0;
            for j in 0..n {
                let p = conditional_default_prob(thresholds[j], loadings[j], zi);
                for c in (0..=j).rev() {
                    let shift = conditional[c] * p;
                    conditional[c + 1] += shift;
                    conditional[c] -= shift;
                }
            }
            for v in &mut conditional {
                *v *= wi;
            }
            conditional
        })
        .reduce(
            || vec![0.0_f64; n + 1],
            |mut acc, v| {
                for (a, b) in acc.iter_mut().zip(v.iter()) {
                    *a += b;
                }
                acc
            },
        );

    Ok(dbn)
}
