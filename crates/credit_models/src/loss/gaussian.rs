//! Conditional Gaussian loss approximation.

use rayon::prelude::*;

use credit_core::math::distributions::{norm_cdf, norm_pdf};

use super::{conditional_default_prob, default_thresholds, factor_grid, loss_fractions};

/// Expected loss of the `[0, k]` equity tranche, `E[min(L, k)]`.
///
/// Conditional on each factor node the portfolio loss is replaced by a
/// normal with the exact conditional mean and variance,
///
/// ```text
/// mu(z)      = sum_j lgd_j p_j(z)
/// sigma^2(z) = sum_j lgd_j^2 p_j(z) (1 - p_j(z))
/// ```
///
/// under which the capped loss has the closed form
/// `E[min(L, k)] = mu - (mu - k) Phi(d) - sigma phi(d)` with
/// `d = (mu - k) / sigma`.
pub(crate) fn expected_tranche_loss(
    k: f64,
    survival_probs: &[f64],
    recovery_rates: &[f64],
    loadings: &[f64],
    num_points: usize,
) -> f64 {
    let thresholds = default_thresholds(survival_probs);
    let lgd = loss_fractions(recovery_rates);
    let n = lgd.len();

    let (z, weights) = factor_grid(num_points);

    z.par_iter()
        .zip(weights.par_iter())
        .map(|(&zi, &wi)| {
            let mut mu = 0.0;
            let mut var = 0.0;
            for j in 0..n {
                let p = conditional_default_prob(thresholds[j], loadings[j], zi);
                mu += lgd[j] * p;
                var += lgd[j] * lgd[j] * p * (1.0 - p);
            }

            let conditional = if var < 1e-30 {
                mu.min(k)
            } else {
                let sigma = var.sqrt();
                let d = (mu - k) / sigma;
                mu - (mu - k) * norm_cdf(d) - sigma * norm_pdf(d)
            };
            wi * conditional
        })
        .sum()
}
