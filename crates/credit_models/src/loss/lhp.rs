//! Large homogeneous pool closed form (Vasicek).

use credit_core::math::distributions::{bivariate_norm_cdf, norm_cdf, norm_inv_cdf};

use super::loss_fractions;

/// Expected loss of the `[0, k]` equity tranche, `E[min(L, k)]`.
///
/// In the infinite-pool limit the conditional loss is deterministic given
/// the factor and the capped expectation collapses to
///
/// ```text
/// E[min(L, k)] = k * Phi(A) + lgd * Phi2(C, -A, -beta)
/// A = (C - sqrt(1 - beta^2) * D) / beta
/// C = Phi^{-1}(p_bar),  D = Phi^{-1}(k / lgd)
/// ```
///
/// where `p_bar` is the loss-weighted average default probability and
/// `lgd` the maximum pool loss. The pool is driven by a single
/// correlation: `loadings[0]` stands in for every issuer, so
/// heterogeneous loadings are deliberately ignored by this model.
pub(crate) fn expected_tranche_loss(
    k: f64,
    survival_probs: &[f64],
    recovery_rates: &[f64],
    loadings: &[f64],
) -> f64 {
    let lgd = loss_fractions(recovery_rates);
    let total_lgd: f64 = lgd.iter().sum();

    let p_bar: f64 = survival_probs
        .iter()
        .zip(lgd.iter())
        .map(|(&q, &l)| (1.0 - q) * l / total_lgd)
        .sum();

    if p_bar <= 0.0 {
        return 0.0;
    }
    // The cap is unreachable: the expectation is the full expected loss.
    if k >= total_lgd {
        return total_lgd * p_bar;
    }

    let beta = loadings[0];
    if beta < 1e-12 {
        // No systematic factor: the pool loss is deterministic.
        return (total_lgd * p_bar).min(k);
    }

    let c = norm_inv_cdf(p_bar);
    let d = norm_inv_cdf(k / total_lgd);
    let a = (c - (1.0 - beta * beta).sqrt() * d) / beta;

    k * norm_cdf(a) + total_lgd * bivariate_norm_cdf(c, -a, -beta)
}
