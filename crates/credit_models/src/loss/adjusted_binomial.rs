//! Moment-matched adjusted binomial loss model (Hull-White).

use rayon::prelude::*;

use super::{conditional_default_prob, default_thresholds, factor_grid, loss_fractions};

/// Expected loss of the `[0, k]` equity tranche, `E[min(L, k)]`.
///
/// Conditional on each factor node the heterogeneous pool is collapsed to
/// a binomial count with loss-weighted average default probability, then
/// tilted so the count variance matches the exact heterogeneous variance:
///
/// ```text
/// l(c) = b(c) * (1 + lambda * ((c - m)^2 - v_b)),
/// lambda = (v_e - v_b) / sum_c b(c) ((c - m)^2 - v_b)^2
/// ```
///
/// Negative tilted probabilities are clamped to zero and the distribution
/// renormalised. Each default contributes the average loss given default.
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
    let total_lgd: f64 = lgd.iter().sum();
    let avg_lgd = total_lgd / n as f64;

    let (z, weights) = factor_grid(num_points);

    z.par_iter()
        .zip(weights.par_iter())
        .map(|(&zi, &wi)| {
            let probs: Vec<f64> = (0..n)
                .map(|j| conditional_default_prob(thresholds[j], loadings[j], zi))
                .collect();

            // Loss-weighted average keeps the conditional mean loss exact.
            let p_bar: f64 = probs
                .iter()
                .zip(lgd.iter())
                .map(|(&p, &l)| p * l / total_lgd)
                .sum();

            let count_dbn = tilted_count_distribution(&probs, p_bar);

            let conditional: f64 = count_dbn
                .iter()
                .enumerate()
                .map(|(c, &prob)| prob * (c as f64 * avg_lgd).min(k))
                .sum();
            wi * conditional
        })
        .sum()
}

/// Binomial count distribution with variance-matching tilt.
fn tilted_count_distribution(probs: &[f64], p_bar: f64) -> Vec<f64> {
    let n = probs.len();
    let mut b = vec![0.0_f64; n + 1];

    if p_bar <= 0.0 {
        b[0] = 1.0;
        return b;
    }
    if p_bar >= 1.0 {
        b[n] = 1.0;
        return b;
    }

    b[0] = (1.0 - p_bar).powi(n as i32);
    let ratio = p_bar / (1.0 - p_bar);
    for c in 0..n {
        b[c + 1] = b[c] * ratio * (n - c) as f64 / (c + 1) as f64;
    }

    let m = n as f64 * p_bar;
    let var_binomial = m * (1.0 - p_bar);
    let var_exact: f64 = probs.iter().map(|&p| p * (1.0 - p)).sum();

    let denom: f64 = b
        .iter()
        .enumerate()
        .map(|(c, &bc)| {
            let d = (c as f64 - m).powi(2) - var_binomial;
            bc * d * d
        })
        .sum();
    let lambda = if denom > 1e-30 {
        (var_exact - var_binomial) / denom
    } else {
        0.0
    };

    let mut l: Vec<f64> = b
        .iter()
        .enumerate()
        .map(|(c, &bc)| {
            let tilt = 1.0 + lambda * ((c as f64 - m).powi(2) - var_binomial);
            (bc * tilt).max(0.0)
        })
        .collect();

    let total: f64 = l.iter().sum();
    for p in &mut l {
        *p /= total;
    }
    l
}
