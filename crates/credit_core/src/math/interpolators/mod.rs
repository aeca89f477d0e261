//! Curve interpolation schemes.
//!
//! Survival curves interpolate log-linearly in the survival probability,
//! which is equivalent to a piecewise-flat forward hazard rate. The
//! functions here are pure: knot validation lives with the curve types
//! that own the data.

/// Flat-forward (log-linear) interpolation of survival probabilities.
///
/// Interpolates `ln q` linearly in time between knots, with an implied
/// `(0, 1)` knot at the origin and flat extrapolation of the final
/// forward hazard beyond the last knot.
///
/// # Arguments
///
/// * `times` - Knot times, strictly increasing and positive
/// * `values` - Survival probabilities at the knots, each in `(0, 1]`
/// * `t` - Query time
///
/// # Panics
///
/// Debug-asserts that `times` and `values` are non-empty and equal length.
/// Callers validate knot data on construction.
pub fn flat_forward(times: &[f64], values: &[f64], t: f64) -> f64 {
    debug_assert!(!times.is_empty());
    debug_assert_eq!(times.len(), values.len());

    if t <= 0.0 {
        return 1.0;
    }

    // Before the first knot: interpolate against the implied (0, 1) knot.
    if t <= times[0] {
        let hazard = -values[0].ln() / times[0];
        return (-hazard * t).exp();
    }

    let n = times.len();

    // Beyond the last knot: extrapolate the final forward hazard.
    if t >= times[n - 1] {
        let hazard = if n == 1 {
            -values[0].ln() / times[0]
        } else {
            -(values[n - 1].ln() - values[n - 2].ln()) / (times[n - 1] - times[n - 2])
        };
        return values[n - 1] * (-hazard * (t - times[n - 1])).exp();
    }

    // Binary search for the bracketing interval [times[i], times[i + 1]].
    let i = match times.partition_point(|&ti| ti < t) {
        0 => 0,
        k => k - 1,
    };

    let w = (t - times[i]) / (times[i + 1] - times[i]);
    let ln_q = values[i].ln() * (1.0 - w) + values[i + 1].ln() * w;
    ln_q.exp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_origin_is_one() {
        let times = [1.0, 3.0, 5.0];
        let values = [0.99, 0.95, 0.90];
        assert_relative_eq!(flat_forward(&times, &values, 0.0), 1.0);
        assert_relative_eq!(flat_forward(&times, &values, -1.0), 1.0);
    }

    #[test]
    fn test_knots_are_reproduced() {
        let times = [1.0, 3.0, 5.0];
        let values = [0.99, 0.95, 0.90];
        for (t, q) in times.iter().zip(values.iter()) {
            assert_relative_eq!(flat_forward(&times, &values, *t), *q, epsilon = 1e-14);
        }
    }

    #[test]
    fn test_flat_hazard_curve_is_exponential() {
        // Knots sampled from q(t) = exp(-0.02 t) must interpolate and
        // extrapolate back onto the same exponential.
        let h: f64 = 0.02;
        let times = [1.0, 2.0, 5.0, 10.0];
        let values: Vec<f64> = times.iter().map(|t| (-h * t).exp()).collect();

        for &t in &[0.3, 1.5, 3.7, 8.0, 14.0] {
            assert_relative_eq!(
                flat_forward(&times, &values, t),
                (-h * t).exp(),
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_monotone_between_knots() {
        let times = [1.0, 3.0, 5.0];
        let values = [0.99, 0.95, 0.90];
        let mut prev = 1.0;
        for i in 0..=60 {
            let t = 0.1 * i as f64;
            let q = flat_forward(&times, &values, t);
            assert!(q <= prev + 1e-14, "t={t} q={q} prev={prev}");
            prev = q;
        }
    }

    #[test]
    fn test_single_knot_extrapolation() {
        let times = [5.0];
        let values = [0.9_f64];
        let h = -values[0].ln() / 5.0;
        assert_relative_eq!(
            flat_forward(&times, &values, 8.0),
            (-h * 8.0).exp(),
            epsilon = 1e-12
        );
    }
}
