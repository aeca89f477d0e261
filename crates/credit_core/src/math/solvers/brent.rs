//! Brent's method root-finding solver.

use super::SolverConfig;
use crate::types::SolverError;
use num_traits::Float;

/// Brent's method root finder.
///
/// Combines bisection with secant and inverse quadratic interpolation
/// for derivative-free root finding. Converges for any continuous
/// function given a valid sign-changing bracket, which makes it the
/// solver of choice for hazard-rate stripping where the par-spread
/// objective is cheap to evaluate but awkward to differentiate.
///
/// # Type Parameters
///
/// * `T` - Floating-point type (e.g., `f64`)
///
/// # Example
///
/// ```
/// use credit_core::math::solvers::{BrentSolver, SolverConfig};
///
/// let solver = BrentSolver::new(SolverConfig::default());
///
/// // Solve x³ - x - 2 = 0 in bracket [1, 2]
/// let f = |x: f64| x * x * x - x - 2.0;
///
/// let root = solver.find_root(f, 1.0, 2.0).unwrap();
/// assert!(f(root).abs() < 1e-10);
/// ```
#[derive(Debug, Clone)]
pub struct BrentSolver<T: Float> {
    config: SolverConfig<T>,
}

impl<T: Float> BrentSolver<T> {
    /// Create a new Brent solver with the given configuration.
    pub fn new(config: SolverConfig<T>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<T> {
        &self.config
    }

    /// Find a root of `f` in the bracket [a, b].
    ///
    /// Requires that `f(a)` and `f(b)` have opposite signs.
    ///
    /// # Returns
    ///
    /// * `Ok(x)` - Root where `|f(x)| < tolerance`
    /// * `Err(SolverError::NoBracket)` - `f(a)` and `f(b)` have same sign
    /// * `Err(SolverError::MaxIterationsExceeded)` - Failed to converge
    pub fn find_root<F>(&self, f: F, a: T, b: T) -> Result<T, SolverError>
    where
        F: Fn(T) -> T,
    {
        let mut a = a;
        let mut b = b;
        let mut fa = f(a);
        let mut fb = f(b);

        if fa * fb > T::zero() {
            return Err(SolverError::NoBracket {
                a: a.to_f64().unwrap_or(f64::NAN),
                b: b.to_f64().unwrap_or(f64::NAN),
            });
        }

        // Keep b as the best estimate: |f(b)| <= |f(a)|
        if fa.abs() < fb.abs() {
            std::mem::swap(&mut a, &mut b);
            std::mem::swap(&mut fa, &mut fb);
        }

        let mut c = a;
        let mut fc = fa;
        let mut d = b - a;
        let mut e = d;

        let two = T::from(2.0).unwrap();
        let three = T::from(3.0).unwrap();

        for _ in 0..self.config.max_iterations {
            if fb.abs() < self.config.tolerance {
                return Ok(b);
            }

            let tol = self.config.tolerance;
            let m = (c - b) / two;
            if m.abs() <= tol {
                return Ok(b);
            }

            let use_bisection;
            if fa != fc && fb != fc {
                // Inverse quadratic interpolation
                let r = fb / fc;
                let s = fb / fa;
                let t = fa / fc;
                let p = s * (t * (r - t) * (c - b) - (T::one() - r) * (b - a));
                let q = (t - T::one()) * (r - T::one()) * (s - T::one());

                if p.abs() < (three * m * q).abs() / two && p.abs() < (e * q).abs() / two {
                    e = d;
                    d = p / q;
                    use_bisection = false;
                } else {
                    use_bisection = true;
                }
            } else if fb != fa {
                // Secant step
                let s = fb / fa;
                let p = two * m * s;
                let q = T::one() - s;

                if p.abs() < (three * m * q).abs() / two && p.abs() < (e * q).abs() / two {
                    e = d;
                    d = p / q;
                    use_bisection = false;
                } else {
                    use_bisection = true;
                }
            } else {
                use_bisection = true;
            }

            if use_bisection {
                d = m;
                e = m;
            }

            a = b;
            fa = fb;

            if d.abs() > tol {
                b = b + d;
            } else {
                // Minimum step in the direction of the bracket midpoint
                b = b + if m > T::zero() { tol } else { -tol };
            }

            fb = f(b);

            // Restore the sign change between b and c if lost
            if (fb > T::zero() && fc > T::zero()) || (fb < T::zero() && fc < T::zero()) {
                c = a;
                fc = fa;
                d = b - a;
                e = d;
            }

            if fc.abs() < fb.abs() {
                a = b;
                b = c;
                c = a;
                fa = fb;
                fb = fc;
                fc = fa;
            }
        }

        Err(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        })
    }
}
