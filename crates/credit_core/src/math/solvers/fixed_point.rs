//! Bounded fixed-point iteration on a convergence ratio.

use super::SolverConfig;
use crate::types::SolverError;

/// Outcome of a converged unity fixed-point iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnityOutcome {
    /// Number of adjustment steps taken before convergence.
    pub iterations: usize,
    /// Final value of the convergence ratio.
    pub ratio: f64,
}

/// Bounded fixed-point iteration that drives a ratio to one.
///
/// Each step applies an adjustment to some external state and reports the
/// resulting convergence ratio. The iteration stops when the ratio is
/// within `tolerance` of one; reaching the iteration cap without
/// converging is a hard error, never silently accepted.
///
/// Index basis calibration uses this to drive the ratio of market to
/// intrinsic index value to unity, but the primitive itself knows nothing
/// about curves or spreads.
///
/// # Example
///
/// ```
/// use credit_core::math::solvers::{SolverConfig, UnityFixedPoint};
/// use credit_core::types::SolverError;
///
/// // Damped iteration x <- x * (2 / (1 + x)) converges to 1 from above.
/// let mut x = 4.0_f64;
/// let solver = UnityFixedPoint::new(SolverConfig::new(1e-12, 100));
/// let outcome = solver
///     .solve(|_| -> Result<f64, SolverError> {
///         x *= 2.0 / (1.0 + x);
///         Ok(x)
///     })
///     .unwrap();
/// assert!((outcome.ratio - 1.0).abs() <= 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct UnityFixedPoint {
    config: SolverConfig<f64>,
}

impl UnityFixedPoint {
    /// Create a new fixed-point solver with the given configuration.
    pub fn new(config: SolverConfig<f64>) -> Self {
        Self { config }
    }

    /// Create a solver with default configuration.
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    /// Returns a reference to the solver configuration.
    pub fn config(&self) -> &SolverConfig<f64> {
        &self.config
    }

    /// Iterate `step` until the reported ratio is within tolerance of one.
    ///
    /// `step` receives the zero-based iteration index, applies one
    /// adjustment to the caller's state and returns the new ratio. Errors
    /// from `step` abort the iteration immediately.
    ///
    /// # Returns
    ///
    /// * `Ok(outcome)` - Converged; `outcome.ratio` satisfies
    ///   `|ratio - 1| <= tolerance`
    /// * `Err(e)` - `step` failed, or the iteration cap was reached
    ///   (`SolverError::MaxIterationsExceeded` converted into `E`)
    pub fn solve<F, E>(&self, mut step: F) -> Result<UnityOutcome, E>
    where
        F: FnMut(usize) -> Result<f64, E>,
        E: From<SolverError>,
    {
        for iteration in 0..self.config.max_iterations {
            let ratio = step(iteration)?;
            if (ratio - 1.0).abs() <= self.config.tolerance {
                return Ok(UnityOutcome {
                    iterations: iteration + 1,
                    ratio,
                });
            }
        }

        Err(E::from(SolverError::MaxIterationsExceeded {
            iterations: self.config.max_iterations,
        }))
    }
}
