//! Root-finding and fixed-point solvers.
//!
//! This module provides:
//! - `SolverConfig`: Shared tolerance and iteration settings
//! - `BrentSolver`: Derivative-free bracketing root finder
//! - `UnityFixedPoint`: Bounded fixed-point iteration driving a ratio to one

mod brent;
mod config;
mod fixed_point;

pub use brent::BrentSolver;
pub use config::SolverConfig;
pub use fixed_point::UnityFixedPoint;
