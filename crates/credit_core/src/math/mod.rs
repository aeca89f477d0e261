//! Mathematical foundations: solvers, distribution functions and interpolation.
//!
//! This module provides:
//! - Root-finding and fixed-point solvers (`solvers`)
//! - Normal distribution functions and Gauss-Legendre quadrature
//!   (`distributions`)
//! - Curve interpolation schemes (`interpolators`)

pub mod distributions;
pub mod interpolators;
pub mod solvers;
