//! Shared types for the foundation layer.
//!
//! This module provides:
//! - Error types for solvers and interpolation (`error`)

mod error;

pub use error::SolverError;
