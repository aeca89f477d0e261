//! Market data structures: discount and survival curves.
//!
//! This module provides:
//! - Curve types and traits (`curves`)
//! - Curve construction and validation errors (`error`)

pub mod curves;
mod error;

pub use error::CurveError;
