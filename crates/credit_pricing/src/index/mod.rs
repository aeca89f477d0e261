//! CDS index portfolio statistics and basis calibration.
//!
//! This module provides:
//! - `CdsIndexPortfolio`: intrinsic legs and spread statistics over an
//!   issuer pool (`portfolio`)
//! - `IndexCalibrator` and `IndexCalibrationTarget`: two strategies for
//!   adjusting issuer curves so the pool reprices index quotes
//!   (`calibration`)

mod calibration;
mod portfolio;

pub use calibration::{IndexCalibrationTarget, IndexCalibrator};
pub use portfolio::CdsIndexPortfolio;
