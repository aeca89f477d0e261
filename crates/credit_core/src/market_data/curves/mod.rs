//! Discount and survival curve types.
//!
//! This module provides:
//! - `DiscountCurve` trait with flat and interpolated implementations
//! - `SurvivalCurve`: bootstrapped issuer default curve
//! - `CdsQuote`: the market quote a curve knot was stripped from
//! - `IssuerPool`: validated collection of issuer curves

mod discount;
mod survival;

pub use discount::{DiscountCurve, FlatDiscountCurve, InterpolatedDiscountCurve};
pub use survival::{CdsQuote, IssuerPool, SurvivalCurve};
