//! # credit_core: Foundation Layer for Portfolio Credit Pricing
//!
//! ## Layer 1 (Foundation) Role
//!
//! credit_core serves as the bottom layer of the 3-layer architecture, providing:
//! - Root-finding solvers: bounded fixed-point and Brent bracketing (`math::solvers`)
//! - Normal distribution functions, including the bivariate cdf and
//!   Gauss-Legendre quadrature (`math::distributions`)
//! - Flat-forward survival interpolation (`math::interpolators`)
//! - Discount and survival curve types (`market_data::curves`)
//! - Error types: `SolverError`, `CurveError`
//!
//! ## Zero Dependency Principle
//!
//! Layer 1 has no dependencies on the other credit_* crates, with minimal
//! external dependencies:
//! - num-traits: Traits for generic numerical computation
//! - thiserror: Structured error types
//! - serde: Serialisation support (optional)
//!
//! ## Usage Examples
//!
//! ```rust
//! use credit_core::market_data::curves::{DiscountCurve, FlatDiscountCurve, SurvivalCurve};
//! use std::sync::Arc;
//!
//! let discount = Arc::new(FlatDiscountCurve::new(0.02));
//!
//! // A survival curve bootstrapped elsewhere; the (0, 1) knot is implied.
//! let curve = SurvivalCurve::new(
//!     vec![1.0, 3.0, 5.0],
//!     vec![0.99, 0.96, 0.92],
//!     0.4,
//!     discount.clone(),
//!     Vec::new(),
//! ).unwrap();
//!
//! assert!((curve.survival_probability(0.0) - 1.0).abs() < 1e-12);
//! assert!(curve.survival_probability(4.0) < curve.survival_probability(2.0));
//! assert!((discount.df(0.0) - 1.0).abs() < 1e-12);
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialisation for plain value types

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod market_data;
pub mod math;
pub mod types;
