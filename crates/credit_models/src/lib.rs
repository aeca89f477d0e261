//! # credit_models: Portfolio Loss Distributions
//!
//! ## Layer 2 (Models) Role
//!
//! credit_models sits between the foundation layer (`credit_core`) and
//! the product layer (`credit_pricing`), providing the one-factor
//! Gaussian copula machinery that turns issuer survival probabilities
//! into portfolio loss statistics:
//!
//! - Four interchangeable tranche loss models (`loss::LossModel`):
//!   full recursion, adjusted binomial, Gaussian approximation and the
//!   large homogeneous pool closed form
//! - The unconditional default count distribution
//!   (`loss::default_count_distribution`) for nth-to-default products
//!
//! All models share the same conditional-independence skeleton: issuer
//! defaults are independent conditional on a single Gaussian factor, and
//! unconditional quantities are recovered by Gauss-Legendre quadrature
//! over the factor.
//!
//! ## Usage Example
//!
//! ```rust
//! use credit_models::loss::{tranche_survival_probability, LossModel};
//!
//! let survival = vec![0.97; 50];
//! let recovery = vec![0.4; 50];
//! let loadings = vec![0.5; 50];
//!
//! let q = tranche_survival_probability(
//!     LossModel::Recursion,
//!     0.03,
//!     0.07,
//!     &survival,
//!     &recovery,
//!     &loadings,
//!     50,
//! )
//! .unwrap();
//! assert!(q > 0.0 && q <= 1.0);
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod loss;
