//! # credit_pricing: Credit Derivative Products
//!
//! ## Layer 3 (Products) Role
//!
//! credit_pricing is the top of the 3-layer architecture, composing the
//! curves from `credit_core` and the loss models from `credit_models`
//! into tradeable contracts:
//!
//! - `cds`: single-name CDS legs, par spreads and mark-to-market
//! - `bootstrap`: sequential survival curve stripping from par quotes
//! - `tranche`: synthetic CDO tranche valuation under any loss model
//! - `basket`: nth-to-default baskets off the default count distribution
//! - `index`: intrinsic index statistics and the two basis calibration
//!   strategies (spread adjustment and hazard adjustment)
//!
//! ## Workflow
//!
//! The intended pipeline is: bootstrap issuer curves from CDS quotes,
//! calibrate the pool to index quotes, then price tranches or baskets on
//! the calibrated pool.

#![deny(rustdoc::broken_intra_doc_links)]

pub mod basket;
pub mod bootstrap;
pub mod cds;
pub mod error;
pub mod index;
pub mod schedule;
pub mod tranche;

pub use basket::{BasketValuation, NthToDefaultBasket};
pub use bootstrap::CdsCurveBuilder;
pub use cds::{CdsContract, RiskyPv01};
pub use error::{CalibrationError, PricingError};
pub use index::{CdsIndexPortfolio, IndexCalibrationTarget, IndexCalibrator};
pub use schedule::PaymentFrequency;
pub use tranche::{CdsTranche, TrancheValuation};
