//! Fund Tax System - capital-gains tax projection for mutual-fund investments
//!
//! This library provides:
//! - Lump-sum and SIP value projections
//! - Per-installment STCG/LTCG classification
//! - Equity and debt tax rules with the LTCG exemption
//! - TDS estimates for non-resident investors
//! - Batch and sensitivity runs
//! - Optional planning advice from an external text-generation provider

pub mod error;
pub mod profile;
pub mod rules;
pub mod projection;
pub mod scenario;
pub mod advisory;

// Re-export commonly used types
pub use error::TaxError;
pub use profile::{InvestmentProfile, Residency, FundCategory, ContributionMode};
pub use rules::TaxRules;
pub use projection::{compute, TaxEngine, TaxResult, TaxProjection};
pub use scenario::ScenarioRunner;
