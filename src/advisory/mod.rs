//! Natural-language tax planning advice from an external text-generation
//! provider.
//!
//! The call never fails from the caller's point of view: any provider,
//! network, or credential problem becomes [`AdviceOutcome::Fallback`].

mod client;
mod error;
pub mod prompt;

use async_trait::async_trait;

use crate::profile::InvestmentProfile;
use crate::projection::TaxResult;

pub use client::{AdvisoryConfig, GeminiAdvisor, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use error::{AdvisoryError, AdvisoryResult};

pub const FALLBACK_ADVICE: &str =
    "Could not generate AI advice at this moment. Please check your connection and API key.";

/// Outcome of an advisory request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdviceOutcome {
    /// Text produced by the provider
    Advice(String),
    /// Static message shown when the provider could not be reached
    Fallback(String),
}

impl AdviceOutcome {
    pub fn text(&self) -> &str {
        match self {
            AdviceOutcome::Advice(text) | AdviceOutcome::Fallback(text) => text,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, AdviceOutcome::Fallback(_))
    }
}

/// Backend-agnostic interface for advice generation
#[async_trait]
pub trait Advisor: Send + Sync {
    async fn advise(&self, profile: &InvestmentProfile, result: &TaxResult) -> AdviceOutcome;
}
