//! Investment profile data structures and batch loading

mod data;
pub mod loader;

pub use data::{InvestmentProfile, Residency, FundCategory, ContributionMode, MAX_HORIZON_YEARS};
pub use loader::{load_profiles, load_profiles_from_reader, ProfileRecord};
