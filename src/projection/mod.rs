//! Tax engine for lump-sum and SIP projections

mod installments;
mod engine;
mod result;

pub use installments::{Installment, Installments};
pub use engine::{compute, EngineConfig, TaxEngine};
pub use result::{GainCategory, InstallmentRow, TaxProjection, TaxResult};
