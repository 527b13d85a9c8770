//! Error types for profile and rule loading

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TaxError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid number for {field}: {value}")]
    Parse { field: String, value: String },

    #[error("Unknown {kind}: {value}")]
    UnknownVariant { kind: &'static str, value: String },

    #[error("Invalid profile: {field} {reason}")]
    InvalidProfile { field: &'static str, reason: String },
}

pub type LoadResult<T> = Result<T, TaxError>;
