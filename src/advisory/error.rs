use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvisoryError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("No API key configured")]
    MissingCredential,

    #[error("Provider returned {status}: {message}")]
    Provider { status: u16, message: String },

    #[error("Provider response contained no text")]
    EmptyResponse,
}

pub type AdvisoryResult<T> = Result<T, AdvisoryError>;
