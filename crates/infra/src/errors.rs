//! Infrastructure error types and conversions into the domain error

use thiserror::Error;
use tpedesk_domain::TpeDeskError;

/// Adapter-level error, converted into [`TpeDeskError`] at the port
/// boundary
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<InfraError> for TpeDeskError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Http(inner) => Self::Network(inner.to_string()),
            InfraError::InvalidUrl(message) => Self::Config(message),
            InfraError::Serialization(inner) => Self::Internal(inner.to_string()),
        }
    }
}
