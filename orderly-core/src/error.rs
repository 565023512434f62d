// orderly-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OrderlyError {
    // --- DOMAIN ERRORS (Schema, Integrity, Rules) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- INFRASTRUCTURE ERRORS (IO, Parsing) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- GENERIC / APPLICATION ERRORS ---
    #[error("Internal Error: {0}")]
    InternalError(String),

    #[error("Unsafe path traversal detected: {0}")]
    UnsafePath(String),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for OrderlyError {
    fn from(err: std::io::Error) -> Self {
        OrderlyError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<csv::Error> for OrderlyError {
    fn from(err: csv::Error) -> Self {
        OrderlyError::Infrastructure(InfrastructureError::Csv(err))
    }
}
