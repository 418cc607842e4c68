use thiserror::Error;

use fieldops_core::DomainError;
use fieldops_ingest::ParseError;

use crate::store::StoreError;

/// Error returned by [`crate::LedgerService`] operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("store failure: {0}")]
    Store(#[from] StoreError),

    #[error("import failed: {0}")]
    Parse(#[from] ParseError),
}

impl ServiceError {
    /// Whether the caller can fix the input and retry.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ServiceError::Domain(err) => err.is_recoverable(),
            ServiceError::Parse(_) => true,
            ServiceError::Store(_) => false,
        }
    }
}
