//! Error types for the record store.

use thiserror::Error;
use ttobak_entitlement::EntitlementError;

/// Errors from the SQLite store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("invalid stored data: {0}")]
    InvalidData(String),

    #[error("store lock poisoned")]
    LockPoisoned,
}

pub type StoreResult<T> = Result<T, StoreError>;

impl From<StoreError> for EntitlementError {
    fn from(err: StoreError) -> Self {
        EntitlementError::Storage(err.to_string())
    }
}
