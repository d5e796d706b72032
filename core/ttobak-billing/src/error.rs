//! Error types for the billing client.

use thiserror::Error;

/// Errors from the payments provider.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Required configuration is missing.
    #[error("billing not configured: {0}")]
    NotConfigured(&'static str),

    /// The caller supplied an unusable argument.
    #[error("invalid request: {0}")]
    Validation(String),

    /// Transport failure.
    #[error("network error: {0}")]
    Network(String),

    /// The provider answered with a non-success status.
    #[error("provider error: {0}")]
    Api(String),
}

pub type BillingResult<T> = Result<T, BillingError>;
