//! Error types for the transform pipeline.

use thiserror::Error;

/// Errors from building or running a transform.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The request was rejected before any provider call.
    #[error("invalid request: {0}")]
    Validation(String),

    /// The provider call failed or returned an unusable body.
    #[error("provider error: {0}")]
    Provider(String),
}

impl TransformError {
    /// Returns true if the request itself was at fault.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}

pub type TransformResult<T> = Result<T, TransformError>;
