//! Error types for the entitlement module.

use thiserror::Error;
use ttobak_types::IdentityKind;

/// Entitlement-specific errors.
#[derive(Debug, Error)]
pub enum EntitlementError {
    /// Email failed the syntactic `local@domain.tld` check.
    #[error("invalid email address: {0:?}")]
    InvalidEmail(String),

    /// Free usage for the current period is used up.
    #[error("free usage exhausted ({used}/{limit})")]
    QuotaExceeded {
        /// Transforms already counted for the period.
        used: u32,
        /// Free limit per period.
        limit: u32,
    },

    /// The operation does not apply to this kind of identity.
    #[error("operation not available for {0} identities")]
    WrongIdentity(IdentityKind),

    /// The checkout already upgraded a different user.
    #[error("checkout {0} was already redeemed by another account")]
    CheckoutAlreadyRedeemed(String),

    /// Storage error.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for entitlement operations.
pub type EntitlementResult<T> = Result<T, EntitlementError>;
