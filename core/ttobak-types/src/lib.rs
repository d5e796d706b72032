//! Core type definitions for Ttobak.
//!
//! This crate defines the identity vocabulary shared by the entitlement
//! policy, the record store and the HTTP service:
//! - Device and user identifiers
//! - The per-session [`Identity`] (anonymous device or authenticated user)
//! - Usage period keys (lifetime or calendar day)

mod identity;
mod ids;
mod period;

pub use identity::{Identity, IdentityKind};
pub use ids::{DeviceId, UserId};
pub use period::PeriodKey;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid period key: {0}")]
    InvalidPeriod(String),
}
