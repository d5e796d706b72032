//! The caller identity a session runs under.

use crate::ids::{DeviceId, UserId};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which kind of identity a session uses. Exactly one applies per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentityKind {
    /// Device-scoped, no server-verified identity.
    Anonymous,
    /// Verified by the auth provider.
    Authenticated,
}

impl fmt::Display for IdentityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// A resolved caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Identity {
    /// Anonymous device; its usage and trial state live in a device-scoped store.
    Anonymous {
        /// The device identifier.
        device_id: DeviceId,
    },
    /// Authenticated user; its usage and pro flag live in the record store.
    Authenticated {
        /// The user identifier.
        user_id: UserId,
        /// Email reported by the auth provider, if any.
        email: Option<String>,
    },
}

impl Identity {
    /// Creates an anonymous identity for a device.
    #[must_use]
    pub fn anonymous(device_id: DeviceId) -> Self {
        Self::Anonymous { device_id }
    }

    /// Creates an authenticated identity.
    #[must_use]
    pub fn authenticated(user_id: UserId, email: Option<String>) -> Self {
        Self::Authenticated { user_id, email }
    }

    /// Returns the identity kind.
    #[must_use]
    pub fn kind(&self) -> IdentityKind {
        match self {
            Self::Anonymous { .. } => IdentityKind::Anonymous,
            Self::Authenticated { .. } => IdentityKind::Authenticated,
        }
    }

    /// Returns the stable reference string used to key stored records.
    #[must_use]
    pub fn identity_ref(&self) -> String {
        match self {
            Self::Anonymous { device_id } => format!("device:{device_id}"),
            Self::Authenticated { user_id, .. } => format!("user:{user_id}"),
        }
    }
}
