//! Tiers, decisions and the tunable policy constants.

use crate::error::{EntitlementError, EntitlementResult};
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Free transforms allowed per period.
pub const FREE_LIMIT: u32 = 5;

/// Length of the email trial in days.
pub const TRIAL_DAYS: i64 = 7;

/// Guidance shown when the free quota is used up.
pub const QUOTA_EXCEEDED_MESSAGE: &str =
    "무료 사용 횟수를 모두 사용했어요. Pro 7일 체험을 시작하면 무제한으로 사용할 수 있어요.";

/// Tunable policy values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntitlementPolicy {
    /// Free transforms per period.
    pub free_limit: u32,
    /// Trial length in days.
    pub trial_days: i64,
}

impl Default for EntitlementPolicy {
    fn default() -> Self {
        Self {
            free_limit: FREE_LIMIT,
            trial_days: TRIAL_DAYS,
        }
    }
}

impl EntitlementPolicy {
    /// Returns the trial length as a duration.
    ///
    /// Negative lengths count as zero; lengths past what a duration can hold
    /// saturate instead of panicking.
    #[must_use]
    pub fn trial_duration(&self) -> Duration {
        Duration::try_days(self.trial_days.max(0)).unwrap_or(Duration::MAX)
    }
}

/// The entitlement tier an identity resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Counted against the free limit.
    Free,
    /// Unlimited, never counted.
    Pro,
}

/// Why an identity is on the pro tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProSource {
    /// Running email trial (anonymous mode).
    Trial {
        /// Whole days remaining, rounded up.
        days_left: u32,
    },
    /// Pro flag on the user's profile (authenticated mode).
    Subscription,
}

/// Displayable entitlement state of an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "tier", rename_all = "lowercase")]
pub enum EntitlementStatus {
    /// Unlimited usage.
    Pro {
        /// What grants pro.
        source: ProSource,
    },
    /// Counted usage.
    Free {
        /// Transforms counted in the current period.
        used: u32,
        /// Transforms left in the current period.
        remaining: u32,
        /// Free limit per period.
        limit: u32,
    },
}

impl EntitlementStatus {
    /// Returns the tier.
    #[must_use]
    pub fn tier(&self) -> Tier {
        match self {
            Self::Pro { .. } => Tier::Pro,
            Self::Free { .. } => Tier::Free,
        }
    }

    /// Returns true for the pro tier.
    #[must_use]
    pub fn is_pro(&self) -> bool {
        matches!(self, Self::Pro { .. })
    }

    /// Returns the remaining free transforms, or None when unlimited.
    #[must_use]
    pub fn remaining(&self) -> Option<u32> {
        match self {
            Self::Pro { .. } => None,
            Self::Free { remaining, .. } => Some(*remaining),
        }
    }
}

/// Outcome of a gate check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "lowercase")]
pub enum Decision {
    /// The transform may run.
    Allow {
        /// Tier the identity resolved to.
        tier: Tier,
    },
    /// The free quota is used up.
    Deny {
        /// Transforms already counted.
        used: u32,
        /// Free limit per period.
        limit: u32,
    },
}

impl Decision {
    /// Returns true if the transform may run.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow { .. })
    }

    /// Converts a deny into [`EntitlementError::QuotaExceeded`].
    pub fn ensure_allowed(self) -> EntitlementResult<Tier> {
        match self {
            Self::Allow { tier } => Ok(tier),
            Self::Deny { used, limit } => Err(EntitlementError::QuotaExceeded { used, limit }),
        }
    }
}
