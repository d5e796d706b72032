//! Storage seams for entitlement state.
//!
//! Anonymous state is a small fixed key-space of strings ([`StateKey`]) kept
//! per device. Authenticated state is two logical tables: a profile with the
//! pro flag and a usage counter per (user, period).

use crate::error::EntitlementResult;
use ttobak_types::{PeriodKey, UserId};

/// Fixed keys of the device-scoped state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    /// Lifetime transform count.
    UsageCount,
    /// Trial contact email.
    TrialEmail,
    /// Trial start, milliseconds since the Unix epoch.
    TrialStart,
    /// `"true"` while a trial is active.
    TrialActive,
}

impl StateKey {
    /// All keys, in storage order.
    pub const ALL: [StateKey; 4] = [
        Self::UsageCount,
        Self::TrialEmail,
        Self::TrialStart,
        Self::TrialActive,
    ];

    /// Returns the persisted key name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UsageCount => "ttobak_usage_count_v1",
            Self::TrialEmail => "ttobak_trial_email_v1",
            Self::TrialStart => "ttobak_trial_start_v1",
            Self::TrialActive => "ttobak_trial_active_v1",
        }
    }

    /// Looks a key up by its persisted name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|key| key.as_str() == name)
    }
}

/// Device-scoped key/value state for anonymous callers.
pub trait LocalEntitlementStore: Send + Sync {
    /// Reads a value.
    fn get(&self, key: StateKey) -> EntitlementResult<Option<String>>;

    /// Writes a value.
    fn set(&self, key: StateKey, value: &str) -> EntitlementResult<()>;

    /// Removes a value. Removing a missing key is not an error.
    fn remove(&self, key: StateKey) -> EntitlementResult<()>;
}

impl<T: LocalEntitlementStore + ?Sized> LocalEntitlementStore for &T {
    fn get(&self, key: StateKey) -> EntitlementResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: StateKey, value: &str) -> EntitlementResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: StateKey) -> EntitlementResult<()> {
        (**self).remove(key)
    }
}

/// Server-side profile and usage records for authenticated callers.
///
/// Implementations enforce uniqueness on (user, period) and return the row's
/// current value on read.
pub trait RecordStore: Send + Sync {
    /// Creates the profile if missing. Never changes an existing pro flag.
    fn ensure_profile(&self, user: &UserId, email: Option<&str>) -> EntitlementResult<()>;

    /// Reads the pro flag; a missing profile reads as `false`.
    fn is_pro(&self, user: &UserId) -> EntitlementResult<bool>;

    /// Sets the pro flag, creating the profile if needed.
    fn set_pro(&self, user: &UserId, is_pro: bool) -> EntitlementResult<()>;

    /// Reads the usage count for a period; a missing row reads as zero.
    fn usage(&self, user: &UserId, period: &PeriodKey) -> EntitlementResult<u32>;

    /// Increments the usage count for a period and returns the new value.
    fn increment_usage(&self, user: &UserId, period: &PeriodKey) -> EntitlementResult<u32>;

    /// Binds a checkout to the user it upgrades.
    ///
    /// Returns `false` if the checkout is already bound to another user.
    /// Claiming again for the same user succeeds.
    fn claim_checkout(&self, checkout_id: &str, user: &UserId) -> EntitlementResult<bool>;
}

impl<T: RecordStore + ?Sized> RecordStore for &T {
    fn ensure_profile(&self, user: &UserId, email: Option<&str>) -> EntitlementResult<()> {
        (**self).ensure_profile(user, email)
    }

    fn is_pro(&self, user: &UserId) -> EntitlementResult<bool> {
        (**self).is_pro(user)
    }

    fn set_pro(&self, user: &UserId, is_pro: bool) -> EntitlementResult<()> {
        (**self).set_pro(user, is_pro)
    }

    fn usage(&self, user: &UserId, period: &PeriodKey) -> EntitlementResult<u32> {
        (**self).usage(user, period)
    }

    fn increment_usage(&self, user: &UserId, period: &PeriodKey) -> EntitlementResult<u32> {
        (**self).increment_usage(user, period)
    }

    fn claim_checkout(&self, checkout_id: &str, user: &UserId) -> EntitlementResult<bool> {
        (**self).claim_checkout(checkout_id, user)
    }
}
