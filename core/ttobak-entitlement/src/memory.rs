//! In-memory store implementations.

use crate::error::{EntitlementError, EntitlementResult};
use crate::store::{LocalEntitlementStore, RecordStore, StateKey};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use ttobak_types::{PeriodKey, UserId};

fn lock<T>(mutex: &Mutex<T>) -> EntitlementResult<MutexGuard<'_, T>> {
    mutex
        .lock()
        .map_err(|_| EntitlementError::Storage("memory store lock poisoned".to_string()))
}

/// Device state held in memory, one instance per device.
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    values: Mutex<HashMap<StateKey, String>>,
}

impl MemoryLocalStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of keys currently set.
    pub fn len(&self) -> usize {
        self.values.lock().map(|v| v.len()).unwrap_or(0)
    }

    /// Returns true if no key is set.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl LocalEntitlementStore for MemoryLocalStore {
    fn get(&self, key: StateKey) -> EntitlementResult<Option<String>> {
        Ok(lock(&self.values)?.get(&key).cloned())
    }

    fn set(&self, key: StateKey, value: &str) -> EntitlementResult<()> {
        lock(&self.values)?.insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: StateKey) -> EntitlementResult<()> {
        lock(&self.values)?.remove(&key);
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Profile {
    email: Option<String>,
    is_pro: bool,
}

/// Profile and usage records held in memory.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    profiles: Mutex<HashMap<UserId, Profile>>,
    usage: Mutex<HashMap<(UserId, PeriodKey), u32>>,
    checkouts: Mutex<HashMap<String, UserId>>,
}

impl MemoryRecordStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the email stored on a profile.
    pub fn email(&self, user: &UserId) -> Option<String> {
        self.profiles
            .lock()
            .ok()
            .and_then(|p| p.get(user).and_then(|profile| profile.email.clone()))
    }

    /// Returns the number of usage rows across all users and periods.
    pub fn usage_rows(&self) -> usize {
        self.usage.lock().map(|u| u.len()).unwrap_or(0)
    }
}

impl RecordStore for MemoryRecordStore {
    fn ensure_profile(&self, user: &UserId, email: Option<&str>) -> EntitlementResult<()> {
        let mut profiles = lock(&self.profiles)?;
        let profile = profiles.entry(*user).or_default();
        if let Some(email) = email {
            profile.email = Some(email.to_string());
        }
        Ok(())
    }

    fn is_pro(&self, user: &UserId) -> EntitlementResult<bool> {
        Ok(lock(&self.profiles)?.get(user).is_some_and(|p| p.is_pro))
    }

    fn set_pro(&self, user: &UserId, is_pro: bool) -> EntitlementResult<()> {
        lock(&self.profiles)?.entry(*user).or_default().is_pro = is_pro;
        Ok(())
    }

    fn usage(&self, user: &UserId, period: &PeriodKey) -> EntitlementResult<u32> {
        Ok(lock(&self.usage)?.get(&(*user, *period)).copied().unwrap_or(0))
    }

    fn increment_usage(&self, user: &UserId, period: &PeriodKey) -> EntitlementResult<u32> {
        let mut usage = lock(&self.usage)?;
        let count = usage.entry((*user, *period)).or_insert(0);
        *count = count.saturating_add(1);
        Ok(*count)
    }

    fn claim_checkout(&self, checkout_id: &str, user: &UserId) -> EntitlementResult<bool> {
        let mut checkouts = lock(&self.checkouts)?;
        let owner = checkouts.entry(checkout_id.to_string()).or_insert(*user);
        Ok(*owner == *user)
    }
}
