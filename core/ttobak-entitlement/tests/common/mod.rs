//! Shared test helpers for entitlement tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use ttobak_entitlement::{
    EntitlementError, EntitlementResult, LocalEntitlementStore, RecordStore, StateKey,
};
use ttobak_types::{PeriodKey, UserId};

/// A fixed reference instant so tests do not depend on the wall clock.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 10, 19, 9, 30, 0).unwrap()
}

/// A deterministic user id.
pub fn user(n: u8) -> UserId {
    UserId::parse(&format!("00000000-0000-4000-8000-0000000000{n:02}")).unwrap()
}

/// Device store whose every operation fails.
pub struct FailingLocalStore;

impl LocalEntitlementStore for FailingLocalStore {
    fn get(&self, _key: StateKey) -> EntitlementResult<Option<String>> {
        Err(EntitlementError::Storage("unavailable".into()))
    }

    fn set(&self, _key: StateKey, _value: &str) -> EntitlementResult<()> {
        Err(EntitlementError::Storage("unavailable".into()))
    }

    fn remove(&self, _key: StateKey) -> EntitlementResult<()> {
        Err(EntitlementError::Storage("unavailable".into()))
    }
}

/// Record store whose every operation fails.
pub struct FailingRecordStore;

impl RecordStore for FailingRecordStore {
    fn ensure_profile(&self, _user: &UserId, _email: Option<&str>) -> EntitlementResult<()> {
        Err(EntitlementError::Storage("unavailable".into()))
    }

    fn is_pro(&self, _user: &UserId) -> EntitlementResult<bool> {
        Err(EntitlementError::Storage("unavailable".into()))
    }

    fn set_pro(&self, _user: &UserId, _is_pro: bool) -> EntitlementResult<()> {
        Err(EntitlementError::Storage("unavailable".into()))
    }

    fn usage(&self, _user: &UserId, _period: &PeriodKey) -> EntitlementResult<u32> {
        Err(EntitlementError::Storage("unavailable".into()))
    }

    fn increment_usage(&self, _user: &UserId, _period: &PeriodKey) -> EntitlementResult<u32> {
        Err(EntitlementError::Storage("unavailable".into()))
    }

    fn claim_checkout(&self, _checkout_id: &str, _user: &UserId) -> EntitlementResult<bool> {
        Err(EntitlementError::Storage("unavailable".into()))
    }
}
