//! SQLite persistence for Ttobak entitlement state.
//!
//! One database file holds three tables:
//! - `profiles`: one row per authenticated user, with the pro flag
//! - `usage`: one counter per (user, period), unique on the pair
//! - `device_state`: the anonymous key/value state, scoped per device
//!
//! [`RecordDb`] implements [`ttobak_entitlement::RecordStore`], and
//! [`RecordDb::device`] hands out a [`DeviceState`] view implementing
//! [`ttobak_entitlement::LocalEntitlementStore`].

mod db;
mod device;
mod error;

pub use db::RecordDb;
pub use device::DeviceState;
pub use error::{StoreError, StoreResult};
