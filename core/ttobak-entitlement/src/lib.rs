//! Usage quota and trial entitlement for Ttobak.
//!
//! This crate decides, for every transform request, whether the caller may
//! proceed:
//! - Free callers get [`FREE_LIMIT`] transforms per period
//! - Anonymous devices can opt into a time-limited trial with an email address
//! - Authenticated users carry a pro flag set by checkout confirmation
//!
//! # Design
//!
//! - **One algorithm, two identity modes**: [`AnonymousMode`] and
//!   [`AuthenticatedMode`] both implement [`IdentityMode`]; the quota check in
//!   [`EntitlementEvaluator`] is written once against that trait.
//! - **Injected state**: device state is read through [`LocalEntitlementStore`]
//!   and user state through [`RecordStore`], never through globals.
//! - **Lazy expiry**: trial expiry is only observed when state is loaded. There
//!   is no background sweep.
//! - **Best-effort counting**: a failed read is treated as "not pro, zero
//!   usage"; concurrent commits may under-count.

mod error;
mod evaluator;
mod memory;
mod mode;
mod policy;
mod store;
mod trial;

pub use error::{EntitlementError, EntitlementResult};
pub use evaluator::{Commit, EntitlementEvaluator};
pub use memory::{MemoryLocalStore, MemoryRecordStore};
pub use mode::{AnonymousMode, AuthenticatedMode, IdentityMode, ProChange};
pub use policy::{
    Decision, EntitlementPolicy, EntitlementStatus, ProSource, Tier, FREE_LIMIT,
    QUOTA_EXCEEDED_MESSAGE, TRIAL_DAYS,
};
pub use store::{LocalEntitlementStore, RecordStore, StateKey};
pub use trial::{is_valid_email, TrialState};
