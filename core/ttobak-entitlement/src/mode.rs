//! The two identity modes a session can run under.
//!
//! Both satisfy [`IdentityMode`], so [`crate::EntitlementEvaluator`] runs the
//! same quota algorithm regardless of where the state lives.

use crate::error::{EntitlementError, EntitlementResult};
use crate::policy::{EntitlementPolicy, ProSource};
use crate::store::{LocalEntitlementStore, RecordStore, StateKey};
use crate::trial::TrialState;
use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use ttobak_types::{IdentityKind, PeriodKey, UserId};

/// Per-session view of an identity's entitlement state.
pub trait IdentityMode: Send + Sync {
    /// Which identity kind this mode serves.
    fn kind(&self) -> IdentityKind;

    /// Returns what grants pro at `now`, or None for the free tier.
    fn pro_source_at(
        &self,
        now: DateTime<Utc>,
        policy: &EntitlementPolicy,
    ) -> EntitlementResult<Option<ProSource>>;

    /// The usage period that applies at `now`.
    fn period_at(&self, now: DateTime<Utc>) -> PeriodKey;

    /// Reads the usage count for a period.
    fn usage(&self, period: &PeriodKey) -> EntitlementResult<u32>;

    /// Adds one to the usage count for a period and returns the new count.
    fn record_usage(&self, period: &PeriodKey) -> EntitlementResult<u32>;
}

// ── Anonymous ────────────────────────────────────────────────────

/// Anonymous device whose usage and trial live in a [`LocalEntitlementStore`].
///
/// Usage is counted over the device's lifetime.
#[derive(Debug)]
pub struct AnonymousMode<S> {
    store: S,
}

impl<S: LocalEntitlementStore> AnonymousMode<S> {
    /// Wraps a device store.
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads the trial, marking it inactive if it is found expired.
    pub fn load_trial_at(
        &self,
        now: DateTime<Utc>,
        policy: &EntitlementPolicy,
    ) -> EntitlementResult<TrialState> {
        let contact_email = self.store.get(StateKey::TrialEmail)?.filter(|e| !e.is_empty());
        let started_at = self
            .store
            .get(StateKey::TrialStart)?
            .and_then(|v| v.trim().parse::<i64>().ok())
            .filter(|millis| *millis > 0)
            .and_then(DateTime::from_timestamp_millis);
        let active = self.store.get(StateKey::TrialActive)?.as_deref() == Some("true");

        let mut trial = TrialState {
            contact_email,
            started_at,
            active,
        };

        if trial.is_expired_at(now, policy.trial_duration()) {
            debug!("Trial expired, marking inactive");
            self.store.set(StateKey::TrialActive, "false")?;
            trial.active = false;
        }

        Ok(trial)
    }

    /// Starts a trial for `email` at `now`.
    ///
    /// The email is validated before anything is written.
    pub fn start_trial_at(&self, email: &str, now: DateTime<Utc>) -> EntitlementResult<TrialState> {
        let trial = TrialState::start(email, now)?;

        let email = trial.contact_email.as_deref().unwrap_or_default();
        self.store.set(StateKey::TrialEmail, email)?;
        self.store
            .set(StateKey::TrialStart, &now.timestamp_millis().to_string())?;
        self.store.set(StateKey::TrialActive, "true")?;

        info!(started_at = %now, "Trial started");
        Ok(trial)
    }

    /// Starts a trial for `email` now.
    pub fn start_trial(&self, email: &str) -> EntitlementResult<TrialState> {
        self.start_trial_at(email, Utc::now())
    }

    /// Clears the trial (demo/operator action).
    pub fn reset_trial(&self) -> EntitlementResult<()> {
        self.store.remove(StateKey::TrialEmail)?;
        self.store.remove(StateKey::TrialStart)?;
        self.store.set(StateKey::TrialActive, "false")?;
        info!("Trial reset");
        Ok(())
    }
}

impl<S: LocalEntitlementStore> IdentityMode for AnonymousMode<S> {
    fn kind(&self) -> IdentityKind {
        IdentityKind::Anonymous
    }

    fn pro_source_at(
        &self,
        now: DateTime<Utc>,
        policy: &EntitlementPolicy,
    ) -> EntitlementResult<Option<ProSource>> {
        let duration = policy.trial_duration();
        let trial = self.load_trial_at(now, policy)?;
        if trial.is_running_at(now, duration) {
            Ok(Some(ProSource::Trial {
                days_left: trial.days_left_at(now, duration),
            }))
        } else {
            Ok(None)
        }
    }

    fn period_at(&self, _now: DateTime<Utc>) -> PeriodKey {
        PeriodKey::Lifetime
    }

    fn usage(&self, _period: &PeriodKey) -> EntitlementResult<u32> {
        // Unparseable counts read as zero.
        Ok(self
            .store
            .get(StateKey::UsageCount)?
            .and_then(|v| v.trim().parse::<u32>().ok())
            .unwrap_or(0))
    }

    fn record_usage(&self, period: &PeriodKey) -> EntitlementResult<u32> {
        let next = self.usage(period)?.saturating_add(1);
        self.store.set(StateKey::UsageCount, &next.to_string())?;
        Ok(next)
    }
}

// ── Authenticated ────────────────────────────────────────────────

/// A change to a user's pro flag.
///
/// Checkout confirmation and the demo toggle both go through
/// [`AuthenticatedMode::apply_pro_change`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProChange {
    /// A verified, succeeded checkout.
    Checkout {
        /// Provider checkout identifier.
        checkout_id: String,
    },
    /// Direct toggle from the demo surface.
    Demo {
        /// Target flag value.
        is_pro: bool,
    },
}

impl ProChange {
    /// The flag value this change sets.
    #[must_use]
    pub fn is_pro(&self) -> bool {
        match self {
            Self::Checkout { .. } => true,
            Self::Demo { is_pro } => *is_pro,
        }
    }

    /// Short label for logs.
    #[must_use]
    pub fn source(&self) -> &'static str {
        match self {
            Self::Checkout { .. } => "checkout",
            Self::Demo { .. } => "demo",
        }
    }
}

/// Authenticated user whose pro flag and usage live in a [`RecordStore`].
///
/// Usage is counted per UTC calendar day.
#[derive(Debug)]
pub struct AuthenticatedMode<R> {
    store: R,
    user_id: UserId,
}

impl<R: RecordStore> AuthenticatedMode<R> {
    /// Binds a record store to a user.
    pub fn new(store: R, user_id: UserId) -> Self {
        Self { store, user_id }
    }

    /// Returns the user this mode is bound to.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    /// Applies an upgrade or downgrade and returns the new flag value.
    ///
    /// A checkout upgrades only the first user that presents it.
    pub fn apply_pro_change(&self, change: &ProChange) -> EntitlementResult<bool> {
        if let ProChange::Checkout { checkout_id } = change {
            if !self.store.claim_checkout(checkout_id, &self.user_id)? {
                warn!(user = %self.user_id, checkout = %checkout_id, "Checkout already redeemed");
                return Err(EntitlementError::CheckoutAlreadyRedeemed(checkout_id.clone()));
            }
        }
        let is_pro = change.is_pro();
        self.store.set_pro(&self.user_id, is_pro)?;
        info!(user = %self.user_id, source = change.source(), is_pro, "Pro flag updated");
        Ok(is_pro)
    }
}

impl<R: RecordStore> IdentityMode for AuthenticatedMode<R> {
    fn kind(&self) -> IdentityKind {
        IdentityKind::Authenticated
    }

    fn pro_source_at(
        &self,
        _now: DateTime<Utc>,
        _policy: &EntitlementPolicy,
    ) -> EntitlementResult<Option<ProSource>> {
        Ok(self
            .store
            .is_pro(&self.user_id)?
            .then_some(ProSource::Subscription))
    }

    fn period_at(&self, now: DateTime<Utc>) -> PeriodKey {
        PeriodKey::day_of(now)
    }

    fn usage(&self, period: &PeriodKey) -> EntitlementResult<u32> {
        self.store.usage(&self.user_id, period)
    }

    fn record_usage(&self, period: &PeriodKey) -> EntitlementResult<u32> {
        self.store.increment_usage(&self.user_id, period)
    }
}

