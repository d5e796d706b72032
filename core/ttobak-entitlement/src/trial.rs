//! Email trial state.
//!
//! A trial starts when a caller submits a syntactically valid email and
//! grants pro for the policy's trial duration. Expiry is computed from the
//! stored start time whenever the state is read.

use crate::error::{EntitlementError, EntitlementResult};
use chrono::{DateTime, Duration, Utc};
use regex_lite::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

const DAY_MILLIS: i64 = 24 * 60 * 60 * 1000;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

/// Returns true if `email` (after trimming) looks like `local@domain.tld`.
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email.trim())
}

/// Trial state of an anonymous device.
///
/// Invariant: `active` implies `started_at` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialState {
    /// Email the trial was started with.
    pub contact_email: Option<String>,
    /// When the trial started.
    pub started_at: Option<DateTime<Utc>>,
    /// Whether the trial has been started and not yet observed as expired.
    pub active: bool,
}

impl TrialState {
    /// Starts a new trial for `email` at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`EntitlementError::InvalidEmail`] if the email is malformed.
    pub fn start(email: &str, now: DateTime<Utc>) -> EntitlementResult<Self> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(EntitlementError::InvalidEmail(email.to_string()));
        }
        Ok(Self {
            contact_email: Some(email.to_string()),
            started_at: Some(now),
            active: true,
        })
    }

    /// Returns when the trial ends, if it was ever started.
    ///
    /// An end past the representable range saturates to the latest instant.
    #[must_use]
    pub fn expires_at(&self, duration: Duration) -> Option<DateTime<Utc>> {
        self.started_at.map(|start| {
            start
                .checked_add_signed(duration)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
        })
    }

    /// Returns true if the trial grants pro at `now`.
    #[must_use]
    pub fn is_running_at(&self, now: DateTime<Utc>, duration: Duration) -> bool {
        self.active && self.expires_at(duration).is_some_and(|end| now < end)
    }

    /// Returns true if the trial is still flagged active but its time is up.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, duration: Duration) -> bool {
        self.active && self.expires_at(duration).is_some_and(|end| now >= end)
    }

    /// Whole days left at `now`, rounded up; zero once expired or never started.
    #[must_use]
    pub fn days_left_at(&self, now: DateTime<Utc>, duration: Duration) -> u32 {
        let Some(end) = self.expires_at(duration) else {
            return 0;
        };
        let millis_left = (end - now).num_milliseconds();
        if millis_left <= 0 {
            return 0;
        }
        u32::try_from((millis_left + DAY_MILLIS - 1) / DAY_MILLIS).unwrap_or(u32::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, 9, 0, 0).unwrap()
    }

    #[test]
    fn days_left_rounds_up_partial_days() {
        let trial = TrialState::start("a@b.co", start_time()).unwrap();
        let week = Duration::days(7);
        assert_eq!(trial.days_left_at(start_time(), week), 7);
        assert_eq!(trial.days_left_at(start_time() + Duration::hours(1), week), 7);
        assert_eq!(trial.days_left_at(start_time() + Duration::days(6) + Duration::hours(23), week), 1);
        assert_eq!(trial.days_left_at(start_time() + week, week), 0);
    }

    #[test]
    fn running_ends_exactly_at_duration() {
        let trial = TrialState::start("a@b.co", start_time()).unwrap();
        let week = Duration::days(7);
        let end = start_time() + week;
        assert!(trial.is_running_at(end - Duration::milliseconds(1), week));
        assert!(!trial.is_running_at(end, week));
        assert!(trial.is_expired_at(end, week));
    }

    #[test]
    fn inactive_trial_is_never_running() {
        let trial = TrialState {
            active: false,
            ..TrialState::start("a@b.co", start_time()).unwrap()
        };
        assert!(!trial.is_running_at(start_time(), Duration::days(7)));
        assert!(!trial.is_expired_at(start_time() + Duration::days(30), Duration::days(7)));
    }

    #[test]
    fn oversized_duration_saturates_end() {
        let trial = TrialState::start("a@b.co", start_time()).unwrap();
        assert_eq!(trial.expires_at(Duration::MAX), Some(DateTime::<Utc>::MAX_UTC));
        assert!(trial.is_running_at(start_time() + Duration::days(365), Duration::MAX));
        assert!(!trial.is_expired_at(start_time(), Duration::MAX));
        assert!(trial.days_left_at(start_time(), Duration::MAX) > 0);
    }
}
