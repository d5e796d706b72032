//! The quota gate.
//!
//! For each request: resolve the tier, allow pro unconditionally, allow free
//! callers below the limit, and count usage only after the gated action
//! succeeded. Reads are best-effort: a failing store resolves to the free
//! tier with zero usage instead of blocking the request.

use crate::error::EntitlementResult;
use crate::mode::IdentityMode;
use crate::policy::{Decision, EntitlementPolicy, EntitlementStatus, ProSource, Tier};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use ttobak_types::PeriodKey;

/// What a commit did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "commit", rename_all = "lowercase")]
pub enum Commit {
    /// Pro tier; nothing was counted.
    Untracked,
    /// The period counter was incremented.
    Counted {
        /// Period that was counted.
        period: PeriodKey,
        /// Count after the increment.
        count: u32,
    },
}

/// Decides ALLOW/DENY for transform requests and counts honored requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntitlementEvaluator {
    policy: EntitlementPolicy,
}

impl EntitlementEvaluator {
    /// Creates an evaluator with the given policy.
    #[must_use]
    pub fn new(policy: EntitlementPolicy) -> Self {
        Self { policy }
    }

    /// Returns the policy.
    #[must_use]
    pub fn policy(&self) -> &EntitlementPolicy {
        &self.policy
    }

    /// Gate check at the current time.
    pub fn evaluate<M: IdentityMode + ?Sized>(&self, mode: &M) -> Decision {
        self.evaluate_at(mode, Utc::now())
    }

    /// Gate check at `now`.
    pub fn evaluate_at<M: IdentityMode + ?Sized>(&self, mode: &M, now: DateTime<Utc>) -> Decision {
        if let Some(source) = self.pro_source(mode, now) {
            debug!(identity = %mode.kind(), ?source, "Pro tier, allowing");
            return Decision::Allow { tier: Tier::Pro };
        }

        let period = mode.period_at(now);
        let used = self.usage(mode, &period);
        let limit = self.policy.free_limit;
        if used >= limit {
            info!(identity = %mode.kind(), %period, used, limit, "Free quota exhausted");
            Decision::Deny { used, limit }
        } else {
            debug!(identity = %mode.kind(), %period, used, limit, "Free tier, allowing");
            Decision::Allow { tier: Tier::Free }
        }
    }

    /// Counts one honored request at the current time.
    pub fn commit<M: IdentityMode + ?Sized>(&self, mode: &M) -> EntitlementResult<Commit> {
        self.commit_at(mode, Utc::now())
    }

    /// Counts one honored request at `now`. A no-op for the pro tier.
    ///
    /// Call at most once per successful transform; there is no
    /// de-duplication.
    pub fn commit_at<M: IdentityMode + ?Sized>(
        &self,
        mode: &M,
        now: DateTime<Utc>,
    ) -> EntitlementResult<Commit> {
        if self.pro_source(mode, now).is_some() {
            return Ok(Commit::Untracked);
        }
        let period = mode.period_at(now);
        let count = mode.record_usage(&period)?;
        debug!(identity = %mode.kind(), %period, count, "Usage recorded");
        Ok(Commit::Counted { period, count })
    }

    /// Resolves the tier at `now`.
    pub fn tier_at<M: IdentityMode + ?Sized>(&self, mode: &M, now: DateTime<Utc>) -> Tier {
        if self.pro_source(mode, now).is_some() {
            Tier::Pro
        } else {
            Tier::Free
        }
    }

    /// Displayable status at the current time.
    pub fn status<M: IdentityMode + ?Sized>(&self, mode: &M) -> EntitlementStatus {
        self.status_at(mode, Utc::now())
    }

    /// Displayable status at `now`.
    pub fn status_at<M: IdentityMode + ?Sized>(
        &self,
        mode: &M,
        now: DateTime<Utc>,
    ) -> EntitlementStatus {
        if let Some(source) = self.pro_source(mode, now) {
            return EntitlementStatus::Pro { source };
        }
        let used = self.usage(mode, &mode.period_at(now));
        let limit = self.policy.free_limit;
        EntitlementStatus::Free {
            used,
            remaining: limit.saturating_sub(used),
            limit,
        }
    }

    fn pro_source<M: IdentityMode + ?Sized>(&self, mode: &M, now: DateTime<Utc>) -> Option<ProSource> {
        mode.pro_source_at(now, &self.policy).unwrap_or_else(|e| {
            warn!(identity = %mode.kind(), error = %e, "Failed to read pro state, assuming free");
            None
        })
    }

    fn usage<M: IdentityMode + ?Sized>(&self, mode: &M, period: &PeriodKey) -> u32 {
        mode.usage(period).unwrap_or_else(|e| {
            warn!(identity = %mode.kind(), %period, error = %e, "Failed to read usage, assuming zero");
            0
        })
    }
}
