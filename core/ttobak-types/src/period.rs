//! Usage period keys.
//!
//! A usage counter is kept per (identity, period). Anonymous devices count
//! over their whole lifetime, authenticated users per UTC calendar day.

use crate::Error;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const LIFETIME: &str = "all-time";
const DAY_FORMAT: &str = "%Y-%m-%d";

/// The period a usage counter applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum PeriodKey {
    /// A single counter for the identity's entire history.
    Lifetime,
    /// One counter per calendar day (UTC).
    Day(NaiveDate),
}

impl PeriodKey {
    /// Returns the day key containing `at`.
    #[must_use]
    pub fn day_of(at: DateTime<Utc>) -> Self {
        Self::Day(at.date_naive())
    }

    /// Returns the day key for the current UTC date.
    #[must_use]
    pub fn today() -> Self {
        Self::day_of(Utc::now())
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lifetime => f.write_str(LIFETIME),
            Self::Day(date) => write!(f, "{}", date.format(DAY_FORMAT)),
        }
    }
}

impl FromStr for PeriodKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == LIFETIME {
            return Ok(Self::Lifetime);
        }
        NaiveDate::parse_from_str(s, DAY_FORMAT)
            .map(Self::Day)
            .map_err(|e| Error::InvalidPeriod(format!("{s}: {e}")))
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
