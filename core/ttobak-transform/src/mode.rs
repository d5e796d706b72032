//! The transform modes and their wire names.

use crate::error::TransformError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How the text should be rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Short, simple sentences.
    Easy,
    /// Three-line summary.
    Summary,
    /// Actionable checklist.
    Checklist,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Self::Easy, Self::Summary, Self::Checklist];

    /// Wire name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Summary => "summary",
            Self::Checklist => "checklist",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Easy => "쉬운 문장",
            Self::Summary => "3줄 요약",
            Self::Checklist => "체크리스트",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = TransformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| TransformError::Validation(format!("unknown mode: {s:?}")))
    }
}
