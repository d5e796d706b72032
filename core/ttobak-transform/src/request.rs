//! Validated transform requests and the messages sent for them.

use crate::error::{TransformError, TransformResult};
use crate::mode::Mode;
use crate::prompt::render_prompt;

/// A validated transform request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformRequest {
    text: String,
    mode: Mode,
}

impl TransformRequest {
    /// Validates `text` for a known mode.
    pub fn new(text: impl Into<String>, mode: Mode) -> TransformResult<Self> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(TransformError::Validation("text must not be empty".to_string()));
        }
        Ok(Self { text, mode })
    }

    /// Validates raw request fields, as received over the wire.
    pub fn parse(text: &str, mode: &str) -> TransformResult<Self> {
        if mode.trim().is_empty() {
            return Err(TransformError::Validation("missing mode".to_string()));
        }
        let mode = mode.parse()?;
        Self::new(text, mode)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Renders the prompt for this request.
    #[must_use]
    pub fn prompt(&self) -> String {
        render_prompt(self.mode, &self.text)
    }
}
