//! Runs a transform request against a text generator.

use crate::error::TransformResult;
use crate::generator::TextGenerator;
use crate::mode::Mode;
use crate::request::TransformRequest;
use std::sync::Arc;
use tracing::{info, warn};

/// Validates, renders, and runs transform requests.
#[derive(Clone)]
pub struct Transformer {
    generator: Arc<dyn TextGenerator>,
}

impl Transformer {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }

    /// Validates the input, renders the prompt, and calls the provider once.
    ///
    /// Validation failures never reach the provider.
    pub async fn build_and_run(&self, text: &str, mode: Mode) -> TransformResult<String> {
        let request = TransformRequest::new(text, mode)?;
        self.run(&request).await
    }

    /// Runs an already validated request.
    pub async fn run(&self, request: &TransformRequest) -> TransformResult<String> {
        let prompt = request.prompt();
        match self.generator.generate(&prompt).await {
            Ok(output) => {
                info!(
                    mode = %request.mode(),
                    model = self.generator.model(),
                    output_chars = output.chars().count(),
                    "Transform completed"
                );
                Ok(output)
            }
            Err(e) => {
                warn!(mode = %request.mode(), error = %e, "Transform failed");
                Err(e)
            }
        }
    }
}
