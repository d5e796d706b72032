//! OpenAI-compatible chat completion client.

use crate::error::{TransformError, TransformResult};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Sampling temperature used when none is configured.
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Something that turns a prompt into generated text.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Sends `prompt` as a single user message and returns the first
    /// completion's text. A missing completion yields an empty string.
    async fn generate(&self, prompt: &str) -> TransformResult<String>;

    /// Model identifier, for logs.
    fn model(&self) -> &str;
}

/// Connection settings for an OpenAI-compatible endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// API base, up to and including the version segment
    /// (e.g. `https://api.openai.com/v1`).
    pub base_url: String,
    /// Bearer token.
    pub api_key: String,
    /// Model identifier.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Request timeout. None leaves the client default in place.
    pub timeout_secs: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// [`TextGenerator`] backed by `POST {base_url}/chat/completions`.
pub struct OpenAiGenerator {
    config: GeneratorConfig,
    client: Client,
}

impl OpenAiGenerator {
    /// Creates a generator. Fails only if the HTTP client cannot be built.
    pub fn new(config: GeneratorConfig) -> TransformResult<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| TransformError::Provider(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> TransformResult<String> {
        let body = ChatRequest {
            model: &self.config.model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: self.config.temperature,
        };

        debug!(model = %self.config.model, prompt_chars = prompt.chars().count(), "Requesting completion");

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TransformError::Provider(format!("completion request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorBody>(&error)
                .map(|b| b.error.message)
                .unwrap_or(error);
            return Err(TransformError::Provider(format!(
                "completion failed ({status}): {message}"
            )));
        }

        let completion: ChatResponse = response
            .json()
            .await
            .map_err(|e| TransformError::Provider(format!("failed to parse completion: {e}")))?;

        Ok(completion
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default())
    }

    fn model(&self) -> &str {
        &self.config.model
    }
}
