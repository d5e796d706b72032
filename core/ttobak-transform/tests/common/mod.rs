#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use ttobak_transform::{GeneratorConfig, TextGenerator, TransformResult};
use wiremock::MockServer;

/// Generator that echoes a fixed reply and records every prompt.
#[derive(Default)]
pub struct RecordingGenerator {
    pub reply: String,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: reply.to_string(),
            ..Default::default()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(&self, prompt: &str) -> TransformResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }

    fn model(&self) -> &str {
        "recording"
    }
}

/// Generator config pointed at a mock server.
pub fn config_for(server: &MockServer) -> GeneratorConfig {
    GeneratorConfig {
        base_url: format!("{}/v1", server.uri()),
        api_key: "sk-test".to_string(),
        ..Default::default()
    }
}
