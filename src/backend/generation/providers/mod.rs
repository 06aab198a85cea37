//! AI Providers
//!
//! One `LlmProvider` per vendor API. Providers are built per request from the
//! resolved API settings, so a key changed in the admin panel takes effect
//! once the settings cache expires.

use async_trait::async_trait;
use std::time::Duration;

use super::error::GenerationError;

pub mod anthropic;
pub mod openai;

pub use anthropic::AnthropicProvider;
pub use openai::OpenAiProvider;

/// Request timeout for provider calls
pub const PROVIDER_TIMEOUT: Duration = Duration::from_secs(120);

/// A single prompt/answer exchange
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub user: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            max_tokens: 8000,
            temperature: 0.7,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_parameters(mut self, max_tokens: u32, temperature: f32) -> Self {
        self.max_tokens = max_tokens;
        self.temperature = temperature;
        self
    }
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Short provider name used in logs and metrics labels
    fn name(&self) -> &'static str;

    fn model(&self) -> &str;

    /// Whether edits should first try the JSON change-list flow
    fn surgical_edits(&self) -> bool {
        false
    }

    /// Send the request and return the text of the first answer
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GenerationError>;
}
