/**
 * Page Generator
 *
 * Runs the create and edit flows against the configured providers. With
 * both Claude and OpenAI configured, Claude is tried first and OpenAI is
 * used when Claude fails.
 */

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{info, warn};

use super::cleanup::{clean_html, extract_json};
use super::edit::{apply_plan, changes_landed, EditPlan};
use super::error::GenerationError;
use super::prompts;
use super::providers::{AnthropicProvider, CompletionRequest, LlmProvider, OpenAiProvider};
use super::settings::ApiSettings;
use crate::backend::metrics::Metrics;
use crate::shared::config::ProviderConfig;

/// Generated HTML plus SEO metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPage {
    pub html_content: String,
    pub meta_title: String,
    pub meta_description: String,
    pub og_title: String,
    pub og_description: String,
}

impl GeneratedPage {
    fn edited(title: &str, html_content: String) -> Self {
        let description = format!("Page edited: {title}");
        Self {
            html_content,
            meta_title: title.to_string(),
            meta_description: description.clone(),
            og_title: title.to_string(),
            og_description: description,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MetaSuggestion {
    meta_title: Option<String>,
    meta_description: Option<String>,
    og_title: Option<String>,
    og_description: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct PageGenerator {
    providers: Vec<Box<dyn LlmProvider>>,
    metrics: Metrics,
}

impl std::fmt::Debug for PageGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageGenerator")
            .field("providers", &self.provider_names())
            .finish()
    }
}

impl PageGenerator {
    /// Use the given providers in order; at least one is required
    pub fn new(providers: Vec<Box<dyn LlmProvider>>, metrics: Metrics) -> Result<Self, GenerationError> {
        if providers.is_empty() {
            return Err(GenerationError::NoProvider);
        }
        Ok(Self { providers, metrics })
    }

    /// Claude first when it has a key, then OpenAI
    pub fn from_settings(
        client: &Client,
        settings: &ApiSettings,
        config: &ProviderConfig,
        metrics: Metrics,
    ) -> Result<Self, GenerationError> {
        let mut providers: Vec<Box<dyn LlmProvider>> = Vec::new();
        if let Some(key) = &settings.anthropic_api_key {
            providers.push(Box::new(AnthropicProvider::new(
                client.clone(),
                key.clone(),
                config.anthropic_model.clone(),
                config.anthropic_base_url.clone(),
            )));
        }
        if let Some(key) = &settings.openai_api_key {
            providers.push(Box::new(OpenAiProvider::new(
                client.clone(),
                key.clone(),
                config.openai_model.clone(),
                config.openai_base_url.clone(),
            )));
        }
        Self::new(providers, metrics)
    }

    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    async fn complete(
        &self,
        provider: &dyn LlmProvider,
        request: &CompletionRequest,
    ) -> Result<String, GenerationError> {
        let started = Instant::now();
        let result = provider.complete(request).await;
        self.metrics.record_generation(provider.model(), started.elapsed());
        result
    }

    /// Generate a new page from a title and description
    pub async fn create_page(&self, title: &str, prompt: &str) -> Result<GeneratedPage, GenerationError> {
        let mut last_error = GenerationError::NoProvider;
        for provider in &self.providers {
            match self.create_with(provider.as_ref(), title, prompt).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    warn!("Page creation with {} failed: {}", provider.name(), e);
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    async fn create_with(
        &self,
        provider: &dyn LlmProvider,
        title: &str,
        prompt: &str,
    ) -> Result<GeneratedPage, GenerationError> {
        info!("Creating page with {} ({})", provider.name(), provider.model());

        let request = CompletionRequest::new(prompts::create_user(title, prompt))
            .with_system(prompts::create_system())
            .with_parameters(8000, 0.7);
        let html_content = clean_html(&self.complete(provider, &request).await?);

        let meta_request = CompletionRequest::new(prompts::meta_user(title, prompt))
            .with_system(prompts::META_SYSTEM)
            .with_parameters(500, 0.3);
        let meta = match self.complete(provider, &meta_request).await {
            Ok(text) => extract_json::<MetaSuggestion>(&text).unwrap_or_default(),
            Err(e) => {
                warn!("SEO metadata generation failed, using defaults: {}", e);
                MetaSuggestion::default()
            }
        };

        let default_description = format!("Page created with AI: {title}");
        Ok(GeneratedPage {
            html_content,
            meta_title: non_empty(meta.meta_title).unwrap_or_else(|| title.to_string()),
            meta_description: non_empty(meta.meta_description)
                .unwrap_or_else(|| default_description.clone()),
            og_title: non_empty(meta.og_title).unwrap_or_else(|| title.to_string()),
            og_description: non_empty(meta.og_description).unwrap_or(default_description),
        })
    }

    /// Edit an existing page according to the instructions
    pub async fn edit_page(
        &self,
        title: &str,
        current_html: &str,
        instructions: &str,
    ) -> Result<GeneratedPage, GenerationError> {
        let mut last_error = GenerationError::NoProvider;
        for provider in &self.providers {
            match self.edit_with(provider.as_ref(), title, current_html, instructions).await {
                Ok(page) => return Ok(page),
                Err(e) => {
                    warn!("Page edit with {} failed: {}", provider.name(), e);
                    last_error = e;
                }
            }
        }
        Err(last_error)
    }

    async fn edit_with(
        &self,
        provider: &dyn LlmProvider,
        title: &str,
        current_html: &str,
        instructions: &str,
    ) -> Result<GeneratedPage, GenerationError> {
        if provider.surgical_edits() {
            if let Some(html) = self.try_surgical(provider, current_html, instructions).await {
                return Ok(GeneratedPage::edited(title, clean_html(&html)));
            }
            info!("Surgical edit did not apply, falling back to a full rewrite");
        }

        let request = CompletionRequest::new(prompts::rewrite_user(current_html, instructions))
            .with_system(prompts::rewrite_system())
            .with_parameters(8000, 0.6);
        let html = self.complete(provider, &request).await?;
        Ok(GeneratedPage::edited(title, clean_html(&html)))
    }

    /// Returns the edited HTML when the change list parsed and every change landed
    async fn try_surgical(
        &self,
        provider: &dyn LlmProvider,
        current_html: &str,
        instructions: &str,
    ) -> Option<String> {
        let request = CompletionRequest::new(prompts::edit_analysis(current_html, instructions))
            .with_parameters(2000, 0.1);
        let answer = match self.complete(provider, &request).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Edit analysis failed: {}", e);
                return None;
            }
        };

        let plan: EditPlan = extract_json(&answer)?;
        if plan.changes.is_empty() {
            return None;
        }
        let html = apply_plan(current_html, &plan);
        changes_landed(&html, &plan).then_some(html)
    }
}
