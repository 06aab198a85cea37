//! Generation Module
//!
//! AI page generation through Claude and OpenAI.
//!
//! # Module Structure
//!
//! ```text
//! generation/
//! ├── mod.rs        - Module exports, generator resolution
//! ├── error.rs      - GenerationError
//! ├── providers/    - LlmProvider trait, Anthropic and OpenAI clients
//! ├── settings.rs   - API key lookup (cache, main DB, local DB, env)
//! ├── prompts.rs    - Prompt templates
//! ├── cleanup.rs    - HTML cleanup and JSON extraction
//! ├── edit.rs       - Surgical change application
//! ├── generator.rs  - PageGenerator (create / edit flows)
//! └── stream.rs     - SSE generation endpoint
//! ```

pub mod cleanup;
pub mod edit;
pub mod error;
pub mod generator;
pub mod prompts;
pub mod providers;
pub mod settings;
pub mod stream;

pub use error::GenerationError;
pub use generator::{GeneratedPage, PageGenerator};
pub use settings::ApiSettings;

use crate::backend::server::state::AppState;

/// Build a generator from the current API settings
pub async fn resolve_generator(state: &AppState) -> Result<PageGenerator, GenerationError> {
    let settings = settings::load_api_settings(
        &state.cache,
        state.main_db_pool.as_ref(),
        state.db_pool.as_ref(),
        &state.config.providers,
    )
    .await;

    PageGenerator::from_settings(
        &state.http_client,
        &settings,
        &state.config.providers,
        state.metrics.clone(),
    )
}
