/**
 * Generation Errors
 *
 * Failures talking to an AI provider. `BackendError` wraps these and only
 * shows the client a generic message.
 */

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// Neither Claude nor OpenAI has an API key
    #[error("No AI provider is configured. Configure at least one API key in the admin panel.")]
    NoProvider,

    /// Transport failure (connect, timeout, body decode)
    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The provider answered with a non-success status
    #[error("{provider} API error ({status}): {body}")]
    Api {
        provider: &'static str,
        status: u16,
        body: String,
    },

    /// The provider answered without any text
    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: &'static str },
}

impl GenerationError {
    pub fn http(provider: &'static str, source: reqwest::Error) -> Self {
        Self::Http { provider, source }
    }
}
