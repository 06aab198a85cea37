//! Application configuration module
//!
//! Everything the service reads from the environment is collected into a
//! single [`AppConfig`]. `from_env` is what the binary uses; tests build a
//! config with [`AppConfig::builder`] or feed [`AppConfig::from_lookup`] a
//! map so they never have to mutate the process environment.

use std::collections::HashMap;
use std::fmt::Display;
use reqwest::Url;
use std::str::FromStr;
use thiserror::Error;

/// Default HTTP port
pub const DEFAULT_PORT: u16 = 3002;

/// Default request body limit (50 MB)
pub const DEFAULT_BODY_LIMIT: usize = 50 * 1024 * 1024;

const DEFAULT_JWT_SECRET: &str = "your-secret-key";
const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";
const DEFAULT_INTERNAL_API_KEY: &str = "internal-sync-key";
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:8080,http://localhost:3000";
const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-5-20250929";
const DEFAULT_OPENAI_MODEL: &str = "gpt-5";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// HTTP listen port
    pub port: u16,
    /// Microservice database (pages, local users, page views)
    pub database_url: Option<String>,
    /// Main platform database (users, plans, credits, system settings)
    pub main_database_url: Option<String>,
    /// Redis connection URL; `None` disables caching
    pub redis_url: Option<String>,
    /// HS256 secret shared with the main backend
    pub jwt_secret: String,
    /// Base URL of the main backend
    pub backend_url: String,
    /// Bearer token for service-to-service calls to the main backend
    pub internal_api_key: String,
    /// CORS allow-list
    pub allowed_origins: Vec<String>,
    /// Maximum accepted request body size in bytes
    pub body_limit: usize,
    /// AI provider endpoints and fallback keys
    pub providers: ProviderConfig,
}

/// AI provider settings
///
/// Keys configured here are only a fallback: the admin panel stores the
/// authoritative keys in the main database.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub anthropic_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub anthropic_base_url: String,
    pub openai_base_url: String,
    pub anthropic_model: String,
    pub openai_model: String,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            anthropic_api_key: None,
            openai_api_key: None,
            anthropic_base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            anthropic_model: DEFAULT_ANTHROPIC_MODEL.to_string(),
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            database_url: None,
            main_database_url: None,
            redis_url: None,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            internal_api_key: DEFAULT_INTERNAL_API_KEY.to_string(),
            allowed_origins: split_origins(DEFAULT_ALLOWED_ORIGINS),
            body_limit: DEFAULT_BODY_LIMIT,
            providers: ProviderConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create a new AppConfigBuilder
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder::default()
    }

    /// Load the configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration from an arbitrary key lookup
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let redis_url = match (var("REDIS_URL"), var("REDIS_HOST")) {
            (Some(url), _) => Some(url),
            (None, Some(host)) => {
                let port = var("REDIS_PORT").unwrap_or_else(|| "6379".to_string());
                Some(redis_host_url(&host, &port, var("REDIS_PASSWORD").as_deref())?)
            }
            (None, None) => None,
        };

        let config = Self {
            port: parse_or(var("PORT"), "PORT", defaults.port)?,
            database_url: var("DATABASE_URL"),
            main_database_url: var("MAIN_DATABASE_URL"),
            redis_url,
            jwt_secret: var("JWT_SECRET").unwrap_or(defaults.jwt_secret),
            backend_url: var("BACKEND_URL").unwrap_or(defaults.backend_url),
            internal_api_key: var("INTERNAL_API_KEY").unwrap_or(defaults.internal_api_key),
            allowed_origins: var("ALLOWED_ORIGINS")
                .map(|origins| split_origins(&origins))
                .unwrap_or(defaults.allowed_origins),
            body_limit: parse_or(var("BODY_LIMIT_BYTES"), "BODY_LIMIT_BYTES", defaults.body_limit)?,
            providers: ProviderConfig {
                anthropic_api_key: var("ANTHROPIC_API_KEY"),
                openai_api_key: var("OPENAI_API_KEY"),
                anthropic_base_url: var("ANTHROPIC_BASE_URL")
                    .unwrap_or(defaults.providers.anthropic_base_url),
                openai_base_url: var("OPENAI_BASE_URL")
                    .unwrap_or(defaults.providers.openai_base_url),
                anthropic_model: var("ANTHROPIC_MODEL")
                    .unwrap_or(defaults.providers.anthropic_model),
                openai_model: var("OPENAI_MODEL").unwrap_or(defaults.providers.openai_model),
            },
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, url) in [
            ("BACKEND_URL", &self.backend_url),
            ("ANTHROPIC_BASE_URL", &self.providers.anthropic_base_url),
            ("OPENAI_BASE_URL", &self.providers.openai_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ConfigError::InvalidUrl(format!("{name}={url}")));
            }
        }
        if self.jwt_secret.is_empty() {
            return Err(ConfigError::MissingValue("JWT_SECRET"));
        }
        Ok(())
    }

    /// Whether the JWT secret is still the insecure development default
    pub fn uses_default_jwt_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }
}

/// Builder for AppConfig
#[derive(Debug, Default)]
pub struct AppConfigBuilder {
    values: HashMap<&'static str, String>,
}

impl AppConfigBuilder {
    fn set(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(key, value.into());
        self
    }

    /// Set the listen port
    pub fn port(self, port: u16) -> Self {
        self.set("PORT", port.to_string())
    }

    /// Set the microservice database URL
    pub fn database_url(self, url: impl Into<String>) -> Self {
        self.set("DATABASE_URL", url)
    }

    /// Set the main database URL
    pub fn main_database_url(self, url: impl Into<String>) -> Self {
        self.set("MAIN_DATABASE_URL", url)
    }

    /// Set the Redis URL
    pub fn redis_url(self, url: impl Into<String>) -> Self {
        self.set("REDIS_URL", url)
    }

    /// Set the JWT secret
    pub fn jwt_secret(self, secret: impl Into<String>) -> Self {
        self.set("JWT_SECRET", secret)
    }

    /// Set the main backend URL
    pub fn backend_url(self, url: impl Into<String>) -> Self {
        self.set("BACKEND_URL", url)
    }

    /// Set the internal service key
    pub fn internal_api_key(self, key: impl Into<String>) -> Self {
        self.set("INTERNAL_API_KEY", key)
    }

    /// Set the comma-separated CORS allow-list
    pub fn allowed_origins(self, origins: impl Into<String>) -> Self {
        self.set("ALLOWED_ORIGINS", origins)
    }

    /// Set the Anthropic key and endpoint
    pub fn anthropic(self, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.set("ANTHROPIC_API_KEY", api_key)
            .set("ANTHROPIC_BASE_URL", base_url)
    }

    /// Set the OpenAI key and endpoint
    pub fn openai(self, api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.set("OPENAI_API_KEY", api_key)
            .set("OPENAI_BASE_URL", base_url)
    }

    /// Build the configuration
    pub fn build(self) -> Result<AppConfig, ConfigError> {
        let values = self.values;
        AppConfig::from_lookup(|key| values.get(key).cloned())
    }
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),
    #[error("missing value: {0}")]
    MissingValue(&'static str),
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: &'static str, message: String },
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}

/// TLS Redis URL from host parts; the password is percent-encoded
fn redis_host_url(host: &str, port: &str, password: Option<&str>) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidUrl(format!("REDIS_HOST={host}:{port}"));
    let mut url = Url::parse(&format!("rediss://{host}:{port}")).map_err(|_| invalid())?;
    if let Some(password) = password {
        url.set_password(Some(password)).map_err(|_| invalid())?;
    }
    Ok(url.to_string())
}

fn split_origins(origins: &str) -> Vec<String> {
    origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
