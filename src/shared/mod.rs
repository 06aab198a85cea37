//! Shared Module
//!
//! Types that are independent of the HTTP server: the events pushed over the
//! page generation stream, the application configuration and the shared
//! error type.

/// Page generation stream events
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use event::{GenerationEvent, StreamedPage};
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
