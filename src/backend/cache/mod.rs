//! Cache Module
//!
//! Redis cache-aside layer for rendered pages, PWA assets and provider
//! settings.
//!
//! # Module Structure
//!
//! ```text
//! cache/
//! ├── mod.rs    - Module exports
//! ├── client.rs - CacheService (Redis ConnectionManager wrapper)
//! └── keys.rs   - Key builders and TTLs
//! ```

pub mod client;
pub mod keys;

pub use client::{CacheService, CacheStats, DEFAULT_TTL_SECS};
pub use keys::PwaAsset;
