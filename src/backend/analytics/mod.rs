//! Analytics Module
//!
//! Page-view ingestion from the injected beacon and per-page statistics.
//!
//! - **`types`** - `PageType`, track payload, stats shapes
//! - **`db`** - `page_views` inserts and aggregate queries
//! - **`handlers`** - `/api/analytics` endpoints
//! - **`script`** - Client beacon template

pub mod db;
pub mod handlers;
pub mod script;
pub mod types;

pub use script::analytics_script;
pub use types::PageType;
