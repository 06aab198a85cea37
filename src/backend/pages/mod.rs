//! Pages Module
//!
//! Storage and CRUD for AI-generated pages.
//!
//! - **`types`** - `AiPage` row, request bodies and response shapes
//! - **`slug`** - Slug generation
//! - **`db`** - `ai_pages` queries
//! - **`handlers`** - Authenticated `/api/ai-pages` endpoints
//! - **`public`** - Unauthenticated page data by slug

pub mod db;
pub mod handlers;
pub mod public;
pub mod slug;
pub mod types;

pub use slug::generate_slug;
pub use types::{AiPage, PageResponse};
