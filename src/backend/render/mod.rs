//! Server-side rendering of stored pages
//!
//! ```text
//! render/
//! ├── escape.rs    - HTML attribute escaping
//! ├── meta.rs      - SEO tags, tracking pixels, base CSS
//! ├── pwa_tags.rs  - PWA head tags and client script
//! ├── document.rs  - wrap fragments / inject into documents
//! ├── resolve.rs   - slug and custom-domain page resolution
//! └── handlers.rs  - `GET /{slug}` and `GET /`
//! ```

pub mod document;
pub mod escape;
pub mod handlers;
pub mod meta;
pub mod pwa_tags;
pub mod resolve;

pub use document::render_document;
pub use resolve::resolve_page;
