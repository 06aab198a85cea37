//! Server Module
//!
//! Initialization and configuration of the Axum HTTP server.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs     - Module exports and documentation
//! ├── state.rs   - AppState and FromRef implementations
//! ├── config.rs  - Database, main database and Redis loading
//! └── init.rs    - Server initialization and app creation
//! ```
//!
//! # Initialization Flow
//!
//! 1. **Service Loading**: local database (migrated), main database, Redis
//! 2. **State Creation**: `AppState` with the metrics registry and HTTP clients
//! 3. **Background Tasks**: periodic gauge refresh
//! 4. **Router Creation**: routes and middleware layers

/// Application state management
pub mod state;

/// Service loading
pub mod config;

/// Server initialization
pub mod init;

pub use init::create_app;
pub use state::AppState;
