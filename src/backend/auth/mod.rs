//! Authentication Module
//!
//! Bearer-token verification and the local copy of users owned by the main
//! application.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs       - Module exports and documentation
//! ├── sessions.rs  - JWT claims, token creation and verification
//! └── users.rs     - Local user table and main-database user lookup
//! ```
//!
//! # Authentication Flow
//!
//! 1. The main application signs an HS256 token with the shared `JWT_SECRET`
//! 2. `auth_middleware` verifies it and attaches an `AuthenticatedUser`
//! 3. `ensure_user_exists` copies the user from the main database on first use
//!
//! This service never issues tokens to clients; `create_token` exists for
//! tooling and tests.

/// JWT claims and verification
pub mod sessions;

/// User records (local and main database)
pub mod users;

pub use sessions::{create_token, verify_token, Claims, Role};
pub use users::User;
