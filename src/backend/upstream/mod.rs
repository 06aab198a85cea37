//! Main Backend Client
//!
//! Outbound calls to the main application backend: custom-domain lookup,
//! page sync and referral rewards. All three are best-effort from the
//! caller's point of view; failures are logged and never fail a request.

pub mod client;
pub mod types;

pub use client::MainBackendClient;
pub use types::{CustomDomain, PageSyncPayload};
