//! Integration tests against the full router

pub mod api;
pub mod cache;
pub mod database;
