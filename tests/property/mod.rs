//! Property-based tests

pub mod analytics_proptest;
pub mod event_proptest;
pub mod slug_proptest;
