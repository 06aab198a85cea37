//! Metrics Module
//!
//! In-process Prometheus registry and the `/metrics` endpoints.
//!
//! - **`registry`** - Counters, gauges and histograms with text exposition
//! - **`handlers`** - HTTP endpoints for metrics, cache and database stats

pub mod handlers;
pub mod registry;

pub use registry::Metrics;
