//! Database helpers shared by the data-access modules.

pub mod retry;

pub use retry::{is_transient, with_retry, RetryPolicy};
