/**
 * Transient Error Retry
 *
 * Reads on hot paths (SSR, PWA, public pages) retry when the failure is a
 * dropped connection or a stale prepared statement, with a linear
 * `base_delay * attempt` backoff. Every attempt is recorded as a database
 * query in the metrics registry.
 */

use std::future::Future;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::backend::metrics::Metrics;

/// Postgres SQLSTATEs treated as transient
const TRANSIENT_CODES: &[&str] = &[
    "26000", // invalid_sql_statement_name: prepared statement vanished
    "42P05", // duplicate_prepared_statement
    "57P01", // admin_shutdown
    "08006", // connection_failure
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

impl RetryPolicy {
    /// Delay before retry number `attempt` (1-based)
    pub fn delay(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

/// Whether retrying the same query could succeed
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Io(_)
        | sqlx::Error::PoolTimedOut
        | sqlx::Error::PoolClosed
        | sqlx::Error::Protocol(_) => true,
        sqlx::Error::Database(db) => db
            .code()
            .map(|code| TRANSIENT_CODES.contains(&code.as_ref()))
            .unwrap_or(false),
        _ => false,
    }
}

/// Run `op`, retrying transient failures according to `policy`
pub async fn with_retry<T, F, Fut>(metrics: &Metrics, policy: RetryPolicy, mut op: F) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut attempt = 1;
    loop {
        let started = Instant::now();
        let result = op().await;
        metrics.record_db_query(started.elapsed());

        match result {
            Err(e) if attempt < policy.attempts && is_transient(&e) => {
                let delay = policy.delay(attempt);
                warn!(attempt, ?delay, "Transient database error, retrying: {}", e);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}
