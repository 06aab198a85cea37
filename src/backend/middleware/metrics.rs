/**
 * HTTP Metrics Middleware
 *
 * Records `http_requests_total` and `http_request_duration_seconds` for
 * every request, labelled by the matched route template so that `/{slug}`
 * does not explode into one series per page.
 */

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::time::Instant;

use crate::backend::metrics::Metrics;

/// Route label used when no route matched
pub const UNMATCHED_ROUTE: &str = "unmatched";

pub async fn track_metrics(State(metrics): State<Metrics>, request: Request, next: Next) -> Response {
    let started = Instant::now();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED_ROUTE.to_string());

    let response = next.run(request).await;

    metrics.record_http_request(&method, &route, response.status().as_u16(), started.elapsed());
    response
}
