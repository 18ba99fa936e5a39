//! Client metrics.
//!
//! # Metrics
//! - `transit_client_requests_total` (counter): by method, outcome
//! - `transit_client_request_duration_seconds` (histogram): by method
//! - `transit_client_cache_events_total` (counter): hit / miss / store
//! - `transit_client_retries_total` (counter): by error kind
//!
//! No exporter is installed here; the host application picks one.

use std::time::Duration;

pub fn record_request(method: &str, outcome: &'static str, elapsed: Duration) {
    metrics::counter!(
        "transit_client_requests_total",
        "method" => method.to_string(),
        "outcome" => outcome
    )
    .increment(1);
    metrics::histogram!(
        "transit_client_request_duration_seconds",
        "method" => method.to_string()
    )
    .record(elapsed.as_secs_f64());
}

pub fn record_cache_event(event: &'static str) {
    metrics::counter!("transit_client_cache_events_total", "event" => event).increment(1);
}
