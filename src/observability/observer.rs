//! Request lifecycle hooks.
//!
//! The transport calls a [`RequestObserver`] at request start, on response
//! and on error. The default [`TracingObserver`] logs and records metrics;
//! tests install their own or [`NoopObserver`].

use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

use crate::error::ApiError;
use crate::observability::metrics;

/// Body fields whose values are masked in payload logs.
const SECRET_FIELDS: &[&str] = &["accessToken", "access_token", "token", "password"];

/// Copy of `value` with [`SECRET_FIELDS`] masked at any depth.
pub fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = if SECRET_FIELDS.contains(&k.as_str()) {
                        Value::String("[redacted]".into())
                    } else {
                        redact(v)
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

/// What an observer sees of an outgoing request. Never includes headers,
/// so the bearer token cannot leak into logs.
#[derive(Debug, Clone, Copy)]
pub struct RequestLog<'a> {
    pub request_id: Uuid,
    pub method: &'a str,
    pub path: &'a str,
    pub query: &'a str,
    pub body: Option<&'a Value>,
}

pub trait RequestObserver: Send + Sync {
    fn on_request(&self, _request: &RequestLog<'_>) {}

    fn on_response(&self, _request: &RequestLog<'_>, _status: u16, _elapsed: Duration, _body: &Value) {}

    fn on_error(&self, _request: &RequestLog<'_>, _error: &ApiError, _elapsed: Duration) {}

    fn on_cache_hit(&self, _key: &str) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl RequestObserver for NoopObserver {}

/// Logs through `tracing` and records `metrics`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver {
    log_payloads: bool,
}

impl TracingObserver {
    pub fn new(log_payloads: bool) -> Self {
        Self { log_payloads }
    }
}

impl RequestObserver for TracingObserver {
    fn on_request(&self, request: &RequestLog<'_>) {
        if self.log_payloads {
            tracing::debug!(
                request_id = %request.request_id,
                method = request.method,
                path = request.path,
                query = request.query,
                body = ?request.body.map(redact),
                "API request"
            );
        } else {
            tracing::debug!(
                request_id = %request.request_id,
                method = request.method,
                path = request.path,
                "API request"
            );
        }
    }

    fn on_response(&self, request: &RequestLog<'_>, status: u16, elapsed: Duration, body: &Value) {
        let duration_ms = elapsed.as_millis() as u64;
        if self.log_payloads {
            tracing::debug!(
                request_id = %request.request_id,
                method = request.method,
                path = request.path,
                status,
                duration_ms,
                body = %redact(body),
                "API response"
            );
        } else {
            tracing::debug!(
                request_id = %request.request_id,
                method = request.method,
                path = request.path,
                status,
                duration_ms,
                "API response"
            );
        }
        metrics::record_request(request.method, "success", elapsed);
    }

    fn on_error(&self, request: &RequestLog<'_>, error: &ApiError, elapsed: Duration) {
        tracing::warn!(
            request_id = %request.request_id,
            method = request.method,
            path = request.path,
            status = ?error.status(),
            kind = error.kind().as_str(),
            duration_ms = elapsed.as_millis() as u64,
            error = %error,
            "API error"
        );
        metrics::record_request(request.method, error.kind().as_str(), elapsed);
    }

    fn on_cache_hit(&self, key: &str) {
        tracing::debug!(key, "Cache hit");
        metrics::record_cache_event("hit");
    }
}
