//! Outgoing request description.

use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::cache::cache_key;
use crate::client::query::QueryParams;
use crate::error::{ApiError, ApiResult};

/// How one call uses the cache and retry layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CallPolicy {
    /// Serve from and populate the response cache for this long. GET only.
    pub cache_ttl: Option<Duration>,
    /// Route through the retry policy.
    pub retry: bool,
}

/// A request against the backend, relative to the configured base URL.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: QueryParams,
    pub body: Option<Value>,
    pub policy: CallPolicy,
}

impl ApiRequest {
    /// Reads retry by default; mutations never do.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        let retry = method == Method::GET;
        Self {
            method,
            path: path.into(),
            query: QueryParams::new(),
            body: None,
            policy: CallPolicy {
                cache_ttl: None,
                retry,
            },
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn query(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Attach a JSON body.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> ApiResult<Self> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::validation(format!("Invalid request body: {e}")))?;
        self.body = Some(value);
        Ok(self)
    }

    /// Cache the response for `ttl`; `None` disables caching.
    pub fn cached(mut self, ttl: Option<Duration>) -> Self {
        self.policy.cache_ttl = ttl;
        self
    }

    pub fn retry(mut self, retry: bool) -> Self {
        self.policy.retry = retry;
        self
    }

    /// TTL to apply, if this request may use the cache at all.
    pub fn cache_ttl(&self) -> Option<Duration> {
        if self.method == Method::GET {
            self.policy.cache_ttl
        } else {
            None
        }
    }

    pub fn cache_key(&self) -> String {
        cache_key(&self.path, &self.query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policies() {
        assert!(ApiRequest::get("/routes").policy.retry);
        assert!(!ApiRequest::post("/bookings").policy.retry);
        assert!(!ApiRequest::put("/bookings/1/cancel").policy.retry);
    }

    #[test]
    fn test_only_get_is_cacheable() {
        let ttl = Some(Duration::from_secs(60));
        assert_eq!(ApiRequest::get("/routes").cached(ttl).cache_ttl(), ttl);
        assert_eq!(ApiRequest::post("/routes").cached(ttl).cache_ttl(), None);
    }

    #[test]
    fn test_cache_key_includes_query() {
        let req = ApiRequest::get("/trips/upcoming").query(QueryParams::new().with("route_id", 4));
        assert_eq!(req.cache_key(), "/trips/upcoming?route_id=4");
    }
}
