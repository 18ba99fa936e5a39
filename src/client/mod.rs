//! Transport client for the transit backend.
//!
//! # Data Flow
//! ```text
//! ApiClient::send(ApiRequest)
//!     → cache lookup (GET with a TTL policy only; hits skip everything below)
//!     → retry loop (idempotent reads only)
//!         → queue admission (one slot per attempt)
//!             → attach bearer token + request id, enforce timeout
//!             → classify: non-2xx → ApiError, 401 → forced logout + redirect
//!             → envelope decode: status "error" → logical ApiError
//!     → cache store on success
//!     → typed decode of `data`
//! ```
//!
//! # Design Decisions
//! - A queue slot is never held across a retry backoff sleep
//! - Every failure is classified here once and passed up unchanged

pub mod envelope;
pub mod query;
pub mod request;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};
use thiserror::Error;
use uuid::Uuid;

pub use envelope::{ApiResponse, Envelope};
pub use query::QueryParams;
pub use request::{ApiRequest, CallPolicy};

use crate::cache::ResponseCache;
use crate::config::validation::{validate_config, ValidationError};
use crate::config::{CacheClass, CacheConfig, ClientConfig};
use crate::error::{ApiError, ApiResult};
use crate::observability::logging::payload_logging_enabled;
use crate::observability::{metrics, RequestLog, RequestObserver, TracingObserver};
use crate::queue::RequestQueue;
use crate::resilience::RetryPolicy;
use crate::session::{
    login_redirect, FileTokenStore, MemoryTokenStore, Navigator, NoopNavigator, Session,
    SessionEvent, TokenStore,
};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

/// Errors constructing an [`ApiClient`].
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Invalid configuration: {}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))]
    InvalidConfig(Vec<ValidationError>),

    #[error("Failed to build HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result of `GET /health`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub latency_ms: u64,
    pub checked_at: u64,
    pub error: Option<String>,
}

/// Single choke point for all calls to the backend. Cheap to clone.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
    login_path: String,
    cache_config: CacheConfig,
    session: Session,
    cache: ResponseCache<ApiResponse<Value>>,
    queue: RequestQueue,
    retry: RetryPolicy,
    observer: Arc<dyn RequestObserver>,
    navigator: Arc<dyn Navigator>,
}

/// Builder for [`ApiClient`].
pub struct ApiClientBuilder {
    config: ClientConfig,
    observer: Option<Arc<dyn RequestObserver>>,
    navigator: Option<Arc<dyn Navigator>>,
    token_store: Option<Arc<dyn TokenStore>>,
}

impl ApiClientBuilder {
    /// Replace the default [`TracingObserver`].
    pub fn observer(mut self, observer: Arc<dyn RequestObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Install the view router used for login redirects.
    pub fn navigator(mut self, navigator: Arc<dyn Navigator>) -> Self {
        self.navigator = Some(navigator);
        self
    }

    /// Override where the session token is persisted.
    pub fn token_store(mut self, store: Arc<dyn TokenStore>) -> Self {
        self.token_store = Some(store);
        self
    }

    pub fn build(self) -> Result<ApiClient, BuildError> {
        let config = self.config;
        validate_config(&config).map_err(BuildError::InvalidConfig)?;

        let http = reqwest::Client::builder()
            .connect_timeout(config.api.connect_timeout())
            .user_agent(concat!("transit-client/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let token_store = self.token_store.unwrap_or_else(|| match &config.session.token_path {
            Some(path) => Arc::new(FileTokenStore::new(path)) as Arc<dyn TokenStore>,
            None => Arc::new(MemoryTokenStore::new()) as Arc<dyn TokenStore>,
        });
        let observer = self.observer.unwrap_or_else(|| {
            let log_payloads = payload_logging_enabled(&config.observability);
            Arc::new(TracingObserver::new(log_payloads)) as Arc<dyn RequestObserver>
        });
        let navigator = self
            .navigator
            .unwrap_or_else(|| Arc::new(NoopNavigator) as Arc<dyn Navigator>);

        let cache = ResponseCache::new();
        let session = Session::new(token_store, cache.clone());

        tracing::info!(
            base_url = %config.api.base_url,
            timeout_secs = config.api.timeout_secs,
            max_concurrent = config.queue.max_concurrent,
            max_attempts = config.retries.max_attempts,
            "API client initialized"
        );

        Ok(ApiClient {
            inner: Arc::new(ClientInner {
                http,
                base_url: config.api.base_url.trim_end_matches('/').to_string(),
                timeout: config.api.timeout(),
                login_path: config.session.login_path.clone(),
                cache_config: config.cache.clone(),
                session,
                cache,
                queue: RequestQueue::new(config.queue.max_concurrent),
                retry: RetryPolicy::from_config(&config.retries),
                observer,
                navigator,
            }),
        })
    }
}

impl ApiClient {
    pub fn builder(config: ClientConfig) -> ApiClientBuilder {
        ApiClientBuilder {
            config,
            observer: None,
            navigator: None,
            token_store: None,
        }
    }

    /// Client with default settings against `base_url`.
    pub fn new(base_url: impl Into<String>) -> Result<Self, BuildError> {
        let mut config = ClientConfig::default();
        config.api.base_url = base_url.into();
        Self::builder(config).build()
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn cache(&self) -> &ResponseCache<ApiResponse<Value>> {
        &self.inner.cache
    }

    pub fn queue(&self) -> &RequestQueue {
        &self.inner.queue
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Configured TTL for an endpoint class.
    pub fn cache_ttl(&self, class: CacheClass) -> Option<Duration> {
        self.inner.cache_config.ttl(class)
    }

    /// Evict cached responses whose key starts with `prefix`.
    pub fn invalidate(&self, prefix: &str) -> usize {
        self.inner.cache.invalidate_prefix(prefix)
    }

    /// Send `request` and deserialize the envelope's `data`.
    pub async fn send<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<ApiResponse<T>> {
        self.send_raw(&request).await?.decode()
    }

    /// Like [`send`](Self::send), returning only the data.
    pub async fn fetch<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        Ok(self.send(request).await?.data)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<ApiResponse<T>> {
        self.send(ApiRequest::get(path)).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<ApiResponse<T>> {
        self.send(ApiRequest::post(path).json(body)?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<ApiResponse<T>> {
        self.send(ApiRequest::put(path).json(body)?).await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<ApiResponse<T>> {
        self.send(ApiRequest::patch(path).json(body)?).await
    }

    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<ApiResponse<T>> {
        self.send(ApiRequest::delete(path)).await
    }

    /// Call `GET /health` through the queue. Never fails; the outcome is in the report.
    pub async fn check_health(&self) -> HealthReport {
        let started = Instant::now();
        let result = self.dispatch(&ApiRequest::get("/health")).await;
        let checked_at = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        HealthReport {
            healthy: result.is_ok(),
            latency_ms: started.elapsed().as_millis() as u64,
            checked_at,
            error: result.err().map(|e| e.to_string()),
        }
    }

    async fn send_raw(&self, request: &ApiRequest) -> ApiResult<ApiResponse<Value>> {
        let ttl = request.cache_ttl();
        let key = ttl.map(|_| request.cache_key());

        if let Some(key) = &key {
            if let Some(hit) = self.inner.cache.get(key) {
                self.inner.observer.on_cache_hit(key);
                return Ok(hit);
            }
            metrics::record_cache_event("miss");
        }

        let response = if request.policy.retry {
            self.inner.retry.run(|| self.dispatch(request)).await?
        } else {
            self.dispatch(request).await?
        };

        if let (Some(key), Some(ttl)) = (key, ttl) {
            self.inner.cache.set(key, response.clone(), ttl);
            metrics::record_cache_event("store");
        }

        Ok(response)
    }

    async fn dispatch(&self, request: &ApiRequest) -> ApiResult<ApiResponse<Value>> {
        self.inner.queue.enqueue(|| self.execute(request)).await
    }

    /// One attempt on the wire, with observer callbacks around it.
    async fn execute(&self, request: &ApiRequest) -> ApiResult<ApiResponse<Value>> {
        let request_id = Uuid::new_v4();
        let query = request.query.to_query_string();
        let log = RequestLog {
            request_id,
            method: request.method.as_str(),
            path: &request.path,
            query: &query,
            body: request.body.as_ref(),
        };

        self.inner.observer.on_request(&log);
        let started = Instant::now();

        let result = match self.perform(request, request_id, &query).await {
            Ok((status, body)) => {
                self.inner
                    .observer
                    .on_response(&log, status, started.elapsed(), &body);
                Envelope::decode(body).into_result()
            }
            Err(err) => Err(err),
        };

        if let Err(err) = &result {
            self.inner.observer.on_error(&log, err, started.elapsed());
        }
        result
    }

    /// Perform the HTTP exchange and classify the outcome. Returns the
    /// parsed body of a 2xx response.
    async fn perform(
        &self,
        request: &ApiRequest,
        request_id: Uuid,
        query: &str,
    ) -> ApiResult<(u16, Value)> {
        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), self.url_for(&request.path, query))
            .header(REQUEST_ID_HEADER, request_id.to_string());

        if let Some(token) = self.inner.session.access_token() {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let exchange = async {
            let response = builder.send().await?;
            let status = response.status().as_u16();
            let bytes = response.bytes().await?;
            Ok::<_, reqwest::Error>((status, bytes))
        };

        let (status, bytes) = match tokio::time::timeout(self.inner.timeout, exchange).await {
            Ok(Ok(pair)) => pair,
            Ok(Err(e)) => {
                tracing::warn!(request_id = %request_id, error = %e, "Transport failure");
                return Err(ApiError::network());
            }
            Err(_) => {
                tracing::warn!(
                    request_id = %request_id,
                    timeout_secs = self.inner.timeout.as_secs(),
                    "Request timed out"
                );
                return Err(ApiError::network());
            }
        };

        let parsed = if bytes.is_empty() {
            Ok(Value::Null)
        } else {
            serde_json::from_slice::<Value>(&bytes)
        };

        if (200..300).contains(&status) {
            return parsed.map(|body| (status, body)).map_err(ApiError::decode);
        }

        if status == 401 {
            self.handle_unauthorized();
        }
        Err(ApiError::from_response(status, parsed.ok()))
    }

    /// Forced logout after a 401.
    fn handle_unauthorized(&self) {
        let transition = self.inner.session.dispatch(SessionEvent::Unauthorized);
        if transition.changed() {
            tracing::warn!("Session rejected by backend, logged out");
        }
        let current = self.inner.navigator.current_path();
        if let Some(target) = login_redirect(&current, &self.inner.login_path) {
            self.inner.navigator.redirect(&target);
        }
    }

    fn url_for(&self, path: &str, query: &str) -> String {
        let mut url = String::with_capacity(self.inner.base_url.len() + path.len() + query.len() + 2);
        url.push_str(&self.inner.base_url);
        if !path.starts_with('/') {
            url.push('/');
        }
        url.push_str(path);
        if !query.is_empty() {
            url.push(if path.contains('?') { '&' } else { '?' });
            url.push_str(query);
        }
        url
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url)
            .field("session", &self.inner.session)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_building() {
        let client = ApiClient::new("http://localhost:3000/api/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000/api");
        assert_eq!(client.url_for("/routes", ""), "http://localhost:3000/api/routes");
        assert_eq!(
            client.url_for("/routes/search", "end_point=Ubungo"),
            "http://localhost:3000/api/routes/search?end_point=Ubungo"
        );
        assert_eq!(
            client.url_for("/trips/route/3?date=2024-05-01", "page=2"),
            "http://localhost:3000/api/trips/route/3?date=2024-05-01&page=2"
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = ApiClient::new("not a url").unwrap_err();
        assert!(matches!(err, BuildError::InvalidConfig(_)));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        let mut config = ClientConfig::default();
        // Port 9 (discard) on loopback is closed in test environments.
        config.api.base_url = "http://127.0.0.1:9".into();
        config.retries.enabled = false;
        let client = ApiClient::builder(config).build().unwrap();

        let err = client.get::<Value>("/routes").await.unwrap_err();
        assert!(err.is_network_error());
        assert!(!err.is_api_error());

        let report = client.check_health().await;
        assert!(!report.healthy);
        assert!(report.error.is_some());
    }
}
