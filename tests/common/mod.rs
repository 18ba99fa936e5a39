//! Shared utilities for integration tests.

#![allow(dead_code)]

use axum::Router;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use transit_client::error::ApiError;
use transit_client::observability::{RequestLog, RequestObserver};
use transit_client::session::{MemoryTokenStore, Navigator};
use transit_client::{ApiClient, ClientConfig};

/// Serve `router` on an ephemeral loopback port and return its base URL.
pub async fn start_mock_backend(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{addr}")
}

/// An address nothing is listening on.
pub async fn closed_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

/// Client settings tuned for fast tests.
pub fn test_config(base_url: &str) -> ClientConfig {
    let mut config = ClientConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.timeout_secs = 5;
    config.retries.base_delay_ms = 10;
    config.retries.max_delay_ms = 50;
    config
}

pub struct TestClient {
    pub client: ApiClient,
    pub observer: Arc<RecordingObserver>,
    pub navigator: Arc<RecordingNavigator>,
    pub tokens: Arc<MemoryTokenStore>,
}

pub fn build_client(config: ClientConfig) -> TestClient {
    build_client_with_tokens(config, Arc::new(MemoryTokenStore::new()))
}

pub fn build_client_with_tokens(config: ClientConfig, tokens: Arc<MemoryTokenStore>) -> TestClient {
    let observer = Arc::new(RecordingObserver::default());
    let navigator = Arc::new(RecordingNavigator::at("/bookings"));
    let client = ApiClient::builder(config)
        .observer(observer.clone())
        .navigator(navigator.clone())
        .token_store(tokens.clone())
        .build()
        .unwrap();
    TestClient {
        client,
        observer,
        navigator,
        tokens,
    }
}

pub fn success(data: Value) -> axum::Json<Value> {
    axum::Json(json!({"status": "success", "data": data}))
}

pub fn user_json(id: u64) -> Value {
    json!({"user_id": id, "full_name": "Asha Juma", "phone": "0712345678", "role": "customer"})
}

/// Counts handler invocations.
#[derive(Clone, Default)]
pub struct Hits(Arc<AtomicUsize>);

impl Hits {
    pub fn hit(&self) -> usize {
        self.0.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Records everything the client reports, rendered as text.
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
    pub cache_hits: AtomicUsize,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl RequestObserver for RecordingObserver {
    fn on_request(&self, request: &RequestLog<'_>) {
        self.events.lock().unwrap().push(format!("request {request:?}"));
    }

    fn on_response(&self, request: &RequestLog<'_>, status: u16, _elapsed: Duration, body: &Value) {
        self.events
            .lock()
            .unwrap()
            .push(format!("response {status} {request:?} {body}"));
    }

    fn on_error(&self, request: &RequestLog<'_>, error: &ApiError, _elapsed: Duration) {
        self.events
            .lock()
            .unwrap()
            .push(format!("error {request:?} {error:?}"));
    }

    fn on_cache_hit(&self, key: &str) {
        self.cache_hits.fetch_add(1, Ordering::SeqCst);
        self.events.lock().unwrap().push(format!("cache hit {key}"));
    }
}

/// A view router that remembers where it was sent.
pub struct RecordingNavigator {
    pub current: Mutex<String>,
    pub redirects: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn at(path: &str) -> Self {
        Self {
            current: Mutex::new(path.to_string()),
            redirects: Mutex::new(Vec::new()),
        }
    }

    pub fn redirects(&self) -> Vec<String> {
        self.redirects.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.current.lock().unwrap().clone()
    }

    fn redirect(&self, target: &str) {
        *self.current.lock().unwrap() = target.to_string();
        self.redirects.lock().unwrap().push(target.to_string());
    }
}
