//! Transport behavior against a mock backend: envelope decoding, error
//! classification, auth handling, retries, timeouts and admission control.

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use transit_client::error::{ErrorKind, NETWORK_ERROR_MESSAGE};
use transit_client::session::TokenStore;
use transit_client::{ApiRequest, AuthPhase};

mod common;
use common::{build_client, success, test_config, user_json, Hits};

fn login_route() -> Router {
    Router::new().route(
        "/auth/login",
        post(|| async {
            success(json!({"accessToken": "secret-token", "user": user_json(1)}))
        }),
    )
}

#[tokio::test]
async fn test_logical_error_on_200() {
    let hits = Hits::default();
    let h = hits.clone();
    let base = common::start_mock_backend(Router::new().route(
        "/routes",
        get(move || {
            let h = h.clone();
            async move {
                h.hit();
                Json(json!({"status": "error", "message": "X"}))
            }
        }),
    ))
    .await;

    let mut config = test_config(&base);
    config.retries.enabled = false;
    let t = build_client(config);

    let err = t.client.get::<Value>("/routes").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Logical);
    assert_eq!(err.to_string(), "X");
    assert_eq!(err.status(), None);
    assert_eq!(hits.count(), 1);
}

#[tokio::test]
async fn test_success_envelope_unwrapped() {
    let base = common::start_mock_backend(Router::new().route(
        "/routes",
        get(|| async {
            Json(json!({"status": "success", "data": [{"route_id": 1}], "message": "ok"}))
        }),
    ))
    .await;
    let t = build_client(test_config(&base));

    let resp = t.client.get::<Vec<Value>>("/routes").await.unwrap();
    assert_eq!(resp.data, vec![json!({"route_id": 1})]);
    assert_eq!(resp.message.as_deref(), Some("ok"));
}

#[tokio::test]
async fn test_unauthorized_clears_session_and_redirects() {
    let base = common::start_mock_backend(login_route().route(
        "/bookings",
        get(|| async {
            (
                StatusCode::UNAUTHORIZED,
                Json(json!({"status": "error", "message": "Token expired"})),
            )
        }),
    ))
    .await;
    let t = build_client(test_config(&base));

    t.client.auth().login("0712345678", "secret1").await.unwrap();
    assert_eq!(t.tokens.load().unwrap().as_deref(), Some("secret-token"));

    let err = t.client.get::<Value>("/bookings").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "Token expired");

    assert_eq!(t.client.session().phase(), AuthPhase::Anonymous);
    assert!(t.client.session().user().is_none());
    assert_eq!(t.tokens.load().unwrap(), None);
    assert_eq!(t.navigator.redirects(), vec!["/login?redirected=true".to_string()]);

    // Already on the login view: no second redirect.
    let _ = t.client.get::<Value>("/bookings").await.unwrap_err();
    assert_eq!(t.navigator.redirects().len(), 1);
}

#[tokio::test]
async fn test_unauthorized_is_not_retried() {
    let hits = Hits::default();
    let h = hits.clone();
    let base = common::start_mock_backend(Router::new().route(
        "/users/profile",
        get(move || {
            let h = h.clone();
            async move {
                h.hit();
                StatusCode::UNAUTHORIZED
            }
        }),
    ))
    .await;
    let t = build_client(test_config(&base));

    let err = t.client.get::<Value>("/users/profile").await.unwrap_err();
    assert!(err.is_unauthorized());
    assert_eq!(err.message(), "Request failed with status 401");
    assert_eq!(hits.count(), 1);
}

#[tokio::test]
async fn test_unprocessable_exposes_field_errors() {
    let hits = Hits::default();
    let h = hits.clone();
    let base = common::start_mock_backend(Router::new().route(
        "/auth/register",
        post(move || {
            let h = h.clone();
            async move {
                h.hit();
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({
                        "status": "error",
                        "message": "Validation failed",
                        "errors": {"phone": "Phone number already registered"}
                    })),
                )
            }
        }),
    ))
    .await;
    let t = build_client(test_config(&base));

    let err = t
        .client
        .post::<Value, _>("/auth/register", &json!({"phone": "0712345678"}))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unprocessable);
    assert_eq!(err.status(), Some(422));
    assert_eq!(err.message(), "Validation failed");
    assert_eq!(
        err.validation_errors().unwrap()["phone"],
        "Phone number already registered"
    );
    assert_eq!(hits.count(), 1);
}

#[tokio::test]
async fn test_connection_refused_is_network_error() {
    let addr = common::closed_address().await;
    let mut config = test_config(&format!("http://{addr}"));
    config.retries.enabled = false;
    let t = build_client(config);

    let err = t.client.get::<Value>("/routes").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Network);
    assert_eq!(err.message(), NETWORK_ERROR_MESSAGE);
    assert_eq!(err.status(), None);
    assert!(t.client.session().user().is_none());
}

#[tokio::test]
async fn test_timeout_is_network_error() {
    let base = common::start_mock_backend(Router::new().route(
        "/trips/upcoming",
        get(|| async {
            tokio::time::sleep(Duration::from_secs(3)).await;
            success(json!([]))
        }),
    ))
    .await;
    let mut config = test_config(&base);
    config.api.timeout_secs = 1;
    config.retries.enabled = false;
    let t = build_client(config);

    let err = t.client.get::<Value>("/trips/upcoming").await.unwrap_err();
    assert!(err.is_network_error());
}

#[tokio::test]
async fn test_bearer_token_attached_and_never_logged() {
    let seen: Arc<Mutex<Vec<(Option<String>, Option<String>)>>> = Arc::default();
    let s = seen.clone();
    let base = common::start_mock_backend(login_route().route(
        "/routes",
        get(move |headers: HeaderMap| {
            let s = s.clone();
            async move {
                let header = |name: &str| {
                    headers
                        .get(name)
                        .and_then(|v| v.to_str().ok())
                        .map(str::to_string)
                };
                s.lock()
                    .unwrap()
                    .push((header("authorization"), header("x-request-id")));
                success(json!([]))
            }
        }),
    ))
    .await;
    let t = build_client(test_config(&base));

    t.client.get::<Value>("/routes").await.unwrap();
    t.client.auth().login("0712345678", "secret1").await.unwrap();
    t.client.get::<Value>("/routes").await.unwrap();

    let seen = seen.lock().unwrap().clone();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].0, None);
    assert_eq!(seen[1].0.as_deref(), Some("Bearer secret-token"));
    assert!(seen.iter().all(|(_, id)| id.is_some()));
    assert_ne!(seen[0].1, seen[1].1);

    let requests: Vec<_> = t
        .observer
        .events()
        .into_iter()
        .filter(|e| e.starts_with("request"))
        .collect();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|e| !e.contains("secret-token")));
    assert!(!format!("{:?}", t.client).contains("secret-token"));
}

#[tokio::test]
async fn test_server_errors_are_retried() {
    let hits = Hits::default();
    let h = hits.clone();
    let base = common::start_mock_backend(Router::new().route(
        "/routes",
        get(move || {
            let h = h.clone();
            async move {
                if h.hit() < 3 {
                    (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"status": "error"})))
                } else {
                    (StatusCode::OK, success(json!([{"route_id": 9}])))
                }
            }
        }),
    ))
    .await;
    let t = build_client(test_config(&base));

    let routes = t.client.fetch::<Vec<Value>>(ApiRequest::get("/routes")).await.unwrap();
    assert_eq!(routes.len(), 1);
    assert_eq!(hits.count(), 3);
}

#[tokio::test]
async fn test_mutations_are_not_retried() {
    let hits = Hits::default();
    let h = hits.clone();
    let base = common::start_mock_backend(Router::new().route(
        "/payments",
        post(move || {
            let h = h.clone();
            async move {
                h.hit();
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }),
    ))
    .await;
    let t = build_client(test_config(&base));

    let err = t
        .client
        .post::<Value, _>("/payments", &json!({"booking_id": 1}))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Server);
    assert_eq!(hits.count(), 1);
}

#[tokio::test]
async fn test_invalid_json_is_decode_error() {
    let base = common::start_mock_backend(
        Router::new().route("/health", get(|| async { "<html>maintenance</html>" })),
    )
    .await;
    let mut config = test_config(&base);
    config.retries.enabled = false;
    let t = build_client(config);

    let err = t.client.get::<Value>("/health").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn test_concurrency_is_bounded() {
    let active = Arc::new(AtomicUsize::new(0));
    let peak = Arc::new(AtomicUsize::new(0));
    let (a, p) = (active.clone(), peak.clone());
    let base = common::start_mock_backend(Router::new().route(
        "/trips/{id}",
        get(move || {
            let (a, p) = (a.clone(), p.clone());
            async move {
                let now = a.fetch_add(1, Ordering::SeqCst) + 1;
                p.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(100)).await;
                a.fetch_sub(1, Ordering::SeqCst);
                success(json!({"trip_id": 1}))
            }
        }),
    ))
    .await;
    let mut config = test_config(&base);
    config.queue.max_concurrent = 2;
    let t = build_client(config);

    let calls = (1..=6).map(|id| {
        let client = t.client.clone();
        async move { client.get::<Value>(&format!("/trips/{id}")).await }
    });
    let results = futures_util::future::join_all(calls).await;
    assert!(results.iter().all(Result::is_ok));
    assert!(peak.load(Ordering::SeqCst) <= 2);
    assert_eq!(t.client.queue().in_flight(), 0);
}

#[tokio::test]
async fn test_health_report() {
    let base = common::start_mock_backend(
        Router::new().route("/health", get(|| async { Json(json!({"uptime": 42})) })),
    )
    .await;
    let t = build_client(test_config(&base));

    let report = t.client.check_health().await;
    assert!(report.healthy);
    assert!(report.error.is_none());
    assert!(report.checked_at > 0);
}

#[tokio::test]
async fn test_health_check_waits_for_queue_slot() {
    let hits = Hits::default();
    let h = hits.clone();
    let base = common::start_mock_backend(Router::new().route(
        "/health",
        get(move || {
            let h = h.clone();
            async move {
                h.hit();
                Json(json!({"uptime": 1}))
            }
        }),
    ))
    .await;
    let mut config = test_config(&base);
    config.queue.max_concurrent = 1;
    let t = build_client(config);

    let slot = t.client.queue().acquire().await;
    let blocked = tokio::time::timeout(Duration::from_millis(200), t.client.check_health()).await;
    assert!(blocked.is_err());
    assert_eq!(hits.count(), 0);

    drop(slot);
    let report = t.client.check_health().await;
    assert!(report.healthy);
    assert_eq!(hits.count(), 1);
    assert_eq!(t.client.queue().in_flight(), 0);
}
