use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;

use ecole_api::{
    config::Config, create_router, services::stats_service::MemoryStatsStore, AppState,
};

pub struct TestApp {
    pub router: Router,
    pub stats: Arc<MemoryStatsStore>,
    pub celebrations: Arc<AtomicUsize>,
}

/// Builds the real router wired to the in-memory stats store: no MongoDB
/// instance is required (the client handle connects lazily and the admin
/// routes are not exercised here).
pub async fn create_test_app() -> TestApp {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let config = Config {
        mongo_uri: "mongodb://localhost:27017".to_string(),
        mongo_database: "ecole_test".to_string(),
        bind_addr: "127.0.0.1:0".to_string(),
        next_round_delay_ms: 100,
        stats_save_async: false,
    };

    let mongo_client = mongodb::Client::with_uri_str(&config.mongo_uri)
        .await
        .expect("Failed to build MongoDB client handle");

    let stats = Arc::new(MemoryStatsStore::new());
    let celebrations = Arc::new(AtomicUsize::new(0));
    let hook_counter = celebrations.clone();

    let state = AppState::with_stats_store(config, mongo_client, stats.clone())
        .with_celebration_hook(Arc::new(move |_key| {
            hook_counter.fetch_add(1, Ordering::SeqCst);
        }));

    TestApp {
        router: create_router(Arc::new(state)),
        stats,
        celebrations,
    }
}

/// One JSON request through the router; returns status and parsed body.
pub async fn request_json(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}
