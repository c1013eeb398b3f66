use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use std::sync::Arc;

use crate::metrics;
use crate::services::AppState;

pub mod reporting;
pub mod sessions;
pub mod students;

pub async fn health_check(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mongo_ok = state
        .mongo
        .run_command(mongodb::bson::doc! { "ping": 1 })
        .await
        .is_ok();

    let status = if mongo_ok { "healthy" } else { "degraded" };
    let status_code = if mongo_ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status_code,
        Json(json!({
            "status": status,
            "service": "ecole-api",
            "version": env!("CARGO_PKG_VERSION"),
            "dependencies": { "mongodb": mongo_ok },
        })),
    )
}

pub async fn metrics_handler() -> impl IntoResponse {
    match metrics::render() {
        Ok(body) => (StatusCode::OK, body).into_response(),
        Err(e) => {
            tracing::error!("failed to render metrics: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, "metrics unavailable").into_response()
        }
    }
}
