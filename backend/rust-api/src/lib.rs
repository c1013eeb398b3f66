#![allow(dead_code)]

use axum::{
    extract::Request,
    http::{header, HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod errors;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middlewares;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::AppState;

/// CSP middleware adds a Content-Security-Policy header to all responses
async fn csp_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response.headers_mut().insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self'; \
             style-src 'self' 'unsafe-inline'; \
             img-src 'self' data:; \
             connect-src 'self'",
        ),
    );
    response
}

pub fn create_router(app_state: std::sync::Arc<services::AppState>) -> Router {
    // The reporting dashboard is served from another origin
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_origin(tower_http::cors::Any);

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics_handler))
        // Nesting a router whose inner route is "/" serves the bare prefix
        // (`/api/v1/sessions`) but not the trailing-slash form
        // (`/api/v1/sessions/`) under axum 0.8; register the latter explicitly
        // so both spellings reach the create handler.
        .route(
            "/api/v1/sessions/",
            post(handlers::sessions::create_session),
        )
        .nest("/api/v1/sessions", sessions_routes())
        .nest("/stats", reporting_routes().layer(cors))
        .nest("/admin", admin_routes())
        .with_state(app_state)
        .layer(middleware::from_fn(csp_middleware))
        .layer(middleware::from_fn(
            middlewares::metrics::metrics_middleware,
        ))
        .layer(TraceLayer::new_for_http())
}

fn sessions_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route("/", post(handlers::sessions::create_session))
        .route(
            "/{id}",
            get(handlers::sessions::get_session).delete(handlers::sessions::abandon_session),
        )
        .route("/{id}/moves", post(handlers::sessions::apply_move))
        .route("/{id}/text", post(handlers::sessions::set_free_text))
        .route("/{id}/submit", post(handlers::sessions::submit_answer))
}

fn reporting_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new().route(
        "/students/{id}",
        get(handlers::reporting::get_student_stats),
    )
}

fn admin_routes() -> Router<std::sync::Arc<services::AppState>> {
    Router::new()
        .route(
            "/students",
            get(handlers::students::list_students).post(handlers::students::create_student),
        )
        .route(
            "/students/{id}",
            delete(handlers::students::delete_student),
        )
        .route("/periods", get(handlers::students::list_periods))
        .route(
            "/periods/{id}/activate",
            post(handlers::students::activate_period),
        )
}
