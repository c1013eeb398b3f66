use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, register_int_gauge,
    Encoder, HistogramVec, IntCounter, IntCounterVec, IntGauge, TextEncoder,
};

lazy_static! {
    // HTTP metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5]
    )
    .unwrap();

    // Business metrics
    pub static ref SESSIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "game_sessions_total",
        "Total number of game sessions",
        &["status"]
    )
    .unwrap();

    pub static ref SESSIONS_ACTIVE: IntGauge = register_int_gauge!(
        "game_sessions_active",
        "Currently open game sessions"
    )
    .unwrap();

    pub static ref ROUNDS_GENERATED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "rounds_generated_total",
        "Prompts generated, by game",
        &["game"]
    )
    .unwrap();

    pub static ref ANSWERS_SUBMITTED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "answers_submitted_total",
        "Validated answer submissions",
        &["correct"]
    )
    .unwrap();

    pub static ref CELEBRATIONS_TOTAL: IntCounter = register_int_counter!(
        "celebrations_total",
        "Celebration hook invocations (one per correct round)"
    )
    .unwrap();

    pub static ref STATS_PERSIST_FAILURES_TOTAL: IntCounter = register_int_counter!(
        "stats_persist_failures_total",
        "Attempt-counter increments dropped after exhausting retries"
    )
    .unwrap();
}

/// Render the default registry in the Prometheus text format.
pub fn render() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

pub fn record_answer(correct: bool) {
    let label = if correct { "true" } else { "false" };
    ANSWERS_SUBMITTED_TOTAL.with_label_values(&[label]).inc();
}
