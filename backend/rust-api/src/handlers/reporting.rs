use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::errors::GameError;
use crate::models::content::Subject;
use crate::services::AppState;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub period: u8,
    pub subject: Subject,
}

/// Read path for the dashboard: per-game `{correctCount, incorrectCount}`
/// for one learner, one period, one subject.
pub async fn get_student_stats(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
    Query(query): Query<StatsQuery>,
) -> Result<impl IntoResponse, GameError> {
    if !(1..=3).contains(&query.period) {
        return Err(GameError::InvalidConfiguration(format!(
            "period {} is out of range 1..=3",
            query.period
        )));
    }

    let stats = state
        .stats
        .read_stats(&student_id, query.period, query.subject)
        .await?;
    Ok(Json(stats))
}
