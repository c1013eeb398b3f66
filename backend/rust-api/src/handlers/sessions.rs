use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;

use crate::errors::GameError;
use crate::extractors::AppJson;
use crate::models::{CreateSessionRequest, MoveRequest, TextRequest};
use crate::services::{
    session_service::SessionService, student_service::StudentService, AppState,
};

pub async fn create_session(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateSessionRequest>,
) -> Result<impl IntoResponse, GameError> {
    // Explicit period wins; otherwise the school's active period applies.
    let period = match req.period {
        Some(period) => period,
        None => StudentService::new(&state.mongo).active_period().await?,
    };

    let service = SessionService::from_state(&state);
    let response = service.create_session(&req, period).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let service = SessionService::from_state(&state);
    let view = service.get_session(&session_id).await?;
    Ok(Json(view))
}

pub async fn apply_move(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    AppJson(req): AppJson<MoveRequest>,
) -> Result<impl IntoResponse, GameError> {
    let service = SessionService::from_state(&state);
    let view = service.apply_move(&session_id, &req).await?;
    Ok(Json(view))
}

pub async fn set_free_text(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
    AppJson(req): AppJson<TextRequest>,
) -> Result<impl IntoResponse, GameError> {
    let service = SessionService::from_state(&state);
    let view = service.set_free_text(&session_id, &req).await?;
    Ok(Json(view))
}

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let service = SessionService::from_state(&state);
    let response = service.submit(&session_id).await?;
    Ok(Json(response))
}

pub async fn abandon_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let service = SessionService::from_state(&state);
    service.abandon(&session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
