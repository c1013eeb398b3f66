use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use validator::Validate;

use crate::extractors::AppJson;
use crate::models::student::CreateStudentRequest;
use crate::services::{student_service::StudentService, AppState};

pub async fn list_students(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = StudentService::new(&state.mongo);
    match service.list_students().await {
        Ok(students) => Ok(Json(students)),
        Err(e) => {
            tracing::error!("failed to list students: {e:#}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn create_student(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<CreateStudentRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    if let Err(e) = req.validate() {
        return Err((StatusCode::BAD_REQUEST, e.to_string()));
    }

    let service = StudentService::new(&state.mongo);
    match service.create_student(&req).await {
        Ok(student) => Ok((StatusCode::CREATED, Json(student))),
        Err(e) => {
            tracing::error!("failed to create student: {e:#}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn delete_student(
    State(state): State<Arc<AppState>>,
    Path(student_id): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = StudentService::new(&state.mongo);
    match service.delete_student(&student_id).await {
        Ok(true) => Ok(StatusCode::NO_CONTENT),
        Ok(false) => Err((StatusCode::NOT_FOUND, "Student not found".to_string())),
        Err(e) => {
            tracing::error!("failed to delete student: {e:#}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn list_periods(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = StudentService::new(&state.mongo);
    match service.list_periods().await {
        Ok(periods) => Ok(Json(periods)),
        Err(e) => {
            tracing::error!("failed to list periods: {e:#}");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

pub async fn activate_period(
    State(state): State<Arc<AppState>>,
    Path(period_id): Path<i32>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let service = StudentService::new(&state.mongo);
    match service.activate_period(period_id).await {
        Ok(periods) => Ok(Json(json!({ "periods": periods }))),
        Err(e) => {
            let msg = e.to_string();
            let status = if msg.contains("out of range") {
                StatusCode::UNPROCESSABLE_ENTITY
            } else {
                tracing::error!("failed to activate period: {msg}");
                StatusCode::INTERNAL_SERVER_ERROR
            };
            Err((status, msg))
        }
    }
}
