use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;
use thiserror::Error;

/// Error taxonomy of the game core. Configuration mistakes abort the round,
/// malformed input asks the learner to fix their entry without counting an
/// attempt, and persistence failures never interrupt gameplay.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Free-text answer that cannot be parsed into the expected shape.
    /// Carries the learner-facing message.
    #[error("{0}")]
    MalformedInput(String),

    #[error("session not found: {0}")]
    UnknownSession(String),

    #[error("session is not accepting input in its current phase")]
    NotAcceptingInput,

    #[error("persistence failure: {0}")]
    Persistence(String),
}

impl From<anyhow::Error> for GameError {
    fn from(err: anyhow::Error) -> Self {
        GameError::Persistence(format!("{err:#}"))
    }
}

impl GameError {
    fn status_code(&self) -> StatusCode {
        match self {
            GameError::InvalidConfiguration(_) => StatusCode::UNPROCESSABLE_ENTITY,
            GameError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            GameError::UnknownSession(_) => StatusCode::NOT_FOUND,
            GameError::NotAcceptingInput => StatusCode::CONFLICT,
            GameError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {self:#}");
        }
        let body = json!({
            "message": self.to_string(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_the_taxonomy() {
        assert_eq!(
            GameError::InvalidConfiguration("period 4".into()).status_code(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            GameError::MalformedInput("Veuillez entrer un nombre valide.".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            GameError::UnknownSession("nope".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            GameError::NotAcceptingInput.status_code(),
            StatusCode::CONFLICT
        );
    }
}
