use axum::{
    extract::{rejection::JsonRejection, FromRequest, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// JSON extractor that rejects with the same `{message, status}` body shape
/// the rest of the API uses, instead of axum's plain-text rejection.
pub struct AppJson<T>(pub T);

impl<T, S> FromRequest<S> for AppJson<T>
where
    T: serde::de::DeserializeOwned + 'static,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => Err(rejection_response(rejection)),
        }
    }
}

fn rejection_response(rejection: JsonRejection) -> Response {
    tracing::warn!(error = %rejection, "rejected malformed request body");
    let body = json!({
        "message": format!("invalid request body: {rejection}"),
        "status": StatusCode::BAD_REQUEST.as_u16(),
    });
    (StatusCode::BAD_REQUEST, Json(body)).into_response()
}
