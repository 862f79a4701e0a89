use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use kayles_core::KaylesError;
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Game(#[from] KaylesError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Game(KaylesError::StateLimitExceeded { .. }) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Game(KaylesError::NotYourTurn(_) | KaylesError::GameOver) => {
                StatusCode::CONFLICT
            }
            ApiError::Game(_) => StatusCode::BAD_REQUEST,
        };
        tracing::debug!(%status, "request rejected: {}", self);

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
