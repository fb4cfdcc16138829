use axum::{Json, http::StatusCode, response::IntoResponse, response::Response};
use tracing::error;

use quill_core::CoreError;
use quill_types::api::ErrorBody;

/// Boundary error for API handlers: the core taxonomy plus request-shape
/// rejections. Maps every outcome to a status code and a stable JSON
/// `message` body.
#[derive(Debug)]
pub enum ApiError {
    Core(CoreError),
    BadRequest(&'static str),
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.to_string()),
            Self::Core(err) => match err {
                CoreError::NotFound => (StatusCode::NOT_FOUND, err.to_string()),
                CoreError::NoActiveSession => (StatusCode::NOT_FOUND, err.to_string()),
                CoreError::Unauthorized => (StatusCode::UNAUTHORIZED, err.to_string()),
                CoreError::Forbidden => (StatusCode::FORBIDDEN, err.to_string()),
                CoreError::InvalidCredentials => (StatusCode::BAD_REQUEST, err.to_string()),
                CoreError::DuplicateKey(_) => (StatusCode::CONFLICT, err.to_string()),
                CoreError::Store(inner) => {
                    // Log with full context; the client gets a generic body.
                    error!("store failure: {:#}", inner);
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal server error".to_string(),
                    )
                }
            },
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}
