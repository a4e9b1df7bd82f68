use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::codes::ErrorCode;

/// Literal returned to clients in place of unclassified error messages
pub const INTERNAL_ERROR_MESSAGE: &str = "internal error";

/// JSON body returned for application-level errors
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResult {
    /// Short machine-readable identifier
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
}

impl ErrorResult {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Bad, message)
    }

    pub fn user_ex(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UserEx, message)
    }

    /// Generic 500 body; never carries the underlying error message
    pub fn internal() -> Self {
        Self::new(ErrorCode::Ex, INTERNAL_ERROR_MESSAGE)
    }
}

impl IntoResponse for ErrorResult {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        (status, Json(self)).into_response()
    }
}
