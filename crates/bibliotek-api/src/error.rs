//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use bibliotek_core::error::{AppError, ErrorKind};

/// Newtype around [`AppError`] so handlers can return it as a response.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    /// Always `false`.
    pub success: bool,
    /// The error payload.
    pub error: ApiErrorDetail,
}

/// The error payload inside an error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Human-readable message.
    pub message: String,
    /// HTTP status code, repeated in the body.
    pub status: u16,
    /// Optional structured details (e.g. per-field validation messages).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status =
            StatusCode::from_u16(err.kind.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Storage and internal failures keep their detail out of responses.
        let message = match err.kind {
            ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::Internal => {
                tracing::error!(error = %err.message, kind = %err.kind, "Internal server error");
                "Internal server error".to_string()
            }
            _ => err.message,
        };

        let body = ApiErrorBody {
            success: false,
            error: ApiErrorDetail {
                message,
                status: status.as_u16(),
                details: err.details,
            },
        };

        (status, Json(body)).into_response()
    }
}
