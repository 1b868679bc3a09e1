use crate::app_error::{AppError, ErrorCode};
use axum::Json;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Client errors are expected traffic, not faults.
        if self.is_client_error() {
            tracing::info!(error = %self, "Request rejected");
        } else {
            tracing::error!(error = ?self, "Request failed");
        }

        let code = self.code();
        match self {
            AppError::InvalidInput(msg) => error_resp(StatusCode::BAD_REQUEST, code, &msg),
            AppError::DuplicateEmail => {
                error_resp(StatusCode::CONFLICT, code, "Email already registered")
            }
            AppError::PayloadTooLarge => error_resp(
                StatusCode::PAYLOAD_TOO_LARGE,
                code,
                "Request body too large",
            ),
            AppError::Forbidden => error_resp(
                StatusCode::FORBIDDEN,
                code,
                "This endpoint is not available in production",
            ),
            AppError::RateLimited => error_resp(
                StatusCode::TOO_MANY_REQUESTS,
                code,
                "Too many requests. Please try again later.",
            ),
            AppError::Database(_) | AppError::Internal(_) => error_resp(
                StatusCode::INTERNAL_SERVER_ERROR,
                code,
                "Internal server error",
            ),
        }
    }
}

/// Malformed or non-JSON bodies get the same 400 shape as field validation.
/// Body read failures keep their own status and a generic message.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            JsonRejection::BytesRejection(inner) => {
                if inner.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    AppError::PayloadTooLarge
                } else {
                    AppError::InvalidInput("Could not read request body".into())
                }
            }
            other => AppError::InvalidInput(other.body_text()),
        }
    }
}

fn error_resp(status: StatusCode, code: ErrorCode, message: &str) -> Response {
    let body = serde_json::json!({
        "success": false,
        "code": code.as_str(),
        "error": message,
    });
    (status, Json(body)).into_response()
}
