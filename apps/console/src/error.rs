use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use itsm_application::UserNotice;
use itsm_core::AppError;
use serde::Serialize;
use tracing::error;
use ts_rs::TS;

/// API error payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/console-types/src/generated/error-response.ts"
)]
pub struct ErrorResponse {
    message: String,
}

/// HTTP API error wrapper around core application errors.
#[derive(Debug)]
pub struct ApiError {
    error: AppError,
    message: String,
}

impl ApiError {
    /// Wraps an error whose message is replaced by `fallback` unless it is user-facing.
    pub fn with_fallback(error: AppError, fallback: &str) -> Self {
        let message = UserNotice::from_error(&error, fallback).message;
        Self { error, message }
    }
}

impl From<AppError> for ApiError {
    fn from(value: AppError) -> Self {
        let message = value.detail().to_owned();
        Self {
            error: value,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.error {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!(error = %self.error, "console request failed");
        }

        let payload = Json(ErrorResponse {
            message: self.message,
        });

        (status, payload).into_response()
    }
}

/// Standard API result type.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use itsm_core::AppError;

    use super::ApiError;

    #[test]
    fn upstream_failures_are_bad_gateway() {
        let response =
            ApiError::from(AppError::Upstream("servicio caído".to_owned())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn fallback_hides_internal_detail() {
        let error = ApiError::with_fallback(
            AppError::Internal("socket closed".to_owned()),
            "Error al guardar campo",
        );
        assert_eq!(error.message, "Error al guardar campo");
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
