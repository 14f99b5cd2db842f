//! Maps domain `AppError` to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use depot_core::error::{AppError, ErrorKind};

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Wrapper so `AppError` can be returned from handlers.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = match err.kind {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorKind::Forbidden => StatusCode::FORBIDDEN,
            ErrorKind::Validation | ErrorKind::PathViolation => StatusCode::BAD_REQUEST,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::SizeLimitExceeded => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorKind::Storage
            | ErrorKind::Database
            | ErrorKind::Configuration
            | ErrorKind::Serialization
            | ErrorKind::Internal => {
                tracing::error!(error = %err, "Internal server error");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = ApiErrorResponse {
            error: err.kind.to_string(),
            message: err.message,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_for(err: AppError) -> StatusCode {
        ApiError(err).into_response().status()
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(status_for(AppError::not_found("x")), StatusCode::NOT_FOUND);
        assert_eq!(status_for(AppError::forbidden("x")), StatusCode::FORBIDDEN);
        assert_eq!(
            status_for(AppError::unauthenticated("x")),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(status_for(AppError::conflict("x")), StatusCode::CONFLICT);
        assert_eq!(
            status_for(AppError::size_limit("x")),
            StatusCode::PAYLOAD_TOO_LARGE
        );
        assert_eq!(
            status_for(AppError::path_violation("x")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(AppError::storage("x")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_not_found_and_forbidden_stay_distinguishable() {
        assert_ne!(
            status_for(AppError::not_found("file")),
            status_for(AppError::forbidden("file"))
        );
    }
}
