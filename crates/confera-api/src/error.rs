//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use confera_core::error::{AppError, ErrorKind};
use confera_service::registration::RegistrationError;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Error type returned by every handler; wraps the two domain error
/// families so `?` works on both.
#[derive(Debug)]
pub enum ApiError {
    /// Infrastructure or generic application error.
    App(AppError),
    /// Typed registration outcome.
    Registration(RegistrationError),
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::App(err)
    }
}

impl From<RegistrationError> for ApiError {
    fn from(err: RegistrationError) -> Self {
        Self::Registration(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            Self::App(err) => {
                let (status, code) = match err.kind {
                    ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
                    ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
                    ErrorKind::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN"),
                    ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
                    ErrorKind::ServiceUnavailable => {
                        (StatusCode::SERVICE_UNAVAILABLE, "SERVICE_UNAVAILABLE")
                    }
                    ErrorKind::Database => {
                        tracing::error!(error = %err, "Database error");
                        (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_ERROR")
                    }
                    ErrorKind::Internal
                    | ErrorKind::Configuration
                    | ErrorKind::Serialization => {
                        tracing::error!(error = %err, "Internal server error");
                        (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
                    }
                };
                (status, code, err.message)
            }
            Self::Registration(err) => {
                let (status, code) = match &err {
                    RegistrationError::SessionNotFound(_) => {
                        (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND")
                    }
                    RegistrationError::RegistrationClosed(_) => {
                        (StatusCode::FORBIDDEN, "REGISTRATION_CLOSED")
                    }
                    RegistrationError::AlreadyRegistered => {
                        (StatusCode::CONFLICT, "ALREADY_REGISTERED")
                    }
                    RegistrationError::UserLimitExceeded { .. } => {
                        (StatusCode::CONFLICT, "USER_LIMIT_EXCEEDED")
                    }
                    RegistrationError::SessionFull => (StatusCode::CONFLICT, "SESSION_FULL"),
                    RegistrationError::NotRegistered => {
                        (StatusCode::NOT_FOUND, "NOT_REGISTERED")
                    }
                    RegistrationError::CancellationDisabled => {
                        (StatusCode::FORBIDDEN, "CANCELLATION_DISABLED")
                    }
                    RegistrationError::Storage(e) => {
                        tracing::error!(error = %e, "Storage error during registration");
                        (StatusCode::SERVICE_UNAVAILABLE, "STORAGE_ERROR")
                    }
                };
                (status, code, err.to_string())
            }
        };

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message,
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use confera_core::types::id::SessionId;

    #[test]
    fn test_registration_errors_map_to_distinct_statuses() {
        let cases = [
            (
                ApiError::from(RegistrationError::SessionNotFound(SessionId::new())),
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::from(RegistrationError::AlreadyRegistered),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(RegistrationError::SessionFull),
                StatusCode::CONFLICT,
            ),
            (
                ApiError::from(RegistrationError::CancellationDisabled),
                StatusCode::FORBIDDEN,
            ),
            (
                ApiError::from(RegistrationError::NotRegistered),
                StatusCode::NOT_FOUND,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(error.into_response().status(), expected);
        }
    }

    #[test]
    fn test_storage_error_is_service_unavailable() {
        let err = ApiError::from(RegistrationError::Storage(AppError::database(
            "connection refused",
        )));
        assert_eq!(
            err.into_response().status(),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }
}
