//! API error type with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::DomainError;

/// API-level error that maps to an HTTP response.
#[derive(Debug)]
pub enum ApiError {
    /// Malformed request outside the domain's reach (bad header, bad ID).
    BadRequest(String),
    /// Error surfaced by the booking core.
    Domain(DomainError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    let status = match &err {
        DomainError::Unauthenticated => StatusCode::UNAUTHORIZED,
        DomainError::Forbidden(_) => StatusCode::FORBIDDEN,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::InvalidRequest(_) | DomainError::InvalidSchedule => StatusCode::BAD_REQUEST,
        DomainError::InvalidTransition { .. }
        | DomainError::DuplicateReview
        | DomainError::AlreadyPaid => StatusCode::CONFLICT,
        DomainError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
        DomainError::Internal(detail) => {
            tracing::error!(error = %detail, "internal server error");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    // `Internal`'s Display hides the detail logged above.
    (status, err.to_string())
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}
