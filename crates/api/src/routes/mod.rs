//! Route handlers and shared application state.

pub mod auth;
pub mod bookings;
pub mod health;
pub mod listings;
pub mod metrics;
pub mod notifications;
pub mod payments;
pub mod push;
pub mod reviews;

use std::sync::Arc;

use access::AccessGate;
use axum::http::HeaderMap;
use services::{
    BookingService, CatalogService, NotificationDispatcher, PaymentService, RatingService,
};
use store::Store;

use crate::error::ApiError;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store> {
    pub gate: AccessGate<S>,
    pub bookings: Arc<BookingService<S>>,
    pub catalog: CatalogService<S>,
    pub ratings: RatingService<S>,
    pub payments: PaymentService<S>,
    pub dispatcher: Arc<NotificationDispatcher<S>>,
}

/// Extracts the bearer token from the `Authorization` header.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, ApiError> {
    headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(ApiError::Domain(domain::DomainError::Unauthenticated))
}

/// Resolves the caller's origin for rate-limit keying.
pub(crate) fn origin(headers: &HeaderMap) -> &str {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(',').next().unwrap_or(v).trim())
        .unwrap_or("unknown")
}
