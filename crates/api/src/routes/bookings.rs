//! Booking lifecycle endpoints.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{DateTime, Utc};
use common::{BookingId, ServiceId};
use domain::{Action, Booking, BookingStatus, Role};
use serde::Deserialize;
use services::{NewBooking, ProviderEarnings};
use store::Store;

use crate::error::ApiError;
use crate::routes::{AppState, bearer_token};

#[derive(Deserialize)]
pub struct CreateBookingBody {
    pub service_id: ServiceId,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub status: Option<BookingStatus>,
}

#[derive(Deserialize)]
pub struct TransitionBody {
    pub status: BookingStatus,
}

/// POST /bookings — request a service (customer only).
#[tracing::instrument(skip(state, headers, body))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(body): Json<CreateBookingBody>,
) -> Result<(StatusCode, Json<Booking>), ApiError> {
    let customer = state
        .gate
        .require(bearer_token(&headers)?, Action::CreateBooking)
        .await?;
    let booking = state
        .bookings
        .create(
            &customer,
            NewBooking {
                service_id: body.service_id,
                scheduled_at: body.scheduled_at,
                notes: body.notes,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /bookings — the caller's bookings, optionally filtered by status.
/// Admins see every booking.
#[tracing::instrument(skip(state, headers))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Query(params): Query<ListParams>,
) -> Result<Json<Vec<Booking>>, ApiError> {
    let caller = state.gate.authenticate(bearer_token(&headers)?).await?;
    let action = if caller.role == Role::Admin {
        Action::ListAllBookings
    } else {
        Action::ListOwnBookings
    };
    state.gate.authorize(&caller, action)?;
    let bookings = state.bookings.list_for(&caller, params.status).await?;
    Ok(Json(bookings))
}

/// POST /admin/bookings/:id/cancel — force-cancel a booking (admin only).
#[tracing::instrument(skip(state, headers))]
pub async fn force_cancel<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<BookingId>,
    headers: HeaderMap,
) -> Result<Json<Booking>, ApiError> {
    let admin = state
        .gate
        .require(bearer_token(&headers)?, Action::ForceCancelBooking)
        .await?;
    let booking = state
        .bookings
        .transition(&admin, id, BookingStatus::Cancelled)
        .await?;
    Ok(Json(booking))
}

/// GET /bookings/:id — one booking, visible to its parties and admins.
#[tracing::instrument(skip(state, headers))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<BookingId>,
    headers: HeaderMap,
) -> Result<Json<Booking>, ApiError> {
    let caller = state.gate.authenticate(bearer_token(&headers)?).await?;
    let booking = state.bookings.get(&caller, id).await?;
    Ok(Json(booking))
}

/// POST /bookings/:id/status — move a booking through its lifecycle.
#[tracing::instrument(skip(state, headers, body))]
pub async fn transition<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<BookingId>,
    headers: HeaderMap,
    Json(body): Json<TransitionBody>,
) -> Result<Json<Booking>, ApiError> {
    let caller = state
        .gate
        .require(bearer_token(&headers)?, Action::TransitionBooking)
        .await?;
    let booking = state.bookings.transition(&caller, id, body.status).await?;
    Ok(Json(booking))
}

/// GET /earnings — the calling provider's settled-work summary.
#[tracing::instrument(skip(state, headers))]
pub async fn earnings<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<ProviderEarnings>, ApiError> {
    let caller = state.gate.authenticate(bearer_token(&headers)?).await?;
    if caller.role != Role::Provider {
        return Err(domain::DomainError::forbidden("providers only").into());
    }
    let earnings = state.bookings.provider_earnings(caller.id).await?;
    Ok(Json(earnings))
}
