//! Payment settlement endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use common::BookingId;
use domain::{Action, Transaction};
use serde::Deserialize;
use store::Store;

use crate::error::ApiError;
use crate::routes::{AppState, bearer_token};

#[derive(Deserialize)]
pub struct PaymentBody {
    pub method: String,
}

/// POST /bookings/:id/payments — settle a booking (customer only).
#[tracing::instrument(skip(state, headers, body))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(booking_id): Path<BookingId>,
    headers: HeaderMap,
    Json(body): Json<PaymentBody>,
) -> Result<(StatusCode, Json<Transaction>), ApiError> {
    let customer = state
        .gate
        .require(bearer_token(&headers)?, Action::ProcessPayment)
        .await?;
    let txn = state
        .payments
        .process(&customer, booking_id, &body.method)
        .await?;
    Ok((StatusCode::CREATED, Json(txn)))
}

/// GET /bookings/:id/payments — a booking's transaction history.
#[tracing::instrument(skip(state, headers))]
pub async fn history<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(booking_id): Path<BookingId>,
    headers: HeaderMap,
) -> Result<Json<Vec<Transaction>>, ApiError> {
    let caller = state.gate.authenticate(bearer_token(&headers)?).await?;
    let txns = state.payments.history(&caller, booking_id).await?;
    Ok(Json(txns))
}
