//! Review submission and provider rating endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use common::{BookingId, UserId};
use domain::{Action, ProviderProfile, Review};
use serde::Deserialize;
use store::Store;

use crate::error::ApiError;
use crate::routes::{AppState, bearer_token};

#[derive(Deserialize)]
pub struct ReviewBody {
    pub rating: u8,
    #[serde(default)]
    pub text: String,
}

/// POST /bookings/:id/reviews — review a completed booking (customer only).
#[tracing::instrument(skip(state, headers, body))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(booking_id): Path<BookingId>,
    headers: HeaderMap,
    Json(body): Json<ReviewBody>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let customer = state
        .gate
        .require(bearer_token(&headers)?, Action::CreateReview)
        .await?;
    let review = state
        .ratings
        .submit(&customer, booking_id, body.rating, body.text)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// GET /providers/:id/profile — a provider's aggregate rating.
#[tracing::instrument(skip(state))]
pub async fn profile<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(provider_id): Path<UserId>,
) -> Result<Json<ProviderProfile>, ApiError> {
    Ok(Json(state.ratings.profile(provider_id).await?))
}

/// GET /providers/:id/reviews — a provider's reviews, oldest first.
#[tracing::instrument(skip(state))]
pub async fn for_provider<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(provider_id): Path<UserId>,
) -> Result<Json<Vec<Review>>, ApiError> {
    Ok(Json(state.ratings.reviews_for(provider_id).await?))
}
