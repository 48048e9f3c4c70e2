//! Service catalog endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use common::{Money, ServiceId, UserId};
use domain::{Action, ServiceListing};
use serde::Deserialize;
use services::NewListing;
use store::Store;

use crate::error::ApiError;
use crate::routes::{AppState, bearer_token};

#[derive(Deserialize)]
pub struct CreateListingBody {
    pub title: String,
    pub price_cents: i64,
}

#[derive(Deserialize)]
pub struct UpdateListingBody {
    pub active: Option<bool>,
    pub price_cents: Option<i64>,
}

/// POST /services — publish a listing (provider only).
#[tracing::instrument(skip(state, headers, body))]
pub async fn create<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(body): Json<CreateListingBody>,
) -> Result<(StatusCode, Json<ServiceListing>), ApiError> {
    let provider = state
        .gate
        .require(bearer_token(&headers)?, Action::CreateServiceListing)
        .await?;
    let listing = state
        .catalog
        .create(
            &provider,
            NewListing {
                title: body.title,
                price: Money::from_cents(body.price_cents),
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(listing)))
}

/// GET /services/:id — one listing.
#[tracing::instrument(skip(state))]
pub async fn get<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<ServiceId>,
) -> Result<Json<ServiceListing>, ApiError> {
    Ok(Json(state.catalog.get(id).await?))
}

/// PATCH /services/:id — toggle or reprice a listing (owner or admin).
#[tracing::instrument(skip(state, headers, body))]
pub async fn update<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<ServiceId>,
    headers: HeaderMap,
    Json(body): Json<UpdateListingBody>,
) -> Result<Json<ServiceListing>, ApiError> {
    let caller = state.gate.authenticate(bearer_token(&headers)?).await?;
    if caller.role == domain::Role::Admin {
        state.gate.authorize(&caller, Action::ToggleServiceActive)?;
    }

    let mut listing = state.catalog.get(id).await?;
    if let Some(price_cents) = body.price_cents {
        listing = state
            .catalog
            .set_price(&caller, id, Money::from_cents(price_cents))
            .await?;
    }
    if let Some(active) = body.active {
        listing = state.catalog.set_active(&caller, id, active).await?;
    }
    Ok(Json(listing))
}

/// GET /providers/:id/services — a provider's listings.
#[tracing::instrument(skip(state))]
pub async fn for_provider<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(provider_id): Path<UserId>,
) -> Result<Json<Vec<ServiceListing>>, ApiError> {
    Ok(Json(state.catalog.list_for_provider(provider_id).await?))
}
