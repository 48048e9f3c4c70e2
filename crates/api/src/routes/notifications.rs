//! Notification inbox endpoints.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use common::NotificationId;
use domain::{Action, Notification};
use store::Store;

use crate::error::ApiError;
use crate::routes::{AppState, bearer_token};

/// GET /notifications — the caller's inbox, newest first.
#[tracing::instrument(skip(state, headers))]
pub async fn list<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Notification>>, ApiError> {
    let caller = state
        .gate
        .require(bearer_token(&headers)?, Action::ReadOwnNotifications)
        .await?;
    let inbox = state.dispatcher.list_for(&caller).await?;
    Ok(Json(inbox))
}

/// POST /notifications/:id/read — mark one notification read (idempotent).
#[tracing::instrument(skip(state, headers))]
pub async fn mark_read<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<NotificationId>,
    headers: HeaderMap,
) -> Result<Json<Notification>, ApiError> {
    let caller = state
        .gate
        .require(bearer_token(&headers)?, Action::ReadOwnNotifications)
        .await?;
    let notification = state.dispatcher.mark_read(id, &caller).await?;
    Ok(Json(notification))
}
