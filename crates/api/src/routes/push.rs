//! Live notification stream over Server-Sent Events.

use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::sse::{Event, KeepAlive, Sse};
use domain::Action;
use futures_util::Stream;
use futures_util::stream::StreamExt;
use store::Store;

use crate::error::ApiError;
use crate::routes::{AppState, bearer_token};

/// GET /notifications/stream — per-user event stream.
///
/// Opening the stream replaces any previous connection for the same user.
/// Missed events are not replayed; the persisted inbox is the durable
/// record.
#[tracing::instrument(skip(state, headers))]
pub async fn stream<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let caller = state
        .gate
        .require(bearer_token(&headers)?, Action::ReadOwnNotifications)
        .await?;

    let rx = state.dispatcher.push_registry().connect(caller.id).await;
    tracing::info!(user_id = %caller.id, "push stream opened");

    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|message| (message, rx))
    })
    .map(|message| Event::default().json_data(&message));

    Ok(Sse::new(stream).keep_alive(KeepAlive::default()))
}
