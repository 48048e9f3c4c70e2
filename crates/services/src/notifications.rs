//! Notification dispatcher: persist first, push best-effort.

use std::sync::Arc;

use common::{Clock, NotificationId, UserId};
use domain::{BookingEvent, DomainError, Notification, NotificationType, UserAccount};
use store::Store;

use crate::internal;
use crate::push::{PushMessage, PushRegistry};

/// Fans out domain events and ad-hoc notifications to their recipients.
///
/// Persistence is the durability guarantee; the live push is a latency
/// optimization that may silently drop.
pub struct NotificationDispatcher<S> {
    store: S,
    push: PushRegistry,
    clock: Arc<dyn Clock>,
}

impl<S: Store> NotificationDispatcher<S> {
    pub fn new(store: S, push: PushRegistry, clock: Arc<dyn Clock>) -> Self {
        Self { store, push, clock }
    }

    /// The registry callers connect to for live delivery.
    pub fn push_registry(&self) -> &PushRegistry {
        &self.push
    }

    /// Dispatches a booking domain event to its recipient.
    pub async fn dispatch(&self, event: &BookingEvent) -> Result<Notification, DomainError> {
        self.notify(event.recipient(), event.notification_type(), event.payload())
            .await
    }

    /// Persists a notification, then attempts a live push.
    ///
    /// Once this returns `Ok`, the notification is durably enqueued; push
    /// failure never fails the call.
    #[tracing::instrument(skip(self, payload), fields(kind = %kind))]
    pub async fn notify(
        &self,
        recipient_id: UserId,
        kind: NotificationType,
        payload: serde_json::Value,
    ) -> Result<Notification, DomainError> {
        let notification = Notification::new(recipient_id, kind, payload, self.clock.now());
        self.store
            .insert_notification(notification.clone())
            .await
            .map_err(internal)?;
        metrics::counter!("notifications_persisted_total").increment(1);

        self.push
            .push(
                recipient_id,
                PushMessage {
                    kind,
                    payload: notification.payload.clone(),
                },
            )
            .await;

        Ok(notification)
    }

    /// Marks a notification read. Only the recipient may do this; marking
    /// an already-read notification succeeds as a no-op.
    pub async fn mark_read(
        &self,
        id: NotificationId,
        caller: &UserAccount,
    ) -> Result<Notification, DomainError> {
        let notification = self
            .store
            .notification(id)
            .await
            .map_err(internal)?
            .ok_or_else(|| DomainError::not_found("notification", id))?;

        if notification.recipient_id != caller.id {
            return Err(DomainError::forbidden(
                "only the recipient may mark a notification read",
            ));
        }

        self.store.mark_notification_read(id).await.map_err(internal)
    }

    /// Lists the caller's notifications, newest first.
    pub async fn list_for(&self, owner: &UserAccount) -> Result<Vec<Notification>, DomainError> {
        self.store.notifications_for(owner.id).await.map_err(internal)
    }
}
