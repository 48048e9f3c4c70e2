//! Persisted notifications.

use chrono::{DateTime, Utc};
use common::{NotificationId, UserId};
use serde::{Deserialize, Serialize};

/// What a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationType {
    /// A new booking request landed in a provider's queue.
    BookingRequest,
    /// A booking moved to a new status.
    BookingStatusChange,
    /// A payment settled successfully.
    PaymentSuccess,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationType::BookingRequest => "BOOKING_REQUEST",
            NotificationType::BookingStatusChange => "BOOKING_STATUS_CHANGE",
            NotificationType::PaymentSuccess => "PAYMENT_SUCCESS",
        }
    }
}

impl std::fmt::Display for NotificationType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A notification row. Persistence is the durability guarantee; live push
/// is best-effort on top.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_id: UserId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    /// Structured event data, e.g. a transaction id.
    pub payload: serde_json::Value,
    /// Set (idempotently) by the owning recipient.
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        recipient_id: UserId,
        kind: NotificationType,
        payload: serde_json::Value,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::new(),
            recipient_id,
            kind,
            payload,
            is_read: false,
            created_at,
        }
    }
}
