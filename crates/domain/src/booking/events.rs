//! Domain events emitted by the booking state machine.
//!
//! The state machine returns these as plain values; the notification
//! dispatcher turns them into persisted notifications and push messages,
//! keeping transport concerns out of the transition logic.

use chrono::{DateTime, Utc};
use common::{BookingId, UserId};
use serde::{Deserialize, Serialize};

use super::{Actor, BookingStatus, TransitionCause};
use crate::notifications::NotificationType;

/// A signal emitted on a successful booking creation or status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingEvent {
    /// A new booking was created; the provider should hear about it.
    Requested {
        booking_id: BookingId,
        customer_id: UserId,
        provider_id: UserId,
        scheduled_at: DateTime<Utc>,
    },

    /// A booking moved to a new status.
    StatusChanged {
        booking_id: BookingId,
        customer_id: UserId,
        provider_id: UserId,
        status: BookingStatus,
        actor: Actor,
        cause: TransitionCause,
    },
}

impl BookingEvent {
    /// The party that should be notified about this event.
    ///
    /// A new request goes to the provider. A status change goes to the
    /// counterparty of whoever caused it: customer-initiated changes notify
    /// the provider, everything else notifies the customer.
    pub fn recipient(&self) -> UserId {
        match self {
            BookingEvent::Requested { provider_id, .. } => *provider_id,
            BookingEvent::StatusChanged {
                customer_id,
                provider_id,
                actor,
                ..
            } => match actor {
                Actor::Customer => *provider_id,
                Actor::Provider | Actor::Admin | Actor::Janitor => *customer_id,
            },
        }
    }

    /// The notification type this event maps to.
    pub fn notification_type(&self) -> NotificationType {
        match self {
            BookingEvent::Requested { .. } => NotificationType::BookingRequest,
            BookingEvent::StatusChanged { .. } => NotificationType::BookingStatusChange,
        }
    }

    /// Structured payload carried by the resulting notification.
    pub fn payload(&self) -> serde_json::Value {
        match self {
            BookingEvent::Requested {
                booking_id,
                scheduled_at,
                ..
            } => serde_json::json!({
                "booking_id": booking_id,
                "scheduled_at": scheduled_at,
            }),
            BookingEvent::StatusChanged {
                booking_id,
                status,
                cause,
                ..
            } => serde_json::json!({
                "booking_id": booking_id,
                "status": status,
                "cause": cause,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_goes_to_provider() {
        let provider = UserId::new();
        let event = BookingEvent::Requested {
            booking_id: BookingId::new(),
            customer_id: UserId::new(),
            provider_id: provider,
            scheduled_at: Utc::now(),
        };
        assert_eq!(event.recipient(), provider);
        assert_eq!(event.notification_type(), NotificationType::BookingRequest);
    }

    #[test]
    fn test_status_change_notifies_counterparty() {
        let customer = UserId::new();
        let provider = UserId::new();
        let base = |actor| BookingEvent::StatusChanged {
            booking_id: BookingId::new(),
            customer_id: customer,
            provider_id: provider,
            status: BookingStatus::Cancelled,
            actor,
            cause: TransitionCause::User,
        };

        assert_eq!(base(Actor::Customer).recipient(), provider);
        assert_eq!(base(Actor::Provider).recipient(), customer);
        assert_eq!(base(Actor::Admin).recipient(), customer);
        assert_eq!(base(Actor::Janitor).recipient(), customer);
    }

    #[test]
    fn test_expired_cause_lands_in_payload() {
        let event = BookingEvent::StatusChanged {
            booking_id: BookingId::new(),
            customer_id: UserId::new(),
            provider_id: UserId::new(),
            status: BookingStatus::Cancelled,
            actor: Actor::Janitor,
            cause: TransitionCause::Expired,
        };
        assert_eq!(event.payload()["cause"], "expired");
        assert_eq!(event.payload()["status"], "CANCELLED");
    }
}
