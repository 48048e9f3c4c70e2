//! The booking entity.

use chrono::{DateTime, Utc};
use common::{BookingId, Money, ServiceId, UserId};
use serde::{Deserialize, Serialize};

use super::BookingStatus;

/// A single service request moving through its lifecycle between a
/// customer and a provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,

    /// Customer who requested the service.
    pub customer_id: UserId,

    /// Provider the request is addressed to.
    pub provider_id: UserId,

    /// The service listing being booked.
    pub service_id: ServiceId,

    /// Current lifecycle status.
    pub status: BookingStatus,

    /// When the work is scheduled to happen. Strictly in the future at
    /// creation time.
    pub scheduled_at: DateTime<Utc>,

    /// Price copied from the listing at creation time. Never recomputed:
    /// later edits to the listing price do not affect this booking.
    pub price_snapshot: Money,

    /// Free-form customer notes.
    pub notes: Option<String>,

    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Creates a new PENDING booking. The schedule check and the price
    /// snapshot read both happen in the booking service; this constructor
    /// only assembles the record.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        customer_id: UserId,
        provider_id: UserId,
        service_id: ServiceId,
        scheduled_at: DateTime<Utc>,
        price_snapshot: Money,
        notes: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: BookingId::new(),
            customer_id,
            provider_id,
            service_id,
            status: BookingStatus::Pending,
            scheduled_at,
            price_snapshot,
            notes,
            created_at,
        }
    }

    /// Returns true if the booking is in a terminal status.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}
