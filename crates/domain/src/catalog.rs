//! Provider service listings.

use chrono::{DateTime, Utc};
use common::{Money, ServiceId, UserId};
use serde::{Deserialize, Serialize};

/// A service a provider offers for booking.
///
/// The listed price is read exactly once per booking, at creation time,
/// into the booking's price snapshot. Editing it later affects only new
/// bookings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceListing {
    pub id: ServiceId,
    pub provider_id: UserId,
    pub title: String,
    pub price: Money,
    /// Inactive listings cannot be booked.
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl ServiceListing {
    pub fn new(
        provider_id: UserId,
        title: impl Into<String>,
        price: Money,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ServiceId::new(),
            provider_id,
            title: title.into(),
            price,
            active: true,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_listing_is_active() {
        let listing = ServiceListing::new(
            UserId::new(),
            "Drain cleaning",
            Money::from_cents(12000),
            Utc::now(),
        );
        assert!(listing.active);
        assert_eq!(listing.price.cents(), 12000);
    }
}
