//! Reviews attached to completed bookings.

use chrono::{DateTime, Utc};
use common::{BookingId, ReviewId, UserId};
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// A customer's review of a completed booking. At most one per booking,
/// immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    pub booking_id: BookingId,
    /// The booking's customer; only they may author the review.
    pub author_id: UserId,
    /// The reviewed provider, denormalized for rating recomputes.
    pub provider_id: UserId,
    /// Star rating, 1 through 5.
    pub rating: u8,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

impl Review {
    /// Creates a review, validating the rating range.
    pub fn new(
        booking_id: BookingId,
        author_id: UserId,
        provider_id: UserId,
        rating: u8,
        text: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if !(1..=5).contains(&rating) {
            return Err(DomainError::InvalidRequest(format!(
                "rating must be between 1 and 5, got {rating}"
            )));
        }
        Ok(Self {
            id: ReviewId::new(),
            booking_id,
            author_id,
            provider_id,
            rating,
            text: text.into(),
            created_at,
        })
    }
}
