//! Reviews and provider rating recompute.

use std::sync::Arc;

use common::{BookingId, Clock, UserId};
use domain::{BookingStatus, DomainError, ProviderProfile, Review, UserAccount};
use store::{Store, StoreError};

use crate::internal;

/// Records one review per completed booking and keeps the provider's
/// average rating current.
pub struct RatingService<S> {
    store: S,
    clock: Arc<dyn Clock>,
}

impl<S: Store> RatingService<S> {
    pub fn new(store: S, clock: Arc<dyn Clock>) -> Self {
        Self { store, clock }
    }

    /// Submits a review for a completed booking.
    ///
    /// Only the booking's customer may review, only once, and only after
    /// COMPLETED. The provider profile is recomputed from all reviews and
    /// persisted before this returns.
    #[tracing::instrument(skip(self, customer, text), fields(customer_id = %customer.id))]
    pub async fn submit(
        &self,
        customer: &UserAccount,
        booking_id: BookingId,
        rating: u8,
        text: String,
    ) -> Result<Review, DomainError> {
        let booking = self
            .store
            .booking(booking_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| DomainError::not_found("booking", booking_id))?;

        if booking.customer_id != customer.id {
            return Err(DomainError::forbidden(
                "only the booking's customer may leave a review",
            ));
        }
        if booking.status != BookingStatus::Completed {
            return Err(DomainError::InvalidRequest(format!(
                "booking is {}, reviews require COMPLETED",
                booking.status
            )));
        }

        let review = Review::new(
            booking_id,
            customer.id,
            booking.provider_id,
            rating,
            text,
            self.clock.now(),
        )?;

        match self.store.insert_review(review.clone()).await {
            Ok(()) => {}
            Err(StoreError::Duplicate { .. }) => return Err(DomainError::DuplicateReview),
            Err(e) => return Err(internal(e)),
        }

        self.recompute_profile(booking.provider_id).await?;
        tracing::info!(booking_id = %booking_id, rating, "review recorded");
        Ok(review)
    }

    /// Returns a provider's profile, empty if they have no reviews yet.
    pub async fn profile(&self, provider_id: UserId) -> Result<ProviderProfile, DomainError> {
        let profile = self
            .store
            .profile(provider_id)
            .await
            .map_err(internal)?
            .unwrap_or_else(|| ProviderProfile::empty(provider_id));
        Ok(profile)
    }

    /// A provider's reviews, oldest first.
    pub async fn reviews_for(&self, provider_id: UserId) -> Result<Vec<Review>, DomainError> {
        self.store
            .reviews_for_provider(provider_id)
            .await
            .map_err(internal)
    }

    /// Full recompute over all of the provider's reviews. Correctness over
    /// performance: review volume per provider is small.
    async fn recompute_profile(&self, provider_id: UserId) -> Result<(), DomainError> {
        let reviews = self
            .store
            .reviews_for_provider(provider_id)
            .await
            .map_err(internal)?;

        let count = reviews.len() as u64;
        let avg = if count == 0 {
            0.0
        } else {
            reviews.iter().map(|r| r.rating as f64).sum::<f64>() / count as f64
        };

        self.store
            .upsert_profile(ProviderProfile {
                provider_id,
                avg_rating: avg,
                review_count: count,
            })
            .await
            .map_err(internal)
    }
}
