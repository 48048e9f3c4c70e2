//! Application services for the booking core.
//!
//! Each service wraps the store with the domain rules for one concern:
//! - [`BookingService`] — creation, transitions, earnings
//! - [`CatalogService`] — provider service listings
//! - [`ExpiryJanitor`] — periodic cancellation of stale pending bookings
//! - [`RatingService`] — one review per completed booking, rating recompute
//! - [`PaymentService`] — exactly-once settlement against a booking
//! - [`NotificationDispatcher`] — persist-then-push event fan-out

pub mod bookings;
pub mod catalog;
pub mod janitor;
pub mod notifications;
pub mod payments;
pub mod push;
pub mod ratings;

pub use bookings::{BookingService, NewBooking, ProviderEarnings};
pub use catalog::{CatalogService, NewListing};
pub use janitor::{ExpiryJanitor, JanitorConfig, SweepOutcome};
pub use notifications::NotificationDispatcher;
pub use payments::{GatewayError, PaymentGateway, PaymentService, SimulatedGateway};
pub use push::{PushMessage, PushRegistry};
pub use ratings::RatingService;

use domain::DomainError;
use store::StoreError;

/// Maps unexpected storage failures onto the opaque internal error.
pub(crate) fn internal(err: StoreError) -> DomainError {
    DomainError::Internal(err.to_string())
}
