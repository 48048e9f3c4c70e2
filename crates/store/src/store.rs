//! The `Store` trait.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{BookingId, Money, NotificationId, ServiceId, TransactionId, UserId};
use domain::{
    Booking, BookingStatus, Notification, ProviderProfile, Review, ServiceListing, Transaction,
    TransactionStatus, UserAccount,
};

use crate::error::Result;

/// Document-store operations used by the booking core.
///
/// Getters return `Ok(None)` for missing entities; mutators fail with
/// `StoreError::NotFound`. Implementations must make
/// [`update_booking_status`](Store::update_booking_status),
/// [`insert_review`](Store::insert_review), and
/// [`insert_transaction_if_unsettled`](Store::insert_transaction_if_unsettled)
/// atomic with respect to concurrent calls on the same entity.
#[async_trait]
pub trait Store: Send + Sync {
    // -- Users --

    /// Inserts a new account; fails with `Duplicate` on a taken email.
    async fn insert_user(&self, user: UserAccount) -> Result<()>;

    async fn user(&self, id: UserId) -> Result<Option<UserAccount>>;

    async fn user_by_email(&self, email: &str) -> Result<Option<UserAccount>>;

    async fn set_user_active(&self, id: UserId, active: bool) -> Result<UserAccount>;

    // -- Service listings --

    async fn insert_listing(&self, listing: ServiceListing) -> Result<()>;

    async fn listing(&self, id: ServiceId) -> Result<Option<ServiceListing>>;

    async fn set_listing_active(&self, id: ServiceId, active: bool) -> Result<ServiceListing>;

    /// Updates the listed price. Existing bookings keep their snapshot.
    async fn set_listing_price(&self, id: ServiceId, price: Money) -> Result<ServiceListing>;

    /// A provider's listings, oldest first.
    async fn listings_for_provider(&self, provider_id: UserId) -> Result<Vec<ServiceListing>>;

    // -- Bookings --

    async fn insert_booking(&self, booking: Booking) -> Result<()>;

    async fn booking(&self, id: BookingId) -> Result<Option<Booking>>;

    /// Atomically moves a booking from `expected` to `next`.
    ///
    /// Fails with `StatusConflict` when the stored status differs from
    /// `expected`, so exactly one of two racing transitions wins.
    async fn update_booking_status(
        &self,
        id: BookingId,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<Booking>;

    /// Bookings addressed to a provider, optionally filtered by status,
    /// ordered by `scheduled_at` ascending, ties broken by `created_at`.
    async fn bookings_for_provider(
        &self,
        provider_id: UserId,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>>;

    /// A customer's bookings, same filter and order as the provider view.
    async fn bookings_for_customer(
        &self,
        customer_id: UserId,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>>;

    /// All bookings (admin view), same filter and order.
    async fn all_bookings(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>>;

    /// PENDING bookings whose `scheduled_at` is before `cutoff`; the
    /// janitor's sweep candidates.
    async fn pending_due_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Booking>>;

    // -- Reviews --

    /// Inserts a review; fails with `Duplicate` when the booking already
    /// has one.
    async fn insert_review(&self, review: Review) -> Result<()>;

    async fn reviews_for_provider(&self, provider_id: UserId) -> Result<Vec<Review>>;

    // -- Transactions --

    /// Inserts a transaction unless a PENDING or SUCCESS transaction
    /// already exists for the booking, in which case `Duplicate`.
    async fn insert_transaction_if_unsettled(&self, txn: Transaction) -> Result<()>;

    async fn set_transaction_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<Transaction>;

    async fn transactions_for_booking(&self, booking_id: BookingId) -> Result<Vec<Transaction>>;

    // -- Provider profiles --

    async fn upsert_profile(&self, profile: ProviderProfile) -> Result<()>;

    async fn profile(&self, provider_id: UserId) -> Result<Option<ProviderProfile>>;

    // -- Notifications --

    async fn insert_notification(&self, notification: Notification) -> Result<()>;

    async fn notification(&self, id: NotificationId) -> Result<Option<Notification>>;

    /// Sets `is_read = true`; a no-op on already-read notifications.
    async fn mark_notification_read(&self, id: NotificationId) -> Result<Notification>;

    /// A recipient's notifications, newest first.
    async fn notifications_for(&self, recipient_id: UserId) -> Result<Vec<Notification>>;
}
