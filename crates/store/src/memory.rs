//! In-memory store implementation.
//!
//! Reference backend with the same interface a document-store adapter
//! would have. All maps live behind one `RwLock` so the compare-and-swap
//! and check-and-insert operations are atomic under the write lock.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{BookingId, Money, NotificationId, ReviewId, ServiceId, TransactionId, UserId};
use domain::{
    Booking, BookingStatus, Notification, ProviderProfile, Review, ServiceListing, Transaction,
    TransactionStatus, UserAccount,
};
use tokio::sync::RwLock;

use crate::error::{Result, StoreError};
use crate::store::Store;

#[derive(Debug, Default)]
struct Inner {
    users: HashMap<UserId, UserAccount>,
    listings: HashMap<ServiceId, ServiceListing>,
    bookings: HashMap<BookingId, Booking>,
    reviews: HashMap<ReviewId, Review>,
    transactions: HashMap<TransactionId, Transaction>,
    profiles: HashMap<UserId, ProviderProfile>,
    notifications: HashMap<NotificationId, Notification>,
}

/// In-memory [`Store`] for the server binary and tests.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<RwLock<Inner>>,
}

impl InMemoryStore {
    /// Creates a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored bookings.
    pub async fn booking_count(&self) -> usize {
        self.inner.read().await.bookings.len()
    }
}

fn sort_bookings(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by(|a, b| {
        a.scheduled_at
            .cmp(&b.scheduled_at)
            .then(a.created_at.cmp(&b.created_at))
    });
    bookings
}

#[async_trait]
impl Store for InMemoryStore {
    async fn insert_user(&self, user: UserAccount) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::duplicate("user", &user.email));
        }
        inner.users.insert(user.id, user);
        Ok(())
    }

    async fn user(&self, id: UserId) -> Result<Option<UserAccount>> {
        Ok(self.inner.read().await.users.get(&id).cloned())
    }

    async fn user_by_email(&self, email: &str) -> Result<Option<UserAccount>> {
        let inner = self.inner.read().await;
        Ok(inner.users.values().find(|u| u.email == email).cloned())
    }

    async fn set_user_active(&self, id: UserId, active: bool) -> Result<UserAccount> {
        let mut inner = self.inner.write().await;
        let user = inner
            .users
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("user", id))?;
        user.active = active;
        Ok(user.clone())
    }

    async fn insert_listing(&self, listing: ServiceListing) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.listings.insert(listing.id, listing);
        Ok(())
    }

    async fn listing(&self, id: ServiceId) -> Result<Option<ServiceListing>> {
        Ok(self.inner.read().await.listings.get(&id).cloned())
    }

    async fn set_listing_active(&self, id: ServiceId, active: bool) -> Result<ServiceListing> {
        let mut inner = self.inner.write().await;
        let listing = inner
            .listings
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("service", id))?;
        listing.active = active;
        Ok(listing.clone())
    }

    async fn set_listing_price(&self, id: ServiceId, price: Money) -> Result<ServiceListing> {
        let mut inner = self.inner.write().await;
        let listing = inner
            .listings
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("service", id))?;
        listing.price = price;
        Ok(listing.clone())
    }

    async fn listings_for_provider(&self, provider_id: UserId) -> Result<Vec<ServiceListing>> {
        let inner = self.inner.read().await;
        let mut listings: Vec<_> = inner
            .listings
            .values()
            .filter(|l| l.provider_id == provider_id)
            .cloned()
            .collect();
        listings.sort_by_key(|l| l.created_at);
        Ok(listings)
    }

    async fn insert_booking(&self, booking: Booking) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.bookings.insert(booking.id, booking);
        Ok(())
    }

    async fn booking(&self, id: BookingId) -> Result<Option<Booking>> {
        Ok(self.inner.read().await.bookings.get(&id).cloned())
    }

    async fn update_booking_status(
        &self,
        id: BookingId,
        expected: BookingStatus,
        next: BookingStatus,
    ) -> Result<Booking> {
        let mut inner = self.inner.write().await;
        let booking = inner
            .bookings
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("booking", id))?;

        if booking.status != expected {
            return Err(StoreError::StatusConflict {
                booking_id: id,
                expected,
                actual: booking.status,
            });
        }

        booking.status = next;
        Ok(booking.clone())
    }

    async fn bookings_for_provider(
        &self,
        provider_id: UserId,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>> {
        let inner = self.inner.read().await;
        let bookings = inner
            .bookings
            .values()
            .filter(|b| b.provider_id == provider_id)
            .filter(|b| status.is_none_or(|s| b.status == s))
            .cloned()
            .collect();
        Ok(sort_bookings(bookings))
    }

    async fn bookings_for_customer(
        &self,
        customer_id: UserId,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>> {
        let inner = self.inner.read().await;
        let bookings = inner
            .bookings
            .values()
            .filter(|b| b.customer_id == customer_id)
            .filter(|b| status.is_none_or(|s| b.status == s))
            .cloned()
            .collect();
        Ok(sort_bookings(bookings))
    }

    async fn all_bookings(&self, status: Option<BookingStatus>) -> Result<Vec<Booking>> {
        let inner = self.inner.read().await;
        let bookings = inner
            .bookings
            .values()
            .filter(|b| status.is_none_or(|s| b.status == s))
            .cloned()
            .collect();
        Ok(sort_bookings(bookings))
    }

    async fn pending_due_before(&self, cutoff: DateTime<Utc>) -> Result<Vec<Booking>> {
        let inner = self.inner.read().await;
        let bookings = inner
            .bookings
            .values()
            .filter(|b| b.status == BookingStatus::Pending && b.scheduled_at < cutoff)
            .cloned()
            .collect();
        Ok(sort_bookings(bookings))
    }

    async fn insert_review(&self, review: Review) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner
            .reviews
            .values()
            .any(|r| r.booking_id == review.booking_id)
        {
            return Err(StoreError::duplicate("review", review.booking_id));
        }
        inner.reviews.insert(review.id, review);
        Ok(())
    }

    async fn reviews_for_provider(&self, provider_id: UserId) -> Result<Vec<Review>> {
        let inner = self.inner.read().await;
        let mut reviews: Vec<_> = inner
            .reviews
            .values()
            .filter(|r| r.provider_id == provider_id)
            .cloned()
            .collect();
        reviews.sort_by_key(|r| r.created_at);
        Ok(reviews)
    }

    async fn insert_transaction_if_unsettled(&self, txn: Transaction) -> Result<()> {
        let mut inner = self.inner.write().await;
        if inner
            .transactions
            .values()
            .any(|t| t.booking_id == txn.booking_id && t.status.settles_booking())
        {
            return Err(StoreError::duplicate("transaction", txn.booking_id));
        }
        inner.transactions.insert(txn.id, txn);
        Ok(())
    }

    async fn set_transaction_status(
        &self,
        id: TransactionId,
        status: TransactionStatus,
    ) -> Result<Transaction> {
        let mut inner = self.inner.write().await;
        let txn = inner
            .transactions
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("transaction", id))?;
        txn.status = status;
        Ok(txn.clone())
    }

    async fn transactions_for_booking(&self, booking_id: BookingId) -> Result<Vec<Transaction>> {
        let inner = self.inner.read().await;
        let mut txns: Vec<_> = inner
            .transactions
            .values()
            .filter(|t| t.booking_id == booking_id)
            .cloned()
            .collect();
        txns.sort_by_key(|t| t.created_at);
        Ok(txns)
    }

    async fn upsert_profile(&self, profile: ProviderProfile) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.profiles.insert(profile.provider_id, profile);
        Ok(())
    }

    async fn profile(&self, provider_id: UserId) -> Result<Option<ProviderProfile>> {
        Ok(self.inner.read().await.profiles.get(&provider_id).cloned())
    }

    async fn insert_notification(&self, notification: Notification) -> Result<()> {
        let mut inner = self.inner.write().await;
        inner.notifications.insert(notification.id, notification);
        Ok(())
    }

    async fn notification(&self, id: NotificationId) -> Result<Option<Notification>> {
        Ok(self.inner.read().await.notifications.get(&id).cloned())
    }

    async fn mark_notification_read(&self, id: NotificationId) -> Result<Notification> {
        let mut inner = self.inner.write().await;
        let notification = inner
            .notifications
            .get_mut(&id)
            .ok_or_else(|| StoreError::not_found("notification", id))?;
        notification.is_read = true;
        Ok(notification.clone())
    }

    async fn notifications_for(&self, recipient_id: UserId) -> Result<Vec<Notification>> {
        let inner = self.inner.read().await;
        let mut notifications: Vec<_> = inner
            .notifications
            .values()
            .filter(|n| n.recipient_id == recipient_id)
            .cloned()
            .collect();
        notifications.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notifications)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use domain::Role;

    fn booking_at(provider_id: UserId, scheduled_at: DateTime<Utc>, created_at: DateTime<Utc>) -> Booking {
        Booking::new(
            UserId::new(),
            provider_id,
            ServiceId::new(),
            scheduled_at,
            Money::from_cents(1000),
            None,
            created_at,
        )
    }

    #[tokio::test]
    async fn test_insert_user_rejects_taken_email() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let a = UserAccount::new("A", "a@example.com", "hash", Role::Customer, now);
        let b = UserAccount::new("B", "a@example.com", "hash", Role::Provider, now);

        store.insert_user(a).await.unwrap();
        let err = store.insert_user(b).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_status_cas_single_winner() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let booking = booking_at(UserId::new(), now + Duration::days(1), now);
        let id = booking.id;
        store.insert_booking(booking).await.unwrap();

        store
            .update_booking_status(id, BookingStatus::Pending, BookingStatus::Accepted)
            .await
            .unwrap();

        // Second mover expected PENDING and must lose.
        let err = store
            .update_booking_status(id, BookingStatus::Pending, BookingStatus::Cancelled)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StoreError::StatusConflict {
                actual: BookingStatus::Accepted,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_provider_queue_sorted_by_schedule() {
        let store = InMemoryStore::new();
        let provider = UserId::new();
        let now = Utc::now();

        let later = booking_at(provider, now + Duration::days(2), now);
        let sooner = booking_at(provider, now + Duration::days(1), now + Duration::seconds(5));
        let later_id = later.id;
        let sooner_id = sooner.id;

        // Inserted in creation order: later first.
        store.insert_booking(later).await.unwrap();
        store.insert_booking(sooner).await.unwrap();

        let queue = store
            .bookings_for_provider(provider, Some(BookingStatus::Pending))
            .await
            .unwrap();
        assert_eq!(queue[0].id, sooner_id);
        assert_eq!(queue[1].id, later_id);
    }

    #[tokio::test]
    async fn test_schedule_tie_broken_by_creation_order() {
        let store = InMemoryStore::new();
        let provider = UserId::new();
        let now = Utc::now();
        let at = now + Duration::days(1);

        let first = booking_at(provider, at, now);
        let second = booking_at(provider, at, now + Duration::seconds(1));
        let first_id = first.id;

        store.insert_booking(second).await.unwrap();
        store.insert_booking(first).await.unwrap();

        let queue = store.bookings_for_provider(provider, None).await.unwrap();
        assert_eq!(queue[0].id, first_id);
    }

    #[tokio::test]
    async fn test_review_unique_per_booking() {
        let store = InMemoryStore::new();
        let booking_id = BookingId::new();
        let provider = UserId::new();
        let now = Utc::now();

        let first = Review::new(booking_id, UserId::new(), provider, 5, "great", now).unwrap();
        let second = Review::new(booking_id, UserId::new(), provider, 1, "meh", now).unwrap();

        store.insert_review(first).await.unwrap();
        let err = store.insert_review(second).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate { .. }));
    }

    #[tokio::test]
    async fn test_failed_transaction_does_not_block_retry() {
        let store = InMemoryStore::new();
        let booking_id = BookingId::new();
        let now = Utc::now();

        let first = Transaction::pending(booking_id, Money::from_cents(100), "card", "T-1", now);
        let first_id = first.id;
        store.insert_transaction_if_unsettled(first).await.unwrap();

        // While PENDING the booking is settled.
        let blocked = Transaction::pending(booking_id, Money::from_cents(100), "card", "T-2", now);
        assert!(store.insert_transaction_if_unsettled(blocked).await.is_err());

        store
            .set_transaction_status(first_id, TransactionStatus::Failed)
            .await
            .unwrap();

        let retry = Transaction::pending(booking_id, Money::from_cents(100), "card", "T-3", now);
        store.insert_transaction_if_unsettled(retry).await.unwrap();
    }

    #[tokio::test]
    async fn test_mark_notification_read_is_idempotent() {
        let store = InMemoryStore::new();
        let n = Notification::new(
            UserId::new(),
            domain::NotificationType::BookingRequest,
            serde_json::Value::Null,
            Utc::now(),
        );
        let id = n.id;
        store.insert_notification(n).await.unwrap();

        let once = store.mark_notification_read(id).await.unwrap();
        assert!(once.is_read);
        let twice = store.mark_notification_read(id).await.unwrap();
        assert!(twice.is_read);
    }

    #[tokio::test]
    async fn test_pending_due_before_skips_other_statuses() {
        let store = InMemoryStore::new();
        let now = Utc::now();
        let provider = UserId::new();

        let overdue = booking_at(provider, now - Duration::hours(2), now - Duration::days(1));
        let overdue_id = overdue.id;
        let accepted = booking_at(provider, now - Duration::hours(2), now - Duration::days(1));
        let accepted_id = accepted.id;
        let future = booking_at(provider, now + Duration::hours(2), now);

        store.insert_booking(overdue).await.unwrap();
        store.insert_booking(accepted).await.unwrap();
        store.insert_booking(future).await.unwrap();
        store
            .update_booking_status(accepted_id, BookingStatus::Pending, BookingStatus::Accepted)
            .await
            .unwrap();

        let due = store.pending_due_before(now).await.unwrap();
        assert_eq!(due.len(), 1);
        assert_eq!(due[0].id, overdue_id);
    }
}
