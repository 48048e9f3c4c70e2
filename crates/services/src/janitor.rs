//! Periodic expiry of stale pending bookings.

use std::sync::Arc;

use chrono::Duration;
use common::Clock;
use domain::DomainError;
use store::Store;

use crate::bookings::BookingService;
use crate::internal;

/// Sweep schedule and grace window.
#[derive(Debug, Clone, Copy)]
pub struct JanitorConfig {
    /// How long past `scheduled_at` a PENDING booking may linger before
    /// it is cancelled.
    pub grace: Duration,
    /// Time between sweeps.
    pub sweep_interval: std::time::Duration,
}

impl Default for JanitorConfig {
    fn default() -> Self {
        Self {
            grace: Duration::minutes(15),
            sweep_interval: std::time::Duration::from_secs(60),
        }
    }
}

/// What one sweep did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepOutcome {
    /// Bookings cancelled as expired.
    pub expired: usize,
    /// Candidates a concurrent user transition won first.
    pub lost_races: usize,
}

/// Cancels PENDING bookings whose scheduled time passed the grace window.
///
/// Goes through the same transition path as user calls, so the table and
/// the CAS guard are not duplicated: a candidate that a user moved
/// concurrently simply loses the race and is skipped.
pub struct ExpiryJanitor<S> {
    store: S,
    bookings: Arc<BookingService<S>>,
    clock: Arc<dyn Clock>,
    config: JanitorConfig,
}

impl<S: Store> ExpiryJanitor<S> {
    pub fn new(
        store: S,
        bookings: Arc<BookingService<S>>,
        clock: Arc<dyn Clock>,
        config: JanitorConfig,
    ) -> Self {
        Self {
            store,
            bookings,
            clock,
            config,
        }
    }

    /// One idempotent sweep. Candidates are processed one at a time so a
    /// slow transition never stalls the rest, and no lock is held across
    /// the sweep.
    #[tracing::instrument(skip(self))]
    pub async fn sweep(&self) -> Result<SweepOutcome, DomainError> {
        let cutoff = self.clock.now() - self.config.grace;
        let candidates = self
            .store
            .pending_due_before(cutoff)
            .await
            .map_err(internal)?;

        let mut outcome = SweepOutcome::default();
        for booking in candidates {
            match self.bookings.expire(&booking).await {
                Ok(_) => outcome.expired += 1,
                Err(DomainError::InvalidTransition { .. }) => {
                    // A user transition won; nothing to do.
                    outcome.lost_races += 1;
                }
                Err(e) => {
                    tracing::warn!(booking_id = %booking.id, error = %e, "expiry failed");
                }
            }
        }

        if outcome.expired > 0 {
            metrics::counter!("bookings_expired_total").increment(outcome.expired as u64);
            tracing::info!(expired = outcome.expired, lost_races = outcome.lost_races, "sweep done");
        }
        Ok(outcome)
    }

    /// Runs sweeps forever on the configured interval. Spawn this on its
    /// own task; abort the task to stop it.
    pub async fn run(self) {
        let mut interval = tokio::time::interval(self.config.sweep_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            if let Err(e) = self.sweep().await {
                tracing::error!(error = %e, "janitor sweep failed");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{ManualClock, Money};
    use domain::{BookingStatus, Role, ServiceListing, UserAccount};
    use store::InMemoryStore;

    use crate::bookings::NewBooking;
    use crate::notifications::NotificationDispatcher;
    use crate::push::PushRegistry;

    struct Fixture {
        janitor: ExpiryJanitor<InMemoryStore>,
        bookings: Arc<BookingService<InMemoryStore>>,
        store: InMemoryStore,
        clock: Arc<ManualClock>,
        customer: UserAccount,
        provider: UserAccount,
        listing: ServiceListing,
    }

    async fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        let clock = Arc::new(ManualClock::from_system_time());
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            PushRegistry::new(),
            clock.clone(),
        ));
        let bookings = Arc::new(BookingService::new(
            store.clone(),
            dispatcher,
            clock.clone(),
        ));
        let janitor = ExpiryJanitor::new(
            store.clone(),
            bookings.clone(),
            clock.clone(),
            JanitorConfig::default(),
        );

        let now = clock.now();
        let customer = UserAccount::new("C", "c@example.com", "h", Role::Customer, now);
        let provider = UserAccount::new("P", "p@example.com", "h", Role::Provider, now);
        let listing = ServiceListing::new(provider.id, "Painting", Money::from_cents(5000), now);
        store.insert_user(customer.clone()).await.unwrap();
        store.insert_user(provider.clone()).await.unwrap();
        store.insert_listing(listing.clone()).await.unwrap();

        Fixture {
            janitor,
            bookings,
            store,
            clock,
            customer,
            provider,
            listing,
        }
    }

    async fn booking_in(f: &Fixture, offset: Duration) -> domain::Booking {
        f.bookings
            .create(
                &f.customer,
                NewBooking {
                    service_id: f.listing.id,
                    scheduled_at: f.clock.now() + offset,
                    notes: None,
                },
            )
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_sweep_expires_only_past_grace() {
        let f = fixture().await;
        let overdue = booking_in(&f, Duration::hours(1)).await;
        let within_grace = booking_in(&f, Duration::hours(2)).await;

        // 1h10m later: `overdue` is 10 minutes past, still inside the
        // 15-minute grace; nothing expires.
        f.clock.advance(Duration::minutes(70));
        assert_eq!(f.janitor.sweep().await.unwrap(), SweepOutcome::default());

        // Another 10 minutes: `overdue` is past grace, `within_grace` not.
        f.clock.advance(Duration::minutes(10));
        let outcome = f.janitor.sweep().await.unwrap();
        assert_eq!(outcome.expired, 1);

        let expired = f.store.booking(overdue.id).await.unwrap().unwrap();
        assert_eq!(expired.status, BookingStatus::Cancelled);
        let kept = f.store.booking(within_grace.id).await.unwrap().unwrap();
        assert_eq!(kept.status, BookingStatus::Pending);
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let f = fixture().await;
        booking_in(&f, Duration::hours(1)).await;
        f.clock.advance(Duration::hours(2));

        assert_eq!(f.janitor.sweep().await.unwrap().expired, 1);
        assert_eq!(f.janitor.sweep().await.unwrap(), SweepOutcome::default());
    }

    #[tokio::test]
    async fn test_expired_event_tags_cause() {
        let f = fixture().await;
        booking_in(&f, Duration::hours(1)).await;
        f.clock.advance(Duration::hours(2));
        f.janitor.sweep().await.unwrap();

        // Creation notified the provider; expiry notifies the customer.
        let inbox = f.store.notifications_for(f.customer.id).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].payload["cause"], "expired");
        assert_eq!(inbox[0].payload["status"], "CANCELLED");
    }

    #[tokio::test]
    async fn test_janitor_loses_race_to_user_transition() {
        let f = fixture().await;
        let booking = booking_in(&f, Duration::hours(1)).await;
        f.clock.advance(Duration::hours(2));

        // The provider accepts between the janitor's read and its CAS.
        f.bookings
            .transition(&f.provider, booking.id, BookingStatus::Accepted)
            .await
            .unwrap();
        let err = f.bookings.expire(&booking).await.unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));

        let kept = f.store.booking(booking.id).await.unwrap().unwrap();
        assert_eq!(kept.status, BookingStatus::Accepted);
    }
}
