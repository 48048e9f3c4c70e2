//! Booking creation, transitions, listings, and provider earnings.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::{BookingId, Clock, Money, ServiceId, UserId};
use domain::booking::check_transition;
use domain::{
    Actor, Booking, BookingEvent, BookingStatus, DomainError, Role, ServiceListing,
    TransitionCause, UserAccount,
};
use store::{Store, StoreError};

use crate::internal;
use crate::notifications::NotificationDispatcher;

/// Input for creating a booking.
#[derive(Debug, Clone)]
pub struct NewBooking {
    pub service_id: ServiceId,
    pub scheduled_at: DateTime<Utc>,
    pub notes: Option<String>,
}

/// A provider's settled-work summary, computed from COMPLETED bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct ProviderEarnings {
    pub total: Money,
    pub completed_jobs: u64,
}

/// Owns the booking lifecycle.
///
/// Every successful creation or transition emits exactly one domain event,
/// handed to the dispatcher before the call returns.
pub struct BookingService<S> {
    store: S,
    dispatcher: Arc<NotificationDispatcher<S>>,
    clock: Arc<dyn Clock>,
}

impl<S: Store> BookingService<S> {
    pub fn new(store: S, dispatcher: Arc<NotificationDispatcher<S>>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            dispatcher,
            clock,
        }
    }

    /// Creates a PENDING booking for the customer.
    ///
    /// `scheduled_at` must be strictly in the future, the listing must be
    /// active, and the listing price is copied into the booking here — the
    /// only point where price is read from the listing.
    #[tracing::instrument(skip(self, customer, req), fields(customer_id = %customer.id))]
    pub async fn create(
        &self,
        customer: &UserAccount,
        req: NewBooking,
    ) -> Result<Booking, DomainError> {
        let listing = self.active_listing(req.service_id).await?;

        let now = self.clock.now();
        if req.scheduled_at <= now {
            return Err(DomainError::InvalidSchedule);
        }

        let booking = Booking::new(
            customer.id,
            listing.provider_id,
            listing.id,
            req.scheduled_at,
            listing.price,
            req.notes,
            now,
        );
        self.store
            .insert_booking(booking.clone())
            .await
            .map_err(internal)?;
        metrics::counter!("bookings_created_total").increment(1);
        tracing::info!(booking_id = %booking.id, provider_id = %booking.provider_id, "booking created");

        let event = BookingEvent::Requested {
            booking_id: booking.id,
            customer_id: booking.customer_id,
            provider_id: booking.provider_id,
            scheduled_at: booking.scheduled_at,
        };
        self.dispatcher.dispatch(&event).await?;

        Ok(booking)
    }

    /// Applies a user-requested status change.
    ///
    /// The caller must be a party to the booking (or an admin); the
    /// transition table decides whether their role may take this edge.
    #[tracing::instrument(skip(self, caller), fields(caller_id = %caller.id))]
    pub async fn transition(
        &self,
        caller: &UserAccount,
        booking_id: BookingId,
        next: BookingStatus,
    ) -> Result<Booking, DomainError> {
        let booking = self.load(booking_id).await?;
        let actor = resolve_actor(caller, &booking)?;
        self.apply(&booking, next, actor, TransitionCause::User)
            .await
    }

    /// Cancels an overdue PENDING booking on behalf of the janitor.
    pub async fn expire(&self, booking: &Booking) -> Result<Booking, DomainError> {
        self.apply(
            booking,
            BookingStatus::Cancelled,
            Actor::Janitor,
            TransitionCause::Expired,
        )
        .await
    }

    /// Lists bookings visible to the caller: their own for customers and
    /// providers, everything for admins. Ordered by `scheduled_at`, ties
    /// broken by creation order.
    pub async fn list_for(
        &self,
        caller: &UserAccount,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, DomainError> {
        let result = match caller.role {
            Role::Customer => self.store.bookings_for_customer(caller.id, status).await,
            Role::Provider => self.store.bookings_for_provider(caller.id, status).await,
            Role::Admin => self.store.all_bookings(status).await,
        };
        result.map_err(internal)
    }

    /// Loads one booking, visible only to its parties and admins.
    pub async fn get(
        &self,
        caller: &UserAccount,
        booking_id: BookingId,
    ) -> Result<Booking, DomainError> {
        let booking = self.load(booking_id).await?;
        let is_party = caller.id == booking.customer_id || caller.id == booking.provider_id;
        if !is_party && caller.role != Role::Admin {
            return Err(DomainError::forbidden("not a party to this booking"));
        }
        Ok(booking)
    }

    /// Sums the price snapshots of a provider's COMPLETED bookings.
    pub async fn provider_earnings(
        &self,
        provider_id: UserId,
    ) -> Result<ProviderEarnings, DomainError> {
        let completed = self
            .store
            .bookings_for_provider(provider_id, Some(BookingStatus::Completed))
            .await
            .map_err(internal)?;

        Ok(ProviderEarnings {
            total: completed.iter().map(|b| b.price_snapshot).sum(),
            completed_jobs: completed.len() as u64,
        })
    }

    /// The single transition path, shared by user calls and the janitor.
    ///
    /// Legality is checked against the snapshot we read, then the store's
    /// compare-and-swap guards against a concurrent winner: if the status
    /// moved underneath us, the CAS fails and we surface `InvalidTransition`
    /// instead of double-applying.
    async fn apply(
        &self,
        booking: &Booking,
        next: BookingStatus,
        actor: Actor,
        cause: TransitionCause,
    ) -> Result<Booking, DomainError> {
        check_transition(booking.status, next, actor)?;

        let updated = match self
            .store
            .update_booking_status(booking.id, booking.status, next)
            .await
        {
            Ok(updated) => updated,
            Err(StoreError::StatusConflict { actual, .. }) => {
                return Err(DomainError::InvalidTransition {
                    from: actual,
                    to: next,
                });
            }
            Err(e) => return Err(internal(e)),
        };
        metrics::counter!("booking_transitions_total").increment(1);
        tracing::info!(booking_id = %updated.id, status = %updated.status, ?actor, "booking transitioned");

        let event = BookingEvent::StatusChanged {
            booking_id: updated.id,
            customer_id: updated.customer_id,
            provider_id: updated.provider_id,
            status: updated.status,
            actor,
            cause,
        };
        self.dispatcher.dispatch(&event).await?;

        Ok(updated)
    }

    async fn load(&self, booking_id: BookingId) -> Result<Booking, DomainError> {
        self.store
            .booking(booking_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| DomainError::not_found("booking", booking_id))
    }

    async fn active_listing(&self, service_id: ServiceId) -> Result<ServiceListing, DomainError> {
        let listing = self
            .store
            .listing(service_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| DomainError::not_found("service", service_id))?;
        if !listing.active {
            return Err(DomainError::InvalidRequest(
                "service listing is inactive".to_string(),
            ));
        }
        Ok(listing)
    }
}

/// Resolves a caller to a transition actor for this booking.
fn resolve_actor(caller: &UserAccount, booking: &Booking) -> Result<Actor, DomainError> {
    match caller.role {
        Role::Admin => Ok(Actor::Admin),
        Role::Provider if caller.id == booking.provider_id => Ok(Actor::Provider),
        Role::Customer if caller.id == booking.customer_id => Ok(Actor::Customer),
        _ => Err(DomainError::forbidden("not a party to this booking")),
    }
}
