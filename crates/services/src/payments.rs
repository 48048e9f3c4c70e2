//! Payment settlement against bookings.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use common::{BookingId, Clock, Money, UserId};
use domain::{DomainError, NotificationType, Transaction, TransactionStatus, UserAccount};
use store::{Store, StoreError};
use thiserror::Error;

use crate::internal;
use crate::notifications::NotificationDispatcher;

/// A declined or failed charge.
#[derive(Debug, Error)]
#[error("payment gateway declined: {0}")]
pub struct GatewayError(pub String);

/// The external charge operation. The core accepts the simulated outcome
/// as given.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn charge(
        &self,
        booking_id: BookingId,
        customer_id: UserId,
        amount: Money,
        method: &str,
    ) -> Result<(), GatewayError>;
}

#[derive(Debug, Default)]
struct SimulatedState {
    charges: u32,
    fail_on_charge: bool,
}

/// Simulated gateway: charges always succeed unless told to fail.
#[derive(Debug, Clone, Default)]
pub struct SimulatedGateway {
    state: Arc<Mutex<SimulatedState>>,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes subsequent charges fail until unset.
    pub fn set_fail_on_charge(&self, fail: bool) {
        self.state.lock().unwrap().fail_on_charge = fail;
    }

    /// Number of successful charges so far.
    pub fn charge_count(&self) -> u32 {
        self.state.lock().unwrap().charges
    }
}

#[async_trait]
impl PaymentGateway for SimulatedGateway {
    async fn charge(
        &self,
        _booking_id: BookingId,
        _customer_id: UserId,
        _amount: Money,
        _method: &str,
    ) -> Result<(), GatewayError> {
        let mut state = self.state.lock().unwrap();
        if state.fail_on_charge {
            return Err(GatewayError("card declined".to_string()));
        }
        state.charges += 1;
        Ok(())
    }
}

/// Settles bookings exactly once.
pub struct PaymentService<S> {
    store: S,
    gateway: Arc<dyn PaymentGateway>,
    dispatcher: Arc<NotificationDispatcher<S>>,
    clock: Arc<dyn Clock>,
}

impl<S: Store> PaymentService<S> {
    pub fn new(
        store: S,
        gateway: Arc<dyn PaymentGateway>,
        dispatcher: Arc<NotificationDispatcher<S>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            gateway,
            dispatcher,
            clock,
        }
    }

    /// Processes a payment for a booking.
    ///
    /// The amount is always the booking's price snapshot. A PENDING
    /// transaction is reserved first — atomically, so a concurrent attempt
    /// fails with `AlreadyPaid` — then resolved against the gateway. A
    /// FAILED resolution is returned as a transaction in FAILED status and
    /// leaves the booking open for retry.
    #[tracing::instrument(skip(self, customer), fields(customer_id = %customer.id))]
    pub async fn process(
        &self,
        customer: &UserAccount,
        booking_id: BookingId,
        method: &str,
    ) -> Result<Transaction, DomainError> {
        let booking = self
            .store
            .booking(booking_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| DomainError::not_found("booking", booking_id))?;

        if booking.customer_id != customer.id {
            return Err(DomainError::forbidden(
                "only the booking's customer may pay for it",
            ));
        }

        let txn = Transaction::pending(
            booking_id,
            booking.price_snapshot,
            method,
            format!("TXN-{}", uuid::Uuid::new_v4().simple()),
            self.clock.now(),
        );
        match self.store.insert_transaction_if_unsettled(txn.clone()).await {
            Ok(()) => {}
            Err(StoreError::Duplicate { .. }) => return Err(DomainError::AlreadyPaid),
            Err(e) => return Err(internal(e)),
        }

        let outcome = self
            .gateway
            .charge(booking_id, customer.id, txn.amount, method)
            .await;

        match outcome {
            Ok(()) => {
                let settled = self
                    .store
                    .set_transaction_status(txn.id, TransactionStatus::Success)
                    .await
                    .map_err(internal)?;
                metrics::counter!("payments_settled_total").increment(1);
                tracing::info!(transaction_id = %settled.id, amount = %settled.amount, "payment settled");

                self.dispatcher
                    .notify(
                        customer.id,
                        NotificationType::PaymentSuccess,
                        serde_json::json!({
                            "transaction_id": settled.id,
                            "external_ref": settled.external_ref,
                            "amount_cents": settled.amount.cents(),
                        }),
                    )
                    .await?;
                Ok(settled)
            }
            Err(e) => {
                // The failed attempt is recorded but no longer blocks the
                // booking; the customer may retry with a fresh transaction.
                tracing::warn!(transaction_id = %txn.id, error = %e, "charge failed");
                self.store
                    .set_transaction_status(txn.id, TransactionStatus::Failed)
                    .await
                    .map_err(internal)
            }
        }
    }

    /// Lists a booking's transactions, visible to its customer.
    pub async fn history(
        &self,
        caller: &UserAccount,
        booking_id: BookingId,
    ) -> Result<Vec<Transaction>, DomainError> {
        let booking = self
            .store
            .booking(booking_id)
            .await
            .map_err(internal)?
            .ok_or_else(|| DomainError::not_found("booking", booking_id))?;
        if booking.customer_id != caller.id {
            return Err(DomainError::forbidden("not the booking's customer"));
        }
        self.store
            .transactions_for_booking(booking_id)
            .await
            .map_err(internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use common::{ManualClock, ServiceId};
    use domain::{Booking, Role};
    use store::InMemoryStore;

    use crate::push::PushRegistry;

    struct Fixture {
        payments: PaymentService<InMemoryStore>,
        gateway: SimulatedGateway,
        store: InMemoryStore,
        customer: UserAccount,
        booking: Booking,
    }

    async fn fixture() -> Fixture {
        let store = InMemoryStore::new();
        let clock = Arc::new(ManualClock::from_system_time());
        let gateway = SimulatedGateway::new();
        let dispatcher = Arc::new(NotificationDispatcher::new(
            store.clone(),
            PushRegistry::new(),
            clock.clone(),
        ));
        let payments = PaymentService::new(
            store.clone(),
            Arc::new(gateway.clone()),
            dispatcher,
            clock.clone(),
        );

        let now = Utc::now();
        let customer = UserAccount::new("C", "c@example.com", "h", Role::Customer, now);
        let booking = Booking::new(
            customer.id,
            UserId::new(),
            ServiceId::new(),
            now + Duration::days(1),
            Money::from_cents(10000),
            None,
            now,
        );
        store.insert_user(customer.clone()).await.unwrap();
        store.insert_booking(booking.clone()).await.unwrap();

        Fixture {
            payments,
            gateway,
            store,
            customer,
            booking,
        }
    }

    #[tokio::test]
    async fn test_settles_at_price_snapshot() {
        let f = fixture().await;
        let txn = f
            .payments
            .process(&f.customer, f.booking.id, "card")
            .await
            .unwrap();

        assert_eq!(txn.status, TransactionStatus::Success);
        assert_eq!(txn.amount.cents(), 10000);
        assert_eq!(f.gateway.charge_count(), 1);
    }

    #[tokio::test]
    async fn test_second_payment_already_paid() {
        let f = fixture().await;
        f.payments
            .process(&f.customer, f.booking.id, "card")
            .await
            .unwrap();

        let err = f
            .payments
            .process(&f.customer, f.booking.id, "card")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::AlreadyPaid));
        assert_eq!(f.gateway.charge_count(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_payments_single_success() {
        let f = fixture().await;
        let (a, b) = tokio::join!(
            f.payments.process(&f.customer, f.booking.id, "card"),
            f.payments.process(&f.customer, f.booking.id, "card"),
        );

        assert_eq!(a.is_ok() as u8 + b.is_ok() as u8, 1);
        let loser = if a.is_ok() { b } else { a };
        assert!(matches!(loser.unwrap_err(), DomainError::AlreadyPaid));
        assert_eq!(f.gateway.charge_count(), 1);
    }

    #[tokio::test]
    async fn test_failed_charge_permits_retry() {
        let f = fixture().await;
        f.gateway.set_fail_on_charge(true);

        let failed = f
            .payments
            .process(&f.customer, f.booking.id, "card")
            .await
            .unwrap();
        assert_eq!(failed.status, TransactionStatus::Failed);

        f.gateway.set_fail_on_charge(false);
        let retried = f
            .payments
            .process(&f.customer, f.booking.id, "card")
            .await
            .unwrap();
        assert_eq!(retried.status, TransactionStatus::Success);

        let history = f
            .payments
            .history(&f.customer, f.booking.id)
            .await
            .unwrap();
        assert_eq!(history.len(), 2);
    }

    #[tokio::test]
    async fn test_success_notifies_customer() {
        let f = fixture().await;
        let txn = f
            .payments
            .process(&f.customer, f.booking.id, "card")
            .await
            .unwrap();

        let inbox = f.store.notifications_for(f.customer.id).await.unwrap();
        assert_eq!(inbox.len(), 1);
        assert_eq!(inbox[0].kind, NotificationType::PaymentSuccess);
        assert_eq!(inbox[0].payload["transaction_id"], serde_json::to_value(txn.id).unwrap());
    }

    #[tokio::test]
    async fn test_stranger_cannot_pay() {
        let f = fixture().await;
        let stranger = UserAccount::new("X", "x@example.com", "h", Role::Customer, Utc::now());

        let err = f
            .payments
            .process(&stranger, f.booking.id, "card")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
