//! Payment transactions recorded against bookings.

use chrono::{DateTime, Utc};
use common::{BookingId, Money, TransactionId};
use serde::{Deserialize, Serialize};

/// Lifecycle of a single payment attempt.
///
/// `PENDING → SUCCESS | FAILED` are terminal for the attempt; `REFUNDED`
/// is recorded by back-office tooling after a `SUCCESS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
    Refunded,
}

impl TransactionStatus {
    /// Returns true if this attempt blocks another charge on the booking.
    /// A FAILED attempt does not: the customer may retry.
    pub fn settles_booking(&self) -> bool {
        matches!(self, TransactionStatus::Pending | TransactionStatus::Success)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Success => "SUCCESS",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Refunded => "REFUNDED",
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A recorded payment attempt. Amount always equals the booking's price
/// snapshot at the time of settlement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub booking_id: BookingId,
    pub amount: Money,
    pub status: TransactionStatus,
    /// Payment method label, e.g. "card".
    pub method: String,
    /// Unique external reference assigned by the gateway.
    pub external_ref: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    /// Creates a new attempt in PENDING, awaiting gateway resolution.
    pub fn pending(
        booking_id: BookingId,
        amount: Money,
        method: impl Into<String>,
        external_ref: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            booking_id,
            amount,
            status: TransactionStatus::Pending,
            method: method.into(),
            external_ref: external_ref.into(),
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settling_statuses() {
        assert!(TransactionStatus::Pending.settles_booking());
        assert!(TransactionStatus::Success.settles_booking());
        assert!(!TransactionStatus::Failed.settles_booking());
        assert!(!TransactionStatus::Refunded.settles_booking());
    }

    #[test]
    fn test_pending_constructor() {
        let txn = Transaction::pending(
            BookingId::new(),
            Money::from_cents(5000),
            "card",
            "TXN-0001",
            Utc::now(),
        );
        assert_eq!(txn.status, TransactionStatus::Pending);
        assert_eq!(txn.amount.cents(), 5000);
    }

    #[test]
    fn test_status_wire_format() {
        let json = serde_json::to_string(&TransactionStatus::Success).unwrap();
        assert_eq!(json, "\"SUCCESS\"");
    }
}
