//! Booking status enum.

use serde::{Deserialize, Serialize};

/// The status of a booking in its lifecycle.
///
/// Status transitions:
/// ```text
/// PENDING ──┬──► ACCEPTED ──► IN_PROGRESS ──► COMPLETED
///           ├──► REJECTED
///           └──────┴─────────► CANCELLED
/// ```
/// `REJECTED`, `COMPLETED`, and `CANCELLED` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    /// Created by the customer, awaiting the provider's answer.
    #[default]
    Pending,

    /// Provider agreed to take the job.
    Accepted,

    /// Provider declined the request (terminal).
    Rejected,

    /// Work has started.
    InProgress,

    /// Work finished (terminal).
    Completed,

    /// Called off before work started (terminal).
    Cancelled,
}

impl BookingStatus {
    /// Returns true if no further transitions are possible from this status.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            BookingStatus::Rejected | BookingStatus::Completed | BookingStatus::Cancelled
        )
    }

    /// Returns the status name as the wire-format string.
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "PENDING",
            BookingStatus::Accepted => "ACCEPTED",
            BookingStatus::Rejected => "REJECTED",
            BookingStatus::InProgress => "IN_PROGRESS",
            BookingStatus::Completed => "COMPLETED",
            BookingStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_pending() {
        assert_eq!(BookingStatus::default(), BookingStatus::Pending);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!BookingStatus::Pending.is_terminal());
        assert!(!BookingStatus::Accepted.is_terminal());
        assert!(!BookingStatus::InProgress.is_terminal());
        assert!(BookingStatus::Rejected.is_terminal());
        assert!(BookingStatus::Completed.is_terminal());
        assert!(BookingStatus::Cancelled.is_terminal());
    }

    #[test]
    fn test_display() {
        assert_eq!(BookingStatus::InProgress.to_string(), "IN_PROGRESS");
        assert_eq!(BookingStatus::Pending.to_string(), "PENDING");
    }

    #[test]
    fn test_serialization_uses_wire_names() {
        let json = serde_json::to_string(&BookingStatus::InProgress).unwrap();
        assert_eq!(json, "\"IN_PROGRESS\"");
        let back: BookingStatus = serde_json::from_str("\"CANCELLED\"").unwrap();
        assert_eq!(back, BookingStatus::Cancelled);
    }
}
