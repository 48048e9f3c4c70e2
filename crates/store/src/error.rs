//! Storage error types.

use common::BookingId;
use domain::BookingStatus;
use thiserror::Error;

/// Errors returned by storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A uniqueness constraint would be violated.
    #[error("duplicate {entity} for key {key}")]
    Duplicate { entity: &'static str, key: String },

    /// A compare-and-swap on booking status lost to a concurrent writer:
    /// the stored status no longer matches the expected source state.
    #[error("booking {booking_id} is {actual}, expected {expected}")]
    StatusConflict {
        booking_id: BookingId,
        expected: BookingStatus,
        actual: BookingStatus,
    },

    /// Backend failure (connection loss, corrupt document, ...).
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        StoreError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn duplicate(entity: &'static str, key: impl ToString) -> Self {
        StoreError::Duplicate {
            entity,
            key: key.to_string(),
        }
    }
}

/// Result type for store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;
