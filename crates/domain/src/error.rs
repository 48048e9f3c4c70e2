//! Domain error taxonomy.
//!
//! Every variant except [`DomainError::Internal`] is recoverable by the
//! caller: fix the input or wait. `Internal` wraps storage-layer failures
//! and deliberately displays nothing about its cause.

use thiserror::Error;

use crate::booking::BookingStatus;

/// Errors surfaced by the booking core.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No identity, or an identity that could not be resolved.
    #[error("authentication required")]
    Unauthenticated,

    /// The caller's role or ownership does not permit the action.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// The referenced entity does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Malformed input, including a missing verification token.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A booking's scheduled time is not strictly in the future.
    #[error("scheduled time must be in the future")]
    InvalidSchedule,

    /// The requested status change is not in the transition table, or a
    /// concurrent winner already moved the booking out of the expected state.
    #[error("cannot transition booking from {from} to {to}")]
    InvalidTransition {
        from: BookingStatus,
        to: BookingStatus,
    },

    /// The booking already has a review.
    #[error("booking has already been reviewed")]
    DuplicateReview,

    /// The booking already has a pending or successful transaction.
    #[error("booking has already been paid")]
    AlreadyPaid,

    /// Too many attempts within the configured window.
    #[error("too many attempts, try again later")]
    RateLimited,

    /// Storage-layer or other infrastructure failure. The detail string is
    /// for logs only and never shown to callers.
    #[error("internal error")]
    Internal(String),
}

impl DomainError {
    /// Convenience constructor for [`DomainError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        DomainError::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Convenience constructor for [`DomainError::Forbidden`].
    pub fn forbidden(reason: impl Into<String>) -> Self {
        DomainError::Forbidden(reason.into())
    }
}
