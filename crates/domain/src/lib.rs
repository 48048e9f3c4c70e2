//! Domain layer for the booking core.
//!
//! This crate provides the entities and rules the rest of the system is
//! built on:
//! - the booking state machine and its per-actor transition table
//! - accounts, service listings, reviews, transactions, notifications
//! - the role/capability model checked at the access boundary
//! - the shared [`DomainError`] taxonomy

pub mod access;
pub mod accounts;
pub mod booking;
pub mod catalog;
pub mod error;
pub mod notifications;
pub mod payments;
pub mod reviews;

pub use access::{Action, Role};
pub use accounts::{ProviderProfile, UserAccount};
pub use booking::{Actor, Booking, BookingEvent, BookingStatus, TransitionCause};
pub use catalog::ServiceListing;
pub use error::DomainError;
pub use notifications::{Notification, NotificationType};
pub use payments::{Transaction, TransactionStatus};
pub use reviews::Review;
