//! Shared building blocks for the booking core.
//!
//! Typed identifiers, integer-cents money, and an injectable clock so
//! time-dependent logic (schedule validation, expiry sweeps, rate-limit
//! windows) is deterministic under test.

pub mod clock;
pub mod ids;
pub mod money;

pub use clock::{Clock, ManualClock, SystemClock};
pub use ids::{BookingId, NotificationId, ReviewId, ServiceId, TransactionId, UserId};
pub use money::Money;
