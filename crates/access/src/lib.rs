//! The access gate.
//!
//! Everything a request must clear before it reaches the services:
//! registration (with bot-verification token), login (bcrypt check behind
//! a sliding-window rate limiter), session-token authentication, and the
//! role capability check.

pub mod gate;
pub mod rate_limit;

pub use gate::{AccessGate, RegisterRequest, Session};
pub use rate_limit::{AttemptCounter, InMemoryAttemptCounter, RateLimitPolicy};
