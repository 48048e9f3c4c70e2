//! Booking lifecycle: entity, status machine, transition table, events.

mod events;
mod model;
mod status;
mod transition;

pub use events::BookingEvent;
pub use model::Booking;
pub use status::BookingStatus;
pub use transition::{Actor, TransitionCause, check_transition, transition_allowed};
