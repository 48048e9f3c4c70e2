//! The booking transition table.
//!
//! Legality is a pure function of `(from, to, actor)` so both user-driven
//! calls and the expiry janitor go through the same rules.

use serde::{Deserialize, Serialize};

use super::BookingStatus;
use crate::error::DomainError;

/// Who is attempting a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    /// The customer who created the booking.
    Customer,
    /// The provider the booking is addressed to.
    Provider,
    /// A platform administrator.
    Admin,
    /// The expiry janitor acting on stale pending bookings.
    Janitor,
}

/// Why a transition happened; carried in the emitted event payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionCause {
    /// A user (or admin) asked for the change.
    User,
    /// The janitor cancelled an overdue pending booking.
    Expired,
}

/// Returns true if `actor` may move a booking from `from` to `to`.
pub fn transition_allowed(from: BookingStatus, to: BookingStatus, actor: Actor) -> bool {
    use BookingStatus::*;

    match (from, to) {
        (Pending, Accepted) | (Pending, Rejected) => {
            matches!(actor, Actor::Provider | Actor::Admin)
        }
        (Accepted, InProgress) => matches!(actor, Actor::Provider),
        (InProgress, Completed) => matches!(actor, Actor::Provider),
        (Pending, Cancelled) | (Accepted, Cancelled) => true,
        _ => false,
    }
}

/// Checks the transition table, failing with
/// [`DomainError::InvalidTransition`] when the edge is absent and
/// [`DomainError::Forbidden`] when the edge exists but not for this actor.
pub fn check_transition(
    from: BookingStatus,
    to: BookingStatus,
    actor: Actor,
) -> Result<(), DomainError> {
    let edge_exists = [Actor::Customer, Actor::Provider, Actor::Admin, Actor::Janitor]
        .into_iter()
        .any(|a| transition_allowed(from, to, a));

    if !edge_exists {
        return Err(DomainError::InvalidTransition { from, to });
    }
    if !transition_allowed(from, to, actor) {
        return Err(DomainError::forbidden(format!(
            "{actor:?} may not move a booking from {from} to {to}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use BookingStatus::*;

    #[test]
    fn test_provider_answers_pending() {
        assert!(transition_allowed(Pending, Accepted, Actor::Provider));
        assert!(transition_allowed(Pending, Rejected, Actor::Provider));
        assert!(transition_allowed(Pending, Accepted, Actor::Admin));
        assert!(!transition_allowed(Pending, Accepted, Actor::Customer));
        assert!(!transition_allowed(Pending, Accepted, Actor::Janitor));
    }

    #[test]
    fn test_only_provider_executes_work() {
        assert!(transition_allowed(Accepted, InProgress, Actor::Provider));
        assert!(!transition_allowed(Accepted, InProgress, Actor::Admin));
        assert!(transition_allowed(InProgress, Completed, Actor::Provider));
        assert!(!transition_allowed(InProgress, Completed, Actor::Customer));
    }

    #[test]
    fn test_anyone_may_cancel_before_work_starts() {
        for actor in [Actor::Customer, Actor::Provider, Actor::Admin, Actor::Janitor] {
            assert!(transition_allowed(Pending, Cancelled, actor));
            assert!(transition_allowed(Accepted, Cancelled, actor));
        }
    }

    #[test]
    fn test_no_edges_out_of_terminal_states() {
        for from in [Rejected, Completed, Cancelled] {
            for to in [Pending, Accepted, Rejected, InProgress, Completed, Cancelled] {
                assert!(!transition_allowed(from, to, Actor::Admin));
            }
        }
    }

    #[test]
    fn test_pending_cannot_skip_to_completed() {
        let err = check_transition(Pending, Completed, Actor::Provider).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[test]
    fn test_missing_edge_beats_wrong_actor() {
        // In-progress work cannot be cancelled by anyone.
        let err = check_transition(InProgress, Cancelled, Actor::Admin).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
    }

    #[test]
    fn test_wrong_actor_on_existing_edge_is_forbidden() {
        let err = check_transition(Pending, Accepted, Actor::Customer).unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));
    }
}
