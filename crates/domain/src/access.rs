//! Roles and the static capability table.
//!
//! Role checks happen once at the access boundary; the table below is the
//! single source of truth for which role may request which action.

use serde::{Deserialize, Serialize};

/// A user's role on the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Customer,
    Provider,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "CUSTOMER",
            Role::Provider => "PROVIDER",
            Role::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Actions a caller can request through the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    CreateBooking,
    TransitionBooking,
    ListOwnBookings,
    CreateServiceListing,
    CreateReview,
    ProcessPayment,
    ReadOwnNotifications,
    ForceCancelBooking,
    ToggleAccountActive,
    ToggleServiceActive,
    ListAllBookings,
}

/// Returns true if `role` may request `action`.
///
/// Ownership checks (this customer on this booking, etc.) are enforced by
/// the services; this table only answers the role question.
pub fn allows(role: Role, action: Action) -> bool {
    use Action::*;

    match action {
        CreateBooking | CreateReview | ProcessPayment => matches!(role, Role::Customer),
        CreateServiceListing => matches!(role, Role::Provider),
        TransitionBooking => true,
        ListOwnBookings | ReadOwnNotifications => true,
        ForceCancelBooking | ToggleAccountActive | ToggleServiceActive | ListAllBookings => {
            matches!(role, Role::Admin)
        }
    }
}
