//! User accounts and provider profiles.

use chrono::{DateTime, Utc};
use common::UserId;
use serde::{Deserialize, Serialize};

use crate::access::Role;

/// A registered account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub id: UserId,
    pub name: String,
    pub email: String,
    /// bcrypt hash; never the plaintext password.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub role: Role,
    /// Disabled accounts cannot log in regardless of credentials.
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl UserAccount {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::new(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role,
            active: true,
            created_at,
        }
    }
}

/// Aggregated rating data for a provider, recomputed as reviews arrive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub provider_id: UserId,
    /// Mean of all review ratings, 0.0 when unreviewed.
    pub avg_rating: f64,
    pub review_count: u64,
}

impl ProviderProfile {
    /// An empty profile for a provider with no reviews yet.
    pub fn empty(provider_id: UserId) -> Self {
        Self {
            provider_id,
            avg_rating: 0.0,
            review_count: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_is_active() {
        let account = UserAccount::new(
            "Dana",
            "dana@example.com",
            "$2b$12$hash",
            Role::Provider,
            Utc::now(),
        );
        assert!(account.active);
        assert_eq!(account.role, Role::Provider);
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let account = UserAccount::new(
            "Dana",
            "dana@example.com",
            "$2b$12$hash",
            Role::Customer,
            Utc::now(),
        );
        let json = serde_json::to_string(&account).unwrap();
        assert!(!json.contains("password_hash"));
        assert!(!json.contains("$2b$12$hash"));
    }

    #[test]
    fn test_empty_profile() {
        let profile = ProviderProfile::empty(UserId::new());
        assert_eq!(profile.review_count, 0);
        assert_eq!(profile.avg_rating, 0.0);
    }
}
