//! Authentication, registration, and capability enforcement.

use std::collections::HashMap;
use std::sync::Arc;

use common::{Clock, UserId};
use domain::{Action, DomainError, Role, UserAccount, access};
use store::{Store, StoreError};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::rate_limit::{AttemptCounter, RateLimitPolicy};

/// A registration submission.
#[derive(Debug, Clone)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    /// Bot-verification token; registration fails without one.
    pub verification_token: Option<String>,
}

/// A logged-in session: the opaque bearer token and the account it maps to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: UserAccount,
}

/// The access gate in front of the booking core.
///
/// Resolves caller identity from bearer tokens, enforces the capability
/// table, and protects the auth endpoints with a per-`(identity, origin)`
/// sliding-window rate limit.
pub struct AccessGate<S> {
    store: S,
    sessions: RwLock<HashMap<String, UserId>>,
    limiter: Arc<dyn AttemptCounter>,
    policy: RateLimitPolicy,
    clock: Arc<dyn Clock>,
}

impl<S: Store> AccessGate<S> {
    pub fn new(
        store: S,
        limiter: Arc<dyn AttemptCounter>,
        policy: RateLimitPolicy,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            sessions: RwLock::new(HashMap::new()),
            limiter,
            policy,
            clock,
        }
    }

    /// Registers a new customer or provider account.
    ///
    /// Requires a bot-verification token; admin accounts are seeded out of
    /// band and cannot self-register.
    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn register(&self, req: RegisterRequest) -> Result<UserAccount, DomainError> {
        match req.verification_token.as_deref() {
            Some(token) if !token.is_empty() => {}
            _ => {
                return Err(DomainError::InvalidRequest(
                    "missing verification token".to_string(),
                ));
            }
        }
        if req.role == Role::Admin {
            return Err(DomainError::InvalidRequest(
                "cannot self-register as admin".to_string(),
            ));
        }
        if req.email.is_empty() || req.password.is_empty() {
            return Err(DomainError::InvalidRequest(
                "email and password are required".to_string(),
            ));
        }

        let hash = bcrypt::hash(&req.password, bcrypt::DEFAULT_COST)
            .map_err(|e| DomainError::Internal(format!("password hashing failed: {e}")))?;
        let user = UserAccount::new(req.name, req.email, hash, req.role, self.clock.now());

        match self.store.insert_user(user.clone()).await {
            Ok(()) => {
                tracing::info!(user_id = %user.id, role = %user.role, "account registered");
                Ok(user)
            }
            Err(StoreError::Duplicate { .. }) => Err(DomainError::InvalidRequest(
                "email is already registered".to_string(),
            )),
            Err(e) => Err(internal(e)),
        }
    }

    /// Logs a user in and mints a session token.
    ///
    /// Attempts are counted per `(email, origin)` before credential storage
    /// is touched: once over the limit, the call fails with `RateLimited`
    /// without reading the account.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &str,
        origin: &str,
    ) -> Result<Session, DomainError> {
        let key = format!("{email}@{origin}");
        let attempts = self
            .limiter
            .record(&key, self.clock.now(), self.policy.window);
        if attempts > self.policy.max_attempts {
            tracing::warn!(%key, attempts, "login rate limit exceeded");
            return Err(DomainError::RateLimited);
        }

        let user = self
            .store
            .user_by_email(email)
            .await
            .map_err(internal)?
            .ok_or(DomainError::Unauthenticated)?;

        // Disabled accounts fail the same way regardless of the password.
        if !user.active {
            return Err(DomainError::forbidden("account is disabled"));
        }

        let ok = bcrypt::verify(password, &user.password_hash)
            .map_err(|e| DomainError::Internal(format!("password verification failed: {e}")))?;
        if !ok {
            return Err(DomainError::Unauthenticated);
        }

        let token = Uuid::new_v4().to_string();
        self.sessions.write().await.insert(token.clone(), user.id);
        tracing::info!(user_id = %user.id, "login succeeded");

        Ok(Session { token, user })
    }

    /// Resolves a bearer token to the account behind it.
    pub async fn authenticate(&self, token: &str) -> Result<UserAccount, DomainError> {
        let user_id = self
            .sessions
            .read()
            .await
            .get(token)
            .copied()
            .ok_or(DomainError::Unauthenticated)?;

        let user = self
            .store
            .user(user_id)
            .await
            .map_err(internal)?
            .ok_or(DomainError::Unauthenticated)?;

        if !user.active {
            return Err(DomainError::forbidden("account is disabled"));
        }
        Ok(user)
    }

    /// Checks the capability table for this account and action.
    pub fn authorize(&self, user: &UserAccount, action: Action) -> Result<(), DomainError> {
        if access::allows(user.role, action) {
            Ok(())
        } else {
            Err(DomainError::forbidden(format!(
                "role {} may not perform {action:?}",
                user.role
            )))
        }
    }

    /// Authenticates a token and checks one capability in a single call.
    pub async fn require(&self, token: &str, action: Action) -> Result<UserAccount, DomainError> {
        let user = self.authenticate(token).await?;
        self.authorize(&user, action)?;
        Ok(user)
    }

    /// Enables or disables an account (admin only).
    ///
    /// Takes effect on the target's next authenticated call; their live
    /// sessions are not revoked here but fail the active check on use.
    pub async fn set_account_active(
        &self,
        caller: &UserAccount,
        target: UserId,
        active: bool,
    ) -> Result<UserAccount, DomainError> {
        self.authorize(caller, Action::ToggleAccountActive)?;
        match self.store.set_user_active(target, active).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, active, "account toggled");
                Ok(user)
            }
            Err(StoreError::NotFound { .. }) => Err(DomainError::not_found("user", target)),
            Err(e) => Err(internal(e)),
        }
    }
}

fn internal(err: StoreError) -> DomainError {
    DomainError::Internal(err.to_string())
}
