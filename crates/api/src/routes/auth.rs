//! Registration, login, and admin account management.

use std::sync::Arc;

use access::RegisterRequest;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use common::UserId;
use domain::{Role, UserAccount};
use serde::{Deserialize, Serialize};
use store::Store;

use crate::error::ApiError;
use crate::routes::{AppState, bearer_token, origin};

#[derive(Deserialize)]
pub struct RegisterBody {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub verification_token: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginBody {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserAccount,
}

#[derive(Deserialize)]
pub struct ActiveBody {
    pub active: bool,
}

/// POST /auth/register — create a customer or provider account.
#[tracing::instrument(skip(state, body), fields(email = %body.email))]
pub async fn register<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(body): Json<RegisterBody>,
) -> Result<(StatusCode, Json<UserAccount>), ApiError> {
    let user = state
        .gate
        .register(RegisterRequest {
            name: body.name,
            email: body.email,
            password: body.password,
            role: body.role,
            verification_token: body.verification_token,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// POST /auth/login — exchange credentials for a bearer token.
#[tracing::instrument(skip(state, headers, body), fields(email = %body.email))]
pub async fn login<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    Json(body): Json<LoginBody>,
) -> Result<Json<LoginResponse>, ApiError> {
    let session = state
        .gate
        .login(&body.email, &body.password, origin(&headers))
        .await?;
    Ok(Json(LoginResponse {
        token: session.token,
        user: session.user,
    }))
}

/// PATCH /admin/users/:id — enable or disable an account (admin only).
#[tracing::instrument(skip(state, headers, body))]
pub async fn set_account_active<S: Store + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<UserId>,
    headers: HeaderMap,
    Json(body): Json<ActiveBody>,
) -> Result<Json<UserAccount>, ApiError> {
    let caller = state.gate.authenticate(bearer_token(&headers)?).await?;
    let user = state.gate.set_account_active(&caller, id, body.active).await?;
    Ok(Json(user))
}
