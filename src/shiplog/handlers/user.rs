//! Signup and signin. Both bypass the auth gate and issue a fresh token.

use crate::shiplog::{auth, error::ApiError, models::Identity, AppState};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, instrument};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/signup",
    request_body = Credentials,
    responses(
        (status = 200, description = "User created, session token returned", body = TokenResponse),
        (status = 400, description = "Username already taken or empty credentials"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    if credentials.username.is_empty() || credentials.password.is_empty() {
        return Err(ApiError::Input);
    }

    let digest = auth::hash_password(&credentials.password).map_err(|err| {
        error!("password hashing failed: {err}");
        ApiError::Internal
    })?;

    // a duplicate username surfaces as StoreError::Duplicate -> 400
    let user = state
        .store
        .create_user(&credentials.username, &digest)
        .await?;

    let identity = Identity {
        id: user.id,
        username: user.username,
    };

    let token = state.tokens.issue(&identity).map_err(|err| {
        error!("token signing failed: {err}");
        ApiError::Internal
    })?;

    Ok(Json(TokenResponse { token }))
}

#[utoipa::path(
    post,
    path = "/signin",
    request_body = Credentials,
    responses(
        (status = 200, description = "Session token returned", body = TokenResponse),
        (status = 401, description = "Unknown username or wrong password"),
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn signin(
    State(state): State<AppState>,
    Json(credentials): Json<Credentials>,
) -> Result<Json<TokenResponse>, ApiError> {
    // the same message for both failure modes, nothing to enumerate
    let Some(user) = state.store.user_by_username(&credentials.username).await? else {
        return Err(ApiError::Auth("nope"));
    };

    if !auth::verify_password(&credentials.password, &user.password_hash) {
        return Err(ApiError::Auth("nope"));
    }

    let identity = Identity {
        id: user.id,
        username: user.username,
    };

    let token = state.tokens.issue(&identity).map_err(|err| {
        error!("token signing failed: {err}");
        ApiError::Internal
    })?;

    Ok(Json(TokenResponse { token }))
}
