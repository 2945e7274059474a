//! Request-level auth gate for protected routes.
//!
//! Every route nested under `/api` passes through [`require_auth`]; no
//! handler behind it ever runs without a verified [`Identity`] attached to
//! the request extensions.

use crate::shiplog::{error::ApiError, AppState};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

/// Verify the bearer token and attach the caller's identity.
///
/// Missing header and missing/invalid token are distinguished only by the
/// fixed messages "not authorized" and "not valid token".
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(bearer) = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
    else {
        return ApiError::Auth("not authorized").into_response();
    };

    // "Bearer <token>": everything after the first space is the token
    let token = bearer.split_once(' ').map_or("", |(_, token)| token);

    if token.is_empty() {
        return ApiError::Auth("not valid token").into_response();
    }

    match state.tokens.verify(token) {
        Ok(identity) => {
            request.extensions_mut().insert(identity);
            next.run(request).await
        }
        Err(err) => {
            debug!("token rejected: {err}");
            ApiError::Auth("not valid token").into_response()
        }
    }
}
