//! Closed error taxonomy for the API, dispatched into responses in one place.
//!
//! The ownership miss is deliberately a `200 {"message":"nope"}` rather than
//! a 403/404. Handlers never learn which check failed beyond the message.

use crate::shiplog::store::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Validation failure or duplicate record, surfaced as 400.
    #[error("invalid input")]
    Input,
    /// Missing or invalid credentials, surfaced as 401 with a fixed message.
    #[error("{0}")]
    Auth(&'static str),
    /// Target record absent, surfaced as 404.
    #[error("nope")]
    NotFound,
    /// Target record exists but is outside the caller's ownership set.
    #[error("nope")]
    Ownership,
    /// Anything the client cannot act on.
    #[error("something went wrong")]
    Internal,
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Input => (StatusCode::BAD_REQUEST, "invalid input"),
            Self::Auth(message) => (StatusCode::UNAUTHORIZED, message),
            Self::NotFound => (StatusCode::NOT_FOUND, "nope"),
            // Rejected mutations keep the 200 status of the original contract.
            Self::Ownership => (StatusCode::OK, "nope"),
            Self::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "something went wrong"),
            Self::Store(StoreError::Duplicate) => (StatusCode::BAD_REQUEST, "invalid input"),
            Self::Store(StoreError::NotFound) => (StatusCode::NOT_FOUND, "nope"),
            Self::Store(err) => {
                error!("store error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "something went wrong")
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::Input.into_response().status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Auth("not authorized").into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            ApiError::NotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(ApiError::Ownership.into_response().status(), StatusCode::OK);
        assert_eq!(
            ApiError::Store(StoreError::Duplicate)
                .into_response()
                .status(),
            StatusCode::BAD_REQUEST
        );
    }
}
