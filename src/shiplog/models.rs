//! Persisted rows and the derived session identity.
//!
//! JSON field names follow the public API (camelCase); column names stay
//! snake_case for the relational store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub belongs_to_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Update {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    pub status: UpdateStatus,
    pub version: Option<String>,
    pub product_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[sqlx(type_name = "update_status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateStatus {
    #[default]
    InProgress,
    Shipped,
    Deprecated,
}

/// Session identity carried inside a signed token. Derived, never persisted,
/// valid only for the token's signed lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: Uuid,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&UpdateStatus::InProgress).unwrap(),
            "\"IN_PROGRESS\""
        );
        assert_eq!(
            serde_json::to_string(&UpdateStatus::Shipped).unwrap(),
            "\"SHIPPED\""
        );
        assert_eq!(
            serde_json::to_string(&UpdateStatus::Deprecated).unwrap(),
            "\"DEPRECATED\""
        );
    }

    #[test]
    fn test_password_hash_not_serialized() {
        let user = User {
            id: Uuid::new_v4(),
            username: "ada".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"username\":\"ada\""));
    }
}
