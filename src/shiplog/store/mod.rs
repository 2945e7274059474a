//! Persistence collaborator behind a repository-style seam.
//!
//! Handlers and the ownership resolver only see the [`Store`] trait, so the
//! relational backend can be swapped (or faked in tests) without touching
//! caller contracts.

pub mod mem;
pub mod pg;

use crate::shiplog::models::{Product, Update, UpdateStatus, User};
use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint violation (duplicate username).
    #[error("duplicate record")]
    Duplicate,
    /// The targeted row does not exist (or is not visible to the caller).
    #[error("record not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] sqlx::Error),
}

/// A product with its child updates eagerly loaded, in creation order.
#[derive(Debug, Clone)]
pub struct ProductWithUpdates {
    pub product: Product,
    pub updates: Vec<Update>,
}

/// Fields for creating an update against an existing product.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUpdate {
    pub title: String,
    pub body: String,
    pub product_id: Uuid,
    #[serde(default)]
    pub status: Option<UpdateStatus>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Partial mutation of an update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub status: Option<UpdateStatus>,
    #[serde(default)]
    pub version: Option<String>,
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError>;

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Products owned by the user, `None` when the user row itself is gone.
    async fn products_for_user(&self, owner: Uuid) -> Result<Option<Vec<Product>>, StoreError>;

    async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError>;

    /// Product by id, scoped to its owner.
    async fn product_for_owner(&self, id: Uuid, owner: Uuid)
        -> Result<Option<Product>, StoreError>;

    async fn create_product(&self, name: &str, owner: Uuid) -> Result<Product, StoreError>;

    /// Rename a product, scoped to its owner. `NotFound` if no such row.
    async fn rename_product(
        &self,
        id: Uuid,
        owner: Uuid,
        name: &str,
    ) -> Result<Product, StoreError>;

    /// Delete a product, scoped to its owner. `NotFound` if no such row.
    async fn delete_product(&self, id: Uuid, owner: Uuid) -> Result<Product, StoreError>;

    /// All products of the owner with their updates eagerly loaded, products
    /// in creation order and updates in creation order within each product.
    async fn products_with_updates(
        &self,
        owner: Uuid,
    ) -> Result<Vec<ProductWithUpdates>, StoreError>;

    async fn update_by_id(&self, id: Uuid) -> Result<Option<Update>, StoreError>;

    async fn create_update(&self, new: NewUpdate) -> Result<Update, StoreError>;

    /// Apply a partial mutation. `NotFound` if the update is gone.
    async fn edit_update(&self, id: Uuid, patch: UpdatePatch) -> Result<Update, StoreError>;

    /// Delete an update. `NotFound` if the update is gone.
    async fn delete_update(&self, id: Uuid) -> Result<Update, StoreError>;
}
