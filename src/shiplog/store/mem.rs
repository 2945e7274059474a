//! In-memory store for tests and local development.
//!
//! Rows live in insertion-ordered vectors so the ordering contract of
//! [`Store::products_with_updates`] matches the relational backend.

use super::{NewUpdate, ProductWithUpdates, Store, StoreError, UpdatePatch};
use crate::shiplog::models::{Product, Update, User};
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    users: Vec<User>,
    products: Vec<Product>,
    updates: Vec<Update>,
}

#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        let mut inner = self.inner.lock().await;

        if inner.users.iter().any(|user| user.username == username) {
            return Err(StoreError::Duplicate);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        inner.users.push(user.clone());

        Ok(user)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.lock().await;

        Ok(inner
            .users
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn products_for_user(&self, owner: Uuid) -> Result<Option<Vec<Product>>, StoreError> {
        let inner = self.inner.lock().await;

        if !inner.users.iter().any(|user| user.id == owner) {
            return Ok(None);
        }

        Ok(Some(
            inner
                .products
                .iter()
                .filter(|product| product.belongs_to_id == owner)
                .cloned()
                .collect(),
        ))
    }

    async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let inner = self.inner.lock().await;

        Ok(inner
            .products
            .iter()
            .find(|product| product.id == id)
            .cloned())
    }

    async fn product_for_owner(
        &self,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Product>, StoreError> {
        let inner = self.inner.lock().await;

        Ok(inner
            .products
            .iter()
            .find(|product| product.id == id && product.belongs_to_id == owner)
            .cloned())
    }

    async fn create_product(&self, name: &str, owner: Uuid) -> Result<Product, StoreError> {
        let mut inner = self.inner.lock().await;

        let product = Product {
            id: Uuid::new_v4(),
            name: name.to_string(),
            belongs_to_id: owner,
            created_at: Utc::now(),
        };
        inner.products.push(product.clone());

        Ok(product)
    }

    async fn rename_product(
        &self,
        id: Uuid,
        owner: Uuid,
        name: &str,
    ) -> Result<Product, StoreError> {
        let mut inner = self.inner.lock().await;

        let product = inner
            .products
            .iter_mut()
            .find(|product| product.id == id && product.belongs_to_id == owner)
            .ok_or(StoreError::NotFound)?;

        product.name = name.to_string();

        Ok(product.clone())
    }

    async fn delete_product(&self, id: Uuid, owner: Uuid) -> Result<Product, StoreError> {
        let mut inner = self.inner.lock().await;

        let position = inner
            .products
            .iter()
            .position(|product| product.id == id && product.belongs_to_id == owner)
            .ok_or(StoreError::NotFound)?;

        let product = inner.products.remove(position);
        // mirror the relational ON DELETE CASCADE
        inner.updates.retain(|update| update.product_id != product.id);

        Ok(product)
    }

    async fn products_with_updates(
        &self,
        owner: Uuid,
    ) -> Result<Vec<ProductWithUpdates>, StoreError> {
        let inner = self.inner.lock().await;

        Ok(inner
            .products
            .iter()
            .filter(|product| product.belongs_to_id == owner)
            .map(|product| ProductWithUpdates {
                product: product.clone(),
                updates: inner
                    .updates
                    .iter()
                    .filter(|update| update.product_id == product.id)
                    .cloned()
                    .collect(),
            })
            .collect())
    }

    async fn update_by_id(&self, id: Uuid) -> Result<Option<Update>, StoreError> {
        let inner = self.inner.lock().await;

        Ok(inner.updates.iter().find(|update| update.id == id).cloned())
    }

    async fn create_update(&self, new: NewUpdate) -> Result<Update, StoreError> {
        let mut inner = self.inner.lock().await;

        let now = Utc::now();
        let update = Update {
            id: Uuid::new_v4(),
            title: new.title,
            body: new.body,
            status: new.status.unwrap_or_default(),
            version: new.version,
            product_id: new.product_id,
            created_at: now,
            updated_at: now,
        };
        inner.updates.push(update.clone());

        Ok(update)
    }

    async fn edit_update(&self, id: Uuid, patch: UpdatePatch) -> Result<Update, StoreError> {
        let mut inner = self.inner.lock().await;

        let update = inner
            .updates
            .iter_mut()
            .find(|update| update.id == id)
            .ok_or(StoreError::NotFound)?;

        if let Some(title) = patch.title {
            update.title = title;
        }
        if let Some(body) = patch.body {
            update.body = body;
        }
        if let Some(status) = patch.status {
            update.status = status;
        }
        if let Some(version) = patch.version {
            update.version = Some(version);
        }
        update.updated_at = Utc::now();

        Ok(update.clone())
    }

    async fn delete_update(&self, id: Uuid) -> Result<Update, StoreError> {
        let mut inner = self.inner.lock().await;

        let position = inner
            .updates
            .iter()
            .position(|update| update.id == id)
            .ok_or(StoreError::NotFound)?;

        Ok(inner.updates.remove(position))
    }
}
