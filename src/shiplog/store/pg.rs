//! Postgres-backed store.

use super::{NewUpdate, ProductWithUpdates, Store, StoreError, UpdatePatch};
use crate::shiplog::models::{Product, Update, User};
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn map_insert_err(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(ref db) = err {
        // 23505: unique_violation
        if db.code().as_deref() == Some("23505") {
            return StoreError::Duplicate;
        }
    }

    StoreError::Backend(err)
}

#[async_trait]
impl Store for PgStore {
    async fn create_user(&self, username: &str, password_hash: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, password_hash)
            VALUES ($1, $2, $3)
            RETURNING id, username, password_hash, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_err)
    }

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, username, password_hash, created_at FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn products_for_user(&self, owner: Uuid) -> Result<Option<Vec<Product>>, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(owner)
            .fetch_one(&self.pool)
            .await?;

        if !exists {
            return Ok(None);
        }

        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, belongs_to_id, created_at
            FROM products
            WHERE belongs_to_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(products))
    }

    async fn product_by_id(&self, id: Uuid) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            "SELECT id, name, belongs_to_id, created_at FROM products WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn product_for_owner(
        &self,
        id: Uuid,
        owner: Uuid,
    ) -> Result<Option<Product>, StoreError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, belongs_to_id, created_at
            FROM products
            WHERE id = $1 AND belongs_to_id = $2
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    async fn create_product(&self, name: &str, owner: Uuid) -> Result<Product, StoreError> {
        sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (id, name, belongs_to_id)
            VALUES ($1, $2, $3)
            RETURNING id, name, belongs_to_id, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(owner)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_err)
    }

    async fn rename_product(
        &self,
        id: Uuid,
        owner: Uuid,
        name: &str,
    ) -> Result<Product, StoreError> {
        sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $3
            WHERE id = $1 AND belongs_to_id = $2
            RETURNING id, name, belongs_to_id, created_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .bind(name)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete_product(&self, id: Uuid, owner: Uuid) -> Result<Product, StoreError> {
        sqlx::query_as::<_, Product>(
            r#"
            DELETE FROM products
            WHERE id = $1 AND belongs_to_id = $2
            RETURNING id, name, belongs_to_id, created_at
            "#,
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn products_with_updates(
        &self,
        owner: Uuid,
    ) -> Result<Vec<ProductWithUpdates>, StoreError> {
        let products = self.products_for_user(owner).await?.unwrap_or_default();

        let product_ids: Vec<Uuid> = products.iter().map(|product| product.id).collect();

        let mut updates = sqlx::query_as::<_, Update>(
            r#"
            SELECT id, title, body, status, version, product_id, created_at, updated_at
            FROM updates
            WHERE product_id = ANY($1)
            ORDER BY created_at, id
            "#,
        )
        .bind(&product_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut grouped = Vec::with_capacity(products.len());
        for product in products {
            let (owned, rest): (Vec<Update>, Vec<Update>) = updates
                .into_iter()
                .partition(|update| update.product_id == product.id);
            updates = rest;

            grouped.push(ProductWithUpdates {
                product,
                updates: owned,
            });
        }

        Ok(grouped)
    }

    async fn update_by_id(&self, id: Uuid) -> Result<Option<Update>, StoreError> {
        let update = sqlx::query_as::<_, Update>(
            r#"
            SELECT id, title, body, status, version, product_id, created_at, updated_at
            FROM updates
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(update)
    }

    async fn create_update(&self, new: NewUpdate) -> Result<Update, StoreError> {
        sqlx::query_as::<_, Update>(
            r#"
            INSERT INTO updates (id, title, body, status, version, product_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, body, status, version, product_id, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&new.title)
        .bind(&new.body)
        .bind(new.status.unwrap_or_default())
        .bind(&new.version)
        .bind(new.product_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_err)
    }

    async fn edit_update(&self, id: Uuid, patch: UpdatePatch) -> Result<Update, StoreError> {
        sqlx::query_as::<_, Update>(
            r#"
            UPDATE updates
            SET title = COALESCE($2, title),
                body = COALESCE($3, body),
                status = COALESCE($4, status),
                version = COALESCE($5, version),
                updated_at = now()
            WHERE id = $1
            RETURNING id, title, body, status, version, product_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.body)
        .bind(patch.status)
        .bind(&patch.version)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }

    async fn delete_update(&self, id: Uuid) -> Result<Update, StoreError> {
        sqlx::query_as::<_, Update>(
            r#"
            DELETE FROM updates
            WHERE id = $1
            RETURNING id, title, body, status, version, product_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFound)
    }
}
