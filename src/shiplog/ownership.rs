//! Ownership-chain authorization for updates.
//!
//! An update is mutable by exactly the users owning an ancestor product.
//! The chain (user → products → updates) is re-derived from current data on
//! every call; nothing is cached between requests, so the check always
//! reflects what the store holds right now. The full rescan trades
//! efficiency for an auditable invariant; an indexed lookup could replace it
//! behind this same interface.

use crate::shiplog::{
    models::Update,
    store::{Store, StoreError},
};
use uuid::Uuid;

pub struct OwnershipResolver<'a> {
    store: &'a dyn Store,
}

impl<'a> OwnershipResolver<'a> {
    #[must_use]
    pub fn new(store: &'a dyn Store) -> Self {
        Self { store }
    }

    /// Every update reachable through the user's products, flattened in
    /// product-then-update order.
    ///
    /// # Errors
    /// Propagates store failures unmodified.
    pub async fn updates_for_user(&self, user_id: Uuid) -> Result<Vec<Update>, StoreError> {
        let products = self.store.products_with_updates(user_id).await?;

        Ok(products
            .into_iter()
            .flat_map(|product| product.updates)
            .collect())
    }

    /// Exact-match lookup of `update_id` within the user's ownership set.
    ///
    /// Returns `None` when the id belongs to another user's product, even if
    /// the update exists globally.
    ///
    /// # Errors
    /// Propagates store failures unmodified.
    pub async fn find_owned_update(
        &self,
        user_id: Uuid,
        update_id: Uuid,
    ) -> Result<Option<Update>, StoreError> {
        let updates = self.updates_for_user(user_id).await?;

        Ok(updates.into_iter().find(|update| update.id == update_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shiplog::store::{mem::MemStore, NewUpdate};

    async fn seed_user(store: &MemStore, name: &str) -> Uuid {
        store.create_user(name, "digest").await.unwrap().id
    }

    async fn seed_update(store: &MemStore, product_id: Uuid, title: &str) -> Uuid {
        store
            .create_update(NewUpdate {
                title: title.to_string(),
                body: "body".to_string(),
                product_id,
                status: None,
                version: None,
            })
            .await
            .unwrap()
            .id
    }

    #[tokio::test]
    async fn test_flatten_preserves_product_then_update_order() {
        let store = MemStore::new();
        let ada = seed_user(&store, "ada").await;

        let first = store.create_product("one", ada).await.unwrap().id;
        let second = store.create_product("two", ada).await.unwrap().id;

        // interleaved creation across products
        let u1 = seed_update(&store, first, "u1").await;
        let u2 = seed_update(&store, second, "u2").await;
        let u3 = seed_update(&store, first, "u3").await;

        let resolver = OwnershipResolver::new(&store);
        let ids: Vec<Uuid> = resolver
            .updates_for_user(ada)
            .await
            .unwrap()
            .into_iter()
            .map(|update| update.id)
            .collect();

        assert_eq!(ids, vec![u1, u3, u2]);
    }

    #[tokio::test]
    async fn test_foreign_update_is_not_owned() {
        let store = MemStore::new();
        let ada = seed_user(&store, "ada").await;
        let bob = seed_user(&store, "bob").await;

        let product = store.create_product("one", ada).await.unwrap().id;
        let update = seed_update(&store, product, "u1").await;

        let resolver = OwnershipResolver::new(&store);

        // exists globally
        assert!(store.update_by_id(update).await.unwrap().is_some());

        // but only the product owner resolves it
        assert!(resolver
            .find_owned_update(ada, update)
            .await
            .unwrap()
            .is_some());
        assert!(resolver
            .find_owned_update(bob, update)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_ownership_derived_fresh_per_call() {
        let store = MemStore::new();
        let ada = seed_user(&store, "ada").await;

        let product = store.create_product("one", ada).await.unwrap().id;
        let update = seed_update(&store, product, "u1").await;

        let resolver = OwnershipResolver::new(&store);
        assert!(resolver
            .find_owned_update(ada, update)
            .await
            .unwrap()
            .is_some());

        // deleting the product severs the chain on the very next call
        store.delete_product(product, ada).await.unwrap();
        assert!(resolver
            .find_owned_update(ada, update)
            .await
            .unwrap()
            .is_none());
    }
}
