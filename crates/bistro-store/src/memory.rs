//! # In-Memory Store
//!
//! A `Store` backend held entirely in process memory. Used by the API
//! integration tests and for running the server locally without Postgres.

use async_trait::async_trait;
use std::sync::RwLock;

use bistro_core::{
    ApiResult, CartEntry, DeleteOutcome, InsertOutcome, MenuItem, MenuItemPatch, PaymentRecord,
    Store, UpdateOutcome, UserRecord, UserRole,
};

/// In-process store; collections are plain vectors behind locks.
#[derive(Default)]
pub struct MemoryStore {
    menu: RwLock<Vec<MenuItem>>,
    carts: RwLock<Vec<CartEntry>>,
    users: RwLock<Vec<UserRecord>>,
    payments: RwLock<Vec<PaymentRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Recover the guard from a poisoned lock instead of panicking; collection
/// contents stay usable either way.
fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|e| e.into_inner())
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|e| e.into_inner())
}

#[async_trait]
impl Store for MemoryStore {
    async fn list_menu(&self) -> ApiResult<Vec<MenuItem>> {
        Ok(read(&self.menu).clone())
    }

    async fn find_menu_item(&self, id: &str) -> ApiResult<Option<MenuItem>> {
        Ok(read(&self.menu).iter().find(|m| m.id == id).cloned())
    }

    async fn insert_menu_item(&self, item: &MenuItem) -> ApiResult<InsertOutcome> {
        write(&self.menu).push(item.clone());
        Ok(InsertOutcome::inserted(item.id.clone()))
    }

    async fn delete_menu_item(&self, id: &str) -> ApiResult<DeleteOutcome> {
        let mut menu = write(&self.menu);
        let before = menu.len();
        menu.retain(|m| m.id != id);
        Ok(DeleteOutcome::deleted((before - menu.len()) as u64))
    }

    async fn upsert_menu_item(&self, id: &str, patch: &MenuItemPatch) -> ApiResult<UpdateOutcome> {
        let mut menu = write(&self.menu);
        if let Some(item) = menu.iter_mut().find(|m| m.id == id) {
            if let Some(name) = &patch.name {
                item.name = name.clone();
            }
            if let Some(category) = &patch.category {
                item.category = category.clone();
            }
            if let Some(price) = patch.price {
                item.price = price;
            }
            if let Some(recipe) = &patch.recipe {
                item.recipe = Some(recipe.clone());
            }
        } else {
            menu.push(MenuItem {
                id: id.to_string(),
                name: patch.name.clone().unwrap_or_default(),
                category: patch.category.clone().unwrap_or_default(),
                price: patch.price.unwrap_or(0.0),
                recipe: patch.recipe.clone(),
                image: None,
            });
        }
        Ok(UpdateOutcome::modified(1))
    }

    async fn insert_cart_entry(&self, entry: &CartEntry) -> ApiResult<InsertOutcome> {
        write(&self.carts).push(entry.clone());
        Ok(InsertOutcome::inserted(entry.id.clone()))
    }

    async fn list_cart_entries(&self, email: &str) -> ApiResult<Vec<CartEntry>> {
        Ok(read(&self.carts)
            .iter()
            .filter(|c| c.email == email)
            .cloned()
            .collect())
    }

    async fn delete_cart_entry(&self, id: &str) -> ApiResult<DeleteOutcome> {
        let mut carts = write(&self.carts);
        let before = carts.len();
        carts.retain(|c| c.id != id);
        Ok(DeleteOutcome::deleted((before - carts.len()) as u64))
    }

    async fn delete_cart_entries(&self, ids: &[String]) -> ApiResult<DeleteOutcome> {
        let mut carts = write(&self.carts);
        let before = carts.len();
        carts.retain(|c| !ids.contains(&c.id));
        Ok(DeleteOutcome::deleted((before - carts.len()) as u64))
    }

    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<UserRecord>> {
        Ok(read(&self.users).iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> ApiResult<Vec<UserRecord>> {
        Ok(read(&self.users).clone())
    }

    async fn insert_user(&self, user: &UserRecord) -> ApiResult<InsertOutcome> {
        write(&self.users).push(user.clone());
        Ok(InsertOutcome::inserted(user.id.clone()))
    }

    async fn delete_user(&self, id: &str) -> ApiResult<DeleteOutcome> {
        let mut users = write(&self.users);
        let before = users.len();
        users.retain(|u| u.id != id);
        Ok(DeleteOutcome::deleted((before - users.len()) as u64))
    }

    async fn promote_user(&self, id: &str) -> ApiResult<UpdateOutcome> {
        let mut users = write(&self.users);
        match users.iter_mut().find(|u| u.id == id) {
            Some(user) => {
                user.role = Some(UserRole::Admin);
                Ok(UpdateOutcome::modified(1))
            }
            None => Ok(UpdateOutcome::modified(0)),
        }
    }

    async fn insert_payment(&self, payment: &PaymentRecord) -> ApiResult<InsertOutcome> {
        write(&self.payments).push(payment.clone());
        Ok(InsertOutcome::inserted(payment.id.clone()))
    }

    async fn list_payments(&self, email: &str) -> ApiResult<Vec<PaymentRecord>> {
        Ok(read(&self.payments)
            .iter()
            .filter(|p| p.email == email)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bulk_delete_counts_only_matches() {
        let store = MemoryStore::new();
        let a = CartEntry::new("a@x.com", "m1", "Soup", 4.5);
        let b = CartEntry::new("a@x.com", "m2", "Salad", 6.0);
        store.insert_cart_entry(&a).await.unwrap();
        store.insert_cart_entry(&b).await.unwrap();

        let ids = vec![a.id.clone(), "missing".to_string()];
        let outcome = store.delete_cart_entries(&ids).await.unwrap();

        assert_eq!(outcome.deleted_count, 1);
        assert_eq!(store.list_cart_entries("a@x.com").await.unwrap().len(), 1);

        // Re-issuing the same delete matches nothing
        let outcome = store.delete_cart_entries(&ids).await.unwrap();
        assert_eq!(outcome.deleted_count, 0);
    }

    #[tokio::test]
    async fn test_promote_user() {
        let store = MemoryStore::new();
        let user = UserRecord::new("a@x.com", None);
        store.insert_user(&user).await.unwrap();

        let outcome = store.promote_user(&user.id).await.unwrap();
        assert_eq!(outcome.modified_count, 1);
        assert!(store
            .find_user_by_email("a@x.com")
            .await
            .unwrap()
            .unwrap()
            .is_admin());

        let outcome = store.promote_user("missing").await.unwrap();
        assert_eq!(outcome.modified_count, 0);
    }

    #[tokio::test]
    async fn test_upsert_patches_existing_and_creates_missing() {
        let store = MemoryStore::new();
        let item = MenuItem::new("Soup", "starter", 4.5);
        store.insert_menu_item(&item).await.unwrap();

        let patch = MenuItemPatch {
            price: Some(5.0),
            ..MenuItemPatch::default()
        };
        store.upsert_menu_item(&item.id, &patch).await.unwrap();

        let updated = store.find_menu_item(&item.id).await.unwrap().unwrap();
        assert_eq!(updated.price, 5.0);
        assert_eq!(updated.name, "Soup");

        // Unknown id creates the item
        store.upsert_menu_item("new-id", &patch).await.unwrap();
        assert!(store.find_menu_item("new-id").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_find_user_absent_is_none() {
        let store = MemoryStore::new();
        assert!(store.find_user_by_email("a@x.com").await.unwrap().is_none());
    }
}
