//! # Store Trait
//!
//! The document-store boundary. The core is written against this trait;
//! concrete backends live in `bistro-store`.
//!
//! Absent documents yield `None` or an empty vector, never an error. Store
//! failures surface as [`ApiError::Store`] and are never retried here.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ApiResult;
use crate::model::{
    CartEntry, DeleteOutcome, InsertOutcome, MenuItem, MenuItemPatch, PaymentRecord, UpdateOutcome,
    UserRecord,
};

/// Per-collection operations over the backing document store.
///
/// One shared handle is opened at process start and reused across all
/// requests; implementations must tolerate free interleaving of calls from
/// concurrent requests (no cross-request isolation is promised).
#[async_trait]
pub trait Store: Send + Sync {
    // --- menu collection ---

    async fn list_menu(&self) -> ApiResult<Vec<MenuItem>>;

    async fn find_menu_item(&self, id: &str) -> ApiResult<Option<MenuItem>>;

    async fn insert_menu_item(&self, item: &MenuItem) -> ApiResult<InsertOutcome>;

    async fn delete_menu_item(&self, id: &str) -> ApiResult<DeleteOutcome>;

    /// Upsert-update: apply the patch to an existing item, or create one
    /// under the given id when absent.
    async fn upsert_menu_item(&self, id: &str, patch: &MenuItemPatch) -> ApiResult<UpdateOutcome>;

    // --- cart collection ---

    async fn insert_cart_entry(&self, entry: &CartEntry) -> ApiResult<InsertOutcome>;

    async fn list_cart_entries(&self, email: &str) -> ApiResult<Vec<CartEntry>>;

    async fn delete_cart_entry(&self, id: &str) -> ApiResult<DeleteOutcome>;

    /// Bulk delete: remove every entry whose id is in the given set, in one
    /// store operation. Ids that match nothing contribute zero to the count.
    async fn delete_cart_entries(&self, ids: &[String]) -> ApiResult<DeleteOutcome>;

    // --- user collection ---

    async fn find_user_by_email(&self, email: &str) -> ApiResult<Option<UserRecord>>;

    async fn list_users(&self) -> ApiResult<Vec<UserRecord>>;

    async fn insert_user(&self, user: &UserRecord) -> ApiResult<InsertOutcome>;

    async fn delete_user(&self, id: &str) -> ApiResult<DeleteOutcome>;

    /// Grant the admin role to the user with the given id.
    async fn promote_user(&self, id: &str) -> ApiResult<UpdateOutcome>;

    // --- payment collection ---

    async fn insert_payment(&self, payment: &PaymentRecord) -> ApiResult<InsertOutcome>;

    async fn list_payments(&self, email: &str) -> ApiResult<Vec<PaymentRecord>>;
}

/// Type alias for a shared store handle (dynamic dispatch)
pub type BoxedStore = Arc<dyn Store>;
