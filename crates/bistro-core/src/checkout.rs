//! # Checkout Orchestrator
//!
//! The one multi-step, partial-failure-sensitive operation in the system:
//! record a payment, then remove the cart entries it paid for.

use serde::Serialize;
use tracing::info;

use crate::error::ApiResult;
use crate::model::{DeleteOutcome, InsertOutcome, PaymentRecord};
use crate::store::Store;

/// Both outcomes of a checkout, returned to the caller verbatim.
///
/// A deletion count lower than the number of requested ids is surfaced
/// as-is, not treated as an error.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutOutcome {
    pub payment_result: InsertOutcome,
    pub delete_result: DeleteOutcome,
}

/// Record a payment and bulk-delete the cart entries it references.
///
/// The payment insert is awaited to completion strictly before the delete
/// is issued. Once the insert returns, the payment is committed: a failure
/// in the delete propagates as-is and leaves the committed payment with
/// stale cart entries behind — there is no retry, no compensation, and no
/// rollback path. If the insert itself fails, no delete is attempted.
///
/// `payment.cart_ids` is taken on trust: neither ownership by
/// `payment.email` nor existence of the referenced entries is checked.
pub async fn process_checkout(
    store: &dyn Store,
    payment: &PaymentRecord,
) -> ApiResult<CheckoutOutcome> {
    // Durability point: nothing below runs unless this write is committed.
    let payment_result = store.insert_payment(payment).await?;

    let delete_result = store.delete_cart_entries(&payment.cart_ids).await?;

    info!(
        payment_id = %payment.id,
        requested = payment.cart_ids.len(),
        deleted = delete_result.deleted_count,
        "checkout recorded"
    );

    Ok(CheckoutOutcome {
        payment_result,
        delete_result,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ApiError;
    use crate::model::{
        CartEntry, MenuItem, MenuItemPatch, UpdateOutcome, UserRecord,
    };
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Minimal store fake: only the two operations checkout touches are
    /// meaningful; everything else is unreachable from these tests.
    #[derive(Default)]
    struct FakeStore {
        fail_insert: bool,
        fail_delete: bool,
        payments: Mutex<Vec<PaymentRecord>>,
        carts: Mutex<Vec<String>>,
        delete_attempted: Mutex<bool>,
    }

    impl FakeStore {
        fn with_carts(ids: &[&str]) -> Self {
            Self {
                carts: Mutex::new(ids.iter().map(|s| s.to_string()).collect()),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl Store for FakeStore {
        async fn list_menu(&self) -> ApiResult<Vec<MenuItem>> {
            unreachable!()
        }
        async fn find_menu_item(&self, _id: &str) -> ApiResult<Option<MenuItem>> {
            unreachable!()
        }
        async fn insert_menu_item(&self, _item: &MenuItem) -> ApiResult<InsertOutcome> {
            unreachable!()
        }
        async fn delete_menu_item(&self, _id: &str) -> ApiResult<DeleteOutcome> {
            unreachable!()
        }
        async fn upsert_menu_item(
            &self,
            _id: &str,
            _patch: &MenuItemPatch,
        ) -> ApiResult<UpdateOutcome> {
            unreachable!()
        }
        async fn insert_cart_entry(&self, _entry: &CartEntry) -> ApiResult<InsertOutcome> {
            unreachable!()
        }
        async fn list_cart_entries(&self, _email: &str) -> ApiResult<Vec<CartEntry>> {
            unreachable!()
        }
        async fn delete_cart_entry(&self, _id: &str) -> ApiResult<DeleteOutcome> {
            unreachable!()
        }
        async fn delete_cart_entries(&self, ids: &[String]) -> ApiResult<DeleteOutcome> {
            *self.delete_attempted.lock().unwrap() = true;
            if self.fail_delete {
                return Err(ApiError::Store("store unreachable".into()));
            }
            let mut carts = self.carts.lock().unwrap();
            let before = carts.len();
            carts.retain(|id| !ids.contains(id));
            Ok(DeleteOutcome::deleted((before - carts.len()) as u64))
        }
        async fn find_user_by_email(&self, _email: &str) -> ApiResult<Option<UserRecord>> {
            unreachable!()
        }
        async fn list_users(&self) -> ApiResult<Vec<UserRecord>> {
            unreachable!()
        }
        async fn insert_user(&self, _user: &UserRecord) -> ApiResult<InsertOutcome> {
            unreachable!()
        }
        async fn delete_user(&self, _id: &str) -> ApiResult<DeleteOutcome> {
            unreachable!()
        }
        async fn promote_user(&self, _id: &str) -> ApiResult<UpdateOutcome> {
            unreachable!()
        }
        async fn insert_payment(&self, payment: &PaymentRecord) -> ApiResult<InsertOutcome> {
            if self.fail_insert {
                return Err(ApiError::Store("write rejected".into()));
            }
            self.payments.lock().unwrap().push(payment.clone());
            Ok(InsertOutcome::inserted(payment.id.clone()))
        }
        async fn list_payments(&self, _email: &str) -> ApiResult<Vec<PaymentRecord>> {
            unreachable!()
        }
    }

    #[tokio::test]
    async fn test_checkout_records_payment_and_clears_carts() {
        let store = FakeStore::with_carts(&["c1", "c2"]);
        let payment = PaymentRecord::new("a@x.com", 42.0, vec!["c1".into(), "c2".into()]);

        let outcome = process_checkout(&store, &payment).await.unwrap();

        assert_eq!(outcome.payment_result.inserted_id.as_deref(), Some(payment.id.as_str()));
        assert_eq!(outcome.delete_result.deleted_count, 2);
        assert!(store.carts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_match_is_surfaced_not_errored() {
        let store = FakeStore::with_carts(&["c1"]);
        let payment = PaymentRecord::new("a@x.com", 42.0, vec!["c1".into(), "c2".into()]);

        let outcome = process_checkout(&store, &payment).await.unwrap();

        assert_eq!(outcome.delete_result.deleted_count, 1);
    }

    #[tokio::test]
    async fn test_already_deleted_ids_yield_zero_count() {
        let store = FakeStore::with_carts(&[]);
        let payment = PaymentRecord::new("a@x.com", 42.0, vec!["gone1".into(), "gone2".into()]);

        let outcome = process_checkout(&store, &payment).await.unwrap();

        // Payment still commits; the delete just matches nothing.
        assert_eq!(store.payments.lock().unwrap().len(), 1);
        assert_eq!(outcome.delete_result.deleted_count, 0);
    }

    #[tokio::test]
    async fn test_failed_insert_aborts_before_delete() {
        let store = FakeStore {
            fail_insert: true,
            ..FakeStore::with_carts(&["c1"])
        };
        let payment = PaymentRecord::new("a@x.com", 42.0, vec!["c1".into()]);

        let err = process_checkout(&store, &payment).await.unwrap_err();

        assert!(matches!(err, ApiError::Store(_)));
        assert!(!*store.delete_attempted.lock().unwrap());
        assert_eq!(store.carts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_delete_leaves_payment_committed() {
        let store = FakeStore {
            fail_delete: true,
            ..FakeStore::with_carts(&["c1"])
        };
        let payment = PaymentRecord::new("a@x.com", 42.0, vec!["c1".into()]);

        let err = process_checkout(&store, &payment).await.unwrap_err();

        // Committed payment, stale carts: the documented partial outcome.
        assert!(matches!(err, ApiError::Store(_)));
        assert_eq!(store.payments.lock().unwrap().len(), 1);
        assert_eq!(store.carts.lock().unwrap().len(), 1);
    }
}
