//! # Domain Documents
//!
//! Document types for the bistro-boss collections, plus the store outcome
//! types returned to callers after writes.
//!
//! All wire JSON is camelCase. Document ids are opaque strings (uuid-v4 on
//! creation); an unknown or malformed id simply matches nothing in the
//! store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Role carried on a user record.
///
/// `admin` is the only defined role; every other user record carries no
/// role at all. Roles live exclusively in the store — never inside tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
}

/// A user record, unique by email
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Document id
    pub id: String,

    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Unique email — the sole subject identifier across the system
    pub email: String,

    /// Role, absent for regular users
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

impl UserRecord {
    /// Create a new role-less user record with a generated id
    pub fn new(email: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name,
            email: email.into(),
            role: None,
        }
    }

    /// Whether this record holds the admin role
    pub fn is_admin(&self) -> bool {
        matches!(self.role, Some(UserRole::Admin))
    }
}

/// A menu item
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recipe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl MenuItem {
    /// Create a menu item with a generated id
    pub fn new(name: impl Into<String>, category: impl Into<String>, price: f64) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            category: category.into(),
            price,
            recipe: None,
            image: None,
        }
    }
}

/// Partial update for a menu item's editable fields.
///
/// Absent fields leave the stored value untouched; on upsert-insert they
/// fall back to empty defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub recipe: Option<String>,
}

/// A cart entry; many entries reference one user by email
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntry {
    pub id: String,

    /// Owning user's email
    pub email: String,

    /// Referenced menu item
    pub menu_item_id: String,

    /// Denormalized item name for display
    pub name: String,

    /// Denormalized unit price
    pub price: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CartEntry {
    /// Create a cart entry with a generated id
    pub fn new(
        email: impl Into<String>,
        menu_item_id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            menu_item_id: menu_item_id.into(),
            name: name.into(),
            price,
            image: None,
        }
    }
}

/// A payment record — created exactly once per checkout, immutable after
/// creation. `cart_ids` is carried as supplied by the caller; ownership and
/// existence of the referenced entries are not checked.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub id: String,

    /// Paying user's email
    pub email: String,

    /// Amount in dollars, as captured at the gateway
    pub amount: f64,

    /// Gateway transaction id, when the client supplies one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    /// Free-form status label (e.g. "pending")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Cart entries this payment covers
    pub cart_ids: Vec<String>,

    /// Server-side creation timestamp
    pub created_at: DateTime<Utc>,
}

impl PaymentRecord {
    /// Create a payment record with a generated id and current timestamp
    pub fn new(email: impl Into<String>, amount: f64, cart_ids: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            email: email.into(),
            amount,
            transaction_id: None,
            status: None,
            cart_ids,
            created_at: Utc::now(),
        }
    }

    /// Set the gateway transaction id
    pub fn with_transaction_id(mut self, id: impl Into<String>) -> Self {
        self.transaction_id = Some(id.into());
        self
    }

    /// Set the status label
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

// =============================================================================
// Store Outcomes
// =============================================================================

/// Outcome of a single-document insert
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    /// Id of the inserted document, `null` when nothing was inserted
    pub inserted_id: Option<String>,
}

impl InsertOutcome {
    /// An acknowledged insert of the given document id
    pub fn inserted(id: impl Into<String>) -> Self {
        Self {
            acknowledged: true,
            inserted_id: Some(id.into()),
        }
    }
}

/// Outcome of a delete; a count lower than requested is not an error
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteOutcome {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteOutcome {
    /// An acknowledged delete of `deleted_count` documents
    pub fn deleted(deleted_count: u64) -> Self {
        Self {
            acknowledged: true,
            deleted_count,
        }
    }
}

/// Outcome of an update/upsert
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateOutcome {
    /// An acknowledged update that matched and modified `count` documents
    pub fn modified(count: u64) -> Self {
        Self {
            acknowledged: true,
            matched_count: count,
            modified_count: count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_role_check() {
        let mut user = UserRecord::new("a@x.com", Some("Ada".into()));
        assert!(!user.is_admin());

        user.role = Some(UserRole::Admin);
        assert!(user.is_admin());
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = CartEntry::new("a@x.com", "m1", "Soup", 4.5);
        let b = CartEntry::new("a@x.com", "m1", "Soup", 4.5);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_payment_record_wire_shape() {
        let payment = PaymentRecord::new("a@x.com", 42.0, vec!["c1".into(), "c2".into()])
            .with_transaction_id("pi_123")
            .with_status("pending");

        let json = serde_json::to_value(&payment).unwrap();
        assert_eq!(json["email"], "a@x.com");
        assert_eq!(json["cartIds"][1], "c2");
        assert_eq!(json["transactionId"], "pi_123");
    }

    #[test]
    fn test_outcome_serialization() {
        let json = serde_json::to_value(DeleteOutcome::deleted(2)).unwrap();
        assert_eq!(json["deletedCount"], 2);
        assert_eq!(json["acknowledged"], true);

        let json = serde_json::to_value(InsertOutcome {
            acknowledged: true,
            inserted_id: None,
        })
        .unwrap();
        assert!(json["insertedId"].is_null());
    }
}
