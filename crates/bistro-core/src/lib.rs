//! # bistro-core
//!
//! Core types and flows for the bistro-boss restaurant backend.
//!
//! This crate provides:
//! - `TokenClaims` with `issue_token` / `verify_token` for the stateless
//!   identity tokens, and the pure `require_self` scope rule
//! - `Store` trait — the document-store boundary the rest of the system is
//!   written against
//! - `process_checkout` — the payment-insert + cart-bulk-delete flow
//! - Domain documents (`MenuItem`, `CartEntry`, `UserRecord`,
//!   `PaymentRecord`) and store outcome types
//! - `ApiError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use bistro_core::{auth, checkout, PaymentRecord};
//!
//! // Mint a token for a caller-supplied identity claim
//! let token = auth::issue_token("a@x.com", secret)?;
//!
//! // Later, behind the auth gate:
//! let claims = auth::verify_token(&token, secret)?;
//!
//! // Checkout: record the payment, then clear the referenced cart entries
//! let payment = PaymentRecord::new(claims.email, 42.0, cart_ids);
//! let outcome = checkout::process_checkout(store.as_ref(), &payment).await?;
//! ```

pub mod auth;
pub mod checkout;
pub mod error;
pub mod model;
pub mod store;

// Re-exports for convenience
pub use auth::{issue_token, require_self, verify_token, TokenClaims, TOKEN_LIFETIME_SECS};
pub use checkout::{process_checkout, CheckoutOutcome};
pub use error::{ApiError, ApiResult};
pub use model::{
    CartEntry, DeleteOutcome, InsertOutcome, MenuItem, MenuItemPatch, PaymentRecord, UpdateOutcome,
    UserRecord, UserRole,
};
pub use store::{BoxedStore, Store};
