//! # Request Handlers
//!
//! Axum request handlers for the bistro-boss API. Gates are composed per
//! route through the extractors in [`crate::extract`]; everything else is
//! a thin pass-through to the store.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, instrument};

use bistro_core::{
    auth, checkout, ApiError, CartEntry, CheckoutOutcome, MenuItem, MenuItemPatch, PaymentRecord,
    UserRecord,
};

use crate::extract::{AuthClaims, RequireAdmin};
use crate::state::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

/// Flat error body, the only error shape this API exposes
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
}

fn api_error_to_response(err: ApiError) -> (StatusCode, Json<ErrorBody>) {
    let code = err.status_code();
    let body = ErrorBody {
        message: err.to_string(),
    };
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(body),
    )
}

/// Token issue request
#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub email: String,
}

/// Menu item creation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemRequest {
    pub name: String,
    pub category: String,
    pub price: f64,
    #[serde(default)]
    pub recipe: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

/// Cart entry creation request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartEntryRequest {
    pub email: String,
    pub menu_item_id: String,
    pub name: String,
    pub price: f64,
    #[serde(default)]
    pub image: Option<String>,
}

/// Cart listing query
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    #[serde(default)]
    pub email: Option<String>,
}

/// Payment-intent request
#[derive(Debug, Deserialize)]
pub struct IntentRequest {
    pub price: f64,
}

/// Checkout submission
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRequest {
    pub email: String,
    pub amount: f64,
    pub cart_ids: Vec<String>,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

/// User creation request
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

type HandlerResult<T> = Result<T, (StatusCode, Json<ErrorBody>)>;

// =============================================================================
// Service
// =============================================================================

/// Service-online banner
pub async fn online() -> impl IntoResponse {
    "Bistro Boss restaurant server is online"
}

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "service": "bistro-boss",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

// =============================================================================
// Tokens
// =============================================================================

/// Mint an identity token for a caller-supplied email. No credential check
/// precedes issuance; the claim is taken at face value.
pub async fn create_token(
    State(state): State<AppState>,
    Json(request): Json<TokenRequest>,
) -> HandlerResult<Json<serde_json::Value>> {
    let token =
        auth::issue_token(&request.email, state.token_secret()).map_err(api_error_to_response)?;

    Ok(Json(json!({ "token": token })))
}

// =============================================================================
// Menu
// =============================================================================

/// List all menu items
pub async fn list_menu(State(state): State<AppState>) -> HandlerResult<Json<Vec<MenuItem>>> {
    let items = state.store.list_menu().await.map_err(api_error_to_response)?;
    Ok(Json(items))
}

/// Fetch one menu item; absent ids yield a null body, not an error
pub async fn get_menu_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<Option<MenuItem>>> {
    let item = state
        .store
        .find_menu_item(&id)
        .await
        .map_err(api_error_to_response)?;
    Ok(Json(item))
}

/// Create a menu item (admin)
pub async fn create_menu_item(
    RequireAdmin(_claims): RequireAdmin,
    State(state): State<AppState>,
    Json(request): Json<MenuItemRequest>,
) -> HandlerResult<Json<serde_json::Value>> {
    let mut item = MenuItem::new(request.name, request.category, request.price);
    item.recipe = request.recipe;
    item.image = request.image;

    let outcome = state
        .store
        .insert_menu_item(&item)
        .await
        .map_err(api_error_to_response)?;

    Ok(Json(json!(outcome)))
}

/// Delete a menu item (admin)
pub async fn delete_menu_item(
    RequireAdmin(_claims): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<serde_json::Value>> {
    let outcome = state
        .store
        .delete_menu_item(&id)
        .await
        .map_err(api_error_to_response)?;

    Ok(Json(json!(outcome)))
}

/// Upsert-update a menu item's editable fields (admin)
pub async fn update_menu_item(
    RequireAdmin(_claims): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(patch): Json<MenuItemPatch>,
) -> HandlerResult<Json<serde_json::Value>> {
    let outcome = state
        .store
        .upsert_menu_item(&id, &patch)
        .await
        .map_err(api_error_to_response)?;

    Ok(Json(json!(outcome)))
}

// =============================================================================
// Carts
// =============================================================================

/// Add a cart entry (authenticated). The entry's email is taken from the
/// body as supplied.
pub async fn add_cart_entry(
    AuthClaims(_claims): AuthClaims,
    State(state): State<AppState>,
    Json(request): Json<CartEntryRequest>,
) -> HandlerResult<Json<serde_json::Value>> {
    let mut entry = CartEntry::new(
        request.email,
        request.menu_item_id,
        request.name,
        request.price,
    );
    entry.image = request.image;

    let outcome = state
        .store
        .insert_cart_entry(&entry)
        .await
        .map_err(api_error_to_response)?;

    Ok(Json(json!(outcome)))
}

/// List cart entries for the email given as a query parameter
pub async fn list_cart_entries(
    State(state): State<AppState>,
    Query(query): Query<CartQuery>,
) -> HandlerResult<Json<Vec<CartEntry>>> {
    let email = query.email.unwrap_or_default();
    let entries = state
        .store
        .list_cart_entries(&email)
        .await
        .map_err(api_error_to_response)?;

    Ok(Json(entries))
}

/// Remove one cart entry
pub async fn delete_cart_entry(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<serde_json::Value>> {
    let outcome = state
        .store
        .delete_cart_entry(&id)
        .await
        .map_err(api_error_to_response)?;

    Ok(Json(json!(outcome)))
}

// =============================================================================
// Payments
// =============================================================================

/// Obtain a gateway client secret for an amount
#[instrument(skip(state, request))]
pub async fn create_payment_intent(
    State(state): State<AppState>,
    Json(request): Json<IntentRequest>,
) -> HandlerResult<Json<serde_json::Value>> {
    let intent = state
        .payments
        .create_intent(request.price)
        .await
        .map_err(|e| {
            error!("failed to create payment intent: {}", e);
            api_error_to_response(e)
        })?;

    Ok(Json(json!({ "clientSecret": intent.client_secret })))
}

/// Payment history for one user; self-scoped to the caller's own email
pub async fn get_payments(
    AuthClaims(claims): AuthClaims,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> HandlerResult<Json<Vec<PaymentRecord>>> {
    auth::require_self(&claims, &email).map_err(api_error_to_response)?;

    let payments = state
        .store
        .list_payments(&email)
        .await
        .map_err(api_error_to_response)?;

    Ok(Json(payments))
}

/// Checkout: record the payment, then bulk-delete the cart entries it
/// references. Both outcomes are returned to the caller.
#[instrument(skip(state, request), fields(cart_ids = request.cart_ids.len()))]
pub async fn submit_payment(
    State(state): State<AppState>,
    Json(request): Json<PaymentRequest>,
) -> HandlerResult<Json<CheckoutOutcome>> {
    let mut payment = PaymentRecord::new(request.email, request.amount, request.cart_ids);
    payment.transaction_id = request.transaction_id;
    payment.status = request.status;

    let outcome = checkout::process_checkout(state.store.as_ref(), &payment)
        .await
        .map_err(|e| {
            error!("checkout failed: {}", e);
            api_error_to_response(e)
        })?;

    Ok(Json(outcome))
}

// =============================================================================
// Users
// =============================================================================

/// Create a user unless one already exists for the email (idempotent)
#[instrument(skip(state, request), fields(email = %request.email))]
pub async fn create_user(
    State(state): State<AppState>,
    Json(request): Json<CreateUserRequest>,
) -> HandlerResult<Json<serde_json::Value>> {
    let existing = state
        .store
        .find_user_by_email(&request.email)
        .await
        .map_err(api_error_to_response)?;

    if existing.is_some() {
        return Ok(Json(
            json!({ "message": "user already exists", "insertedId": null }),
        ));
    }

    let user = UserRecord::new(request.email, request.name);
    let outcome = state
        .store
        .insert_user(&user)
        .await
        .map_err(api_error_to_response)?;

    info!("created user {}", user.id);
    Ok(Json(json!(outcome)))
}

/// List all users (admin)
pub async fn list_users(
    RequireAdmin(_claims): RequireAdmin,
    State(state): State<AppState>,
) -> HandlerResult<Json<Vec<UserRecord>>> {
    let users = state.store.list_users().await.map_err(api_error_to_response)?;
    Ok(Json(users))
}

/// Delete a user (admin)
pub async fn delete_user(
    RequireAdmin(_claims): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<serde_json::Value>> {
    let outcome = state
        .store
        .delete_user(&id)
        .await
        .map_err(api_error_to_response)?;

    Ok(Json(json!(outcome)))
}

/// Promote a user to the admin role (admin)
pub async fn promote_user(
    RequireAdmin(_claims): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> HandlerResult<Json<serde_json::Value>> {
    let outcome = state
        .store
        .promote_user(&id)
        .await
        .map_err(api_error_to_response)?;

    Ok(Json(json!(outcome)))
}

/// Report whether the given email holds the admin role (authenticated)
pub async fn admin_status(
    AuthClaims(_claims): AuthClaims,
    State(state): State<AppState>,
    Path(email): Path<String>,
) -> HandlerResult<Json<serde_json::Value>> {
    let user = state
        .store
        .find_user_by_email(&email)
        .await
        .map_err(api_error_to_response)?;

    let admin = user.map(|u| u.is_admin()).unwrap_or(false);
    Ok(Json(json!({ "admin": admin })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_to_response() {
        let (status, Json(body)) = api_error_to_response(ApiError::Forbidden);
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body.message, "forbidden access");

        let (status, _body) = api_error_to_response(ApiError::Store("down".into()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_payment_request_wire_shape() {
        let request: PaymentRequest = serde_json::from_value(json!({
            "email": "a@x.com",
            "amount": 42,
            "cartIds": ["c1", "c2"],
            "transactionId": "pi_123"
        }))
        .unwrap();

        assert_eq!(request.amount, 42.0);
        assert_eq!(request.cart_ids, vec!["c1", "c2"]);
        assert_eq!(request.transaction_id.as_deref(), Some("pi_123"));
        assert!(request.status.is_none());
    }
}
