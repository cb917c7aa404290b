//! # Routes
//!
//! Axum router configuration for the bistro-boss API. Gates are not
//! attached here — each handler declares its own gates through extractors,
//! so the composition is visible at the handler signature.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes (all API routes live under `/api/v1`):
/// - Tokens: POST /jwt
/// - Menu: GET /allMenu, GET+PATCH /menu/{id}, POST /menuItem,
///   DELETE /menuItem/{id}
/// - Carts: POST+GET /allCarts, DELETE /allCarts/{id}
/// - Payments: POST /create-payment-intent, GET /getPayments/{email},
///   POST /payment
/// - Users/admin: POST /users, GET /allUsers,
///   GET+DELETE+PATCH /admin/{id}
pub fn create_router(state: AppState) -> Router {
    // Permissive CORS, as the browser client is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Tokens
        .route("/jwt", post(handlers::create_token))
        // Menu
        .route("/allMenu", get(handlers::list_menu))
        .route(
            "/menu/{id}",
            get(handlers::get_menu_item).patch(handlers::update_menu_item),
        )
        .route("/menuItem", post(handlers::create_menu_item))
        .route("/menuItem/{id}", delete(handlers::delete_menu_item))
        // Carts
        .route(
            "/allCarts",
            post(handlers::add_cart_entry).get(handlers::list_cart_entries),
        )
        .route("/allCarts/{id}", delete(handlers::delete_cart_entry))
        // Payments
        .route(
            "/create-payment-intent",
            post(handlers::create_payment_intent),
        )
        .route("/getPayments/{email}", get(handlers::get_payments))
        .route("/payment", post(handlers::submit_payment))
        // Users / admin
        .route("/users", post(handlers::create_user))
        .route("/allUsers", get(handlers::list_users))
        .route(
            "/admin/{id}",
            get(handlers::admin_status)
                .delete(handlers::delete_user)
                .patch(handlers::promote_user),
        );

    Router::new()
        // Service banner and health check at root
        .route("/", get(handlers::online))
        .route("/health", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
