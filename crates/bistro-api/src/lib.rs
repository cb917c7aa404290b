//! # bistro-api
//!
//! HTTP API layer for bistro-boss-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server
//! - Gate extractors (auth, admin) composed per route
//! - REST endpoints for menu, carts, users, and checkout
//!
//! ## Endpoints
//!
//! | Method | Path | Gates | Description |
//! |--------|------|-------|-------------|
//! | GET | `/health` | none | Health check |
//! | POST | `/api/v1/jwt` | none | Issue identity token |
//! | GET | `/api/v1/allMenu` | none | List menu items |
//! | GET | `/api/v1/menu/{id}` | none | Get menu item |
//! | POST | `/api/v1/allCarts` | auth | Add cart entry |
//! | GET | `/api/v1/allCarts` | none | List cart entries by email |
//! | DELETE | `/api/v1/allCarts/{id}` | none | Remove cart entry |
//! | POST | `/api/v1/create-payment-intent` | none | Gateway client secret |
//! | GET | `/api/v1/getPayments/{email}` | auth + self | Payment history |
//! | POST | `/api/v1/payment` | none | Checkout |
//! | POST | `/api/v1/users` | none | Create user (idempotent) |
//! | GET | `/api/v1/allUsers` | auth + admin | List users |
//! | DELETE | `/api/v1/admin/{id}` | auth + admin | Delete user |
//! | PATCH | `/api/v1/admin/{id}` | auth + admin | Promote to admin |
//! | GET | `/api/v1/admin/{email}` | auth | Admin role report |
//! | POST | `/api/v1/menuItem` | auth + admin | Create menu item |
//! | DELETE | `/api/v1/menuItem/{id}` | auth + admin | Delete menu item |
//! | PATCH | `/api/v1/menu/{id}` | auth + admin | Upsert-update menu item |

pub mod extract;
pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
