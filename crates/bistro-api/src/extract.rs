//! # Gate Extractors
//!
//! The request gates, expressed as Axum extractors so that a route's gate
//! composition is visible in its handler signature:
//!
//! - `AuthClaims` — bearer-token verification (401 on any failure)
//! - `RequireAdmin` — auth plus a fresh role read (403 for non-admins)
//!
//! The self-scope rule is pure and lives in `bistro_core::auth`; handlers
//! apply it directly where a route is scoped to the caller's own records.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use bistro_core::{auth, TokenClaims};

use crate::state::AppState;

/// Rejection produced by a gate. Auth and role failures share the same
/// flat body; the caller cannot tell which check tripped.
#[derive(Debug)]
pub enum GateRejection {
    /// Missing/malformed/expired/tampered token
    Unauthenticated,
    /// Authenticated but not an admin
    Forbidden,
    /// The role lookup itself failed (store unreachable)
    Upstream(String),
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "forbidden access" })),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": "forbidden access" })),
            )
                .into_response(),
            Self::Upstream(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": message })),
            )
                .into_response(),
        }
    }
}

/// Extractor that requires a valid bearer token.
///
/// Verification is purely cryptographic — no store access. The decoded
/// claims are attached to request extensions so a second gate on the same
/// request does not re-verify.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     AuthClaims(claims): AuthClaims,
/// ) -> impl IntoResponse {
///     format!("hello, {}", claims.email)
/// }
/// ```
pub struct AuthClaims(pub TokenClaims);

impl FromRequestParts<AppState> for AuthClaims {
    type Rejection = GateRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(claims) = parts.extensions.get::<TokenClaims>() {
            return Ok(Self(claims.clone()));
        }

        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(GateRejection::Unauthenticated)?;

        let token = header
            .strip_prefix("Bearer ")
            .ok_or(GateRejection::Unauthenticated)?;

        let claims = auth::verify_token(token, state.token_secret())
            .map_err(|_| GateRejection::Unauthenticated)?;

        parts.extensions.insert(claims.clone());
        Ok(Self(claims))
    }
}

/// Extractor that requires an admin caller. Composes the auth gate, then
/// re-reads the caller's user record on every request — the role is never
/// cached, so revocation takes effect on the next call.
pub struct RequireAdmin(pub TokenClaims);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = GateRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthClaims(claims) = AuthClaims::from_request_parts(parts, state).await?;

        let user = state
            .store
            .find_user_by_email(&claims.email)
            .await
            .map_err(|e| GateRejection::Upstream(e.to_string()))?;

        // Missing record and non-admin record reject identically.
        if !user.map(|u| u.is_admin()).unwrap_or(false) {
            return Err(GateRejection::Forbidden);
        }

        Ok(Self(claims))
    }
}
