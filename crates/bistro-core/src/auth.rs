//! # Token Issue & Verification
//!
//! Stateless identity tokens (HS256) plus the pure self-scope rule.
//!
//! A token carries the email-only identity claim and a fixed 1-hour expiry.
//! Nothing else: no role, no permissions. Role checks always re-read the
//! user record, so revocation takes effect on the very next request. Tokens
//! are never persisted and cannot be revoked before expiry.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};

/// Token lifetime, fixed at issuance: 1 hour.
pub const TOKEN_LIFETIME_SECS: i64 = 60 * 60;

/// The identity claim carried inside an issued token.
///
/// Email is the sole subject identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issue a signed identity token for the given email.
///
/// The email is taken as-is — no existence or format check, and no
/// credential check precedes issuance. Does not fail for well-formed
/// string input.
pub fn issue_token(email: &str, secret: &[u8]) -> ApiResult<String> {
    let now = Utc::now();
    let claims = TokenClaims {
        email: email.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::seconds(TOKEN_LIFETIME_SECS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| ApiError::Configuration(format!("jwt encode: {e}")))
}

/// Verify a bearer token, returning the decoded claims.
///
/// Every failure mode — malformed token, bad signature, expired — collapses
/// into [`ApiError::Unauthenticated`]; the subtype is not distinguished at
/// the boundary.
pub fn verify_token(token: &str, secret: &[u8]) -> ApiResult<TokenClaims> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims)
        .map_err(|_| ApiError::Unauthenticated)
}

/// Self-scope rule: a caller may only touch resources keyed by their own
/// identity claim. Pure comparison, no I/O.
pub fn require_self(claims: &TokenClaims, owner_email: &str) -> ApiResult<()> {
    if claims.email != owner_email {
        return Err(ApiError::Forbidden);
    }
    Ok(())
}
