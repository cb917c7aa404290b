//! # API Error Types
//!
//! Typed error handling for the bistro-boss backend.
//! All fallible operations return `Result<T, ApiError>`.

use thiserror::Error;

/// Core error type for gate, store, and gateway operations.
///
/// The two gate rejections deliberately share the same flat message —
/// callers must not be able to tell a missing token from a tampered or
/// expired one at the boundary.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing, malformed, signature-invalid, or expired bearer token
    #[error("forbidden access")]
    Unauthenticated,

    /// Authenticated but insufficient role or wrong scope
    #[error("forbidden access")]
    Forbidden,

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration errors (missing keys, invalid config)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Document store failure (write rejected, store unreachable)
    #[error("Store error: {0}")]
    Store(String),

    /// Payment gateway API error
    #[error("Gateway error [{provider}]: {message}")]
    Gateway { provider: String, message: String },

    /// Network/HTTP error communicating with the gateway
    #[error("Network error: {0}")]
    Network(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthenticated => 401,
            ApiError::Forbidden => 403,
            ApiError::InvalidRequest(_) => 400,
            ApiError::Configuration(_) => 500,
            ApiError::Store(_) => 500,
            ApiError::Gateway { .. } => 502,
            ApiError::Network(_) => 503,
            ApiError::Serialization(_) => 500,
        }
    }
}

/// Result type alias for backend operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::Unauthenticated.status_code(), 401);
        assert_eq!(ApiError::Forbidden.status_code(), 403);
        assert_eq!(
            ApiError::InvalidRequest("bad data".into()).status_code(),
            400
        );
        assert_eq!(
            ApiError::Gateway {
                provider: "stripe".into(),
                message: "declined".into()
            }
            .status_code(),
            502
        );
        assert_eq!(ApiError::Network("timeout".into()).status_code(), 503);
        assert_eq!(ApiError::Store("write rejected".into()).status_code(), 500);
    }

    #[test]
    fn test_gate_rejections_share_message() {
        // Auth failures of any kind must be indistinguishable at the boundary.
        assert_eq!(ApiError::Unauthenticated.to_string(), "forbidden access");
        assert_eq!(ApiError::Forbidden.to_string(), "forbidden access");
    }
}
