//! # Application State
//!
//! Shared state for the Axum application: the store handle, the Stripe
//! gateway client, and process configuration. Constructed once at startup
//! and injected into every gate and handler — no ambient globals.

use bistro_core::BoxedStore;
use bistro_store::PgStore;
use bistro_stripe::StripePaymentIntents;
use std::sync::Arc;

use bistro_core::ApiError;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Process-wide token signing secret, read-only after startup
    pub access_token_secret: String,
}

impl AppConfig {
    /// Load from environment variables.
    ///
    /// Required env vars:
    /// - `ACCESS_TOKEN_SECRET`
    pub fn from_env() -> Result<Self, ApiError> {
        dotenvy::dotenv().ok();

        let access_token_secret = std::env::var("ACCESS_TOKEN_SECRET")
            .map_err(|_| ApiError::Configuration("ACCESS_TOKEN_SECRET not set".to_string()))?;

        Ok(Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5000),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            access_token_secret,
        })
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> std::net::SocketAddr {
        format!("{}:{}", self.host, self.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Document store handle, shared across all requests
    pub store: BoxedStore,
    /// Stripe gateway client
    pub payments: Arc<StripePaymentIntents>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create the production state: Postgres store + Stripe gateway.
    pub async fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env()?;

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| anyhow::anyhow!("DATABASE_URL not set"))?;
        let store = PgStore::connect(&database_url).await?;

        let payments = StripePaymentIntents::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Stripe: {}", e))?;

        Ok(Self {
            store: Arc::new(store),
            payments: Arc::new(payments),
            config,
        })
    }

    /// Assemble state from explicit parts (tests, alternate backends)
    pub fn with_parts(
        store: BoxedStore,
        payments: Arc<StripePaymentIntents>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            payments,
            config,
        }
    }

    /// The token signing secret as raw bytes
    pub fn token_secret(&self) -> &[u8] {
        self.config.access_token_secret.as_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
            access_token_secret: "secret".to_string(),
        };

        let addr = config.socket_addr();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");
        assert!(!config.is_production());
    }
}
