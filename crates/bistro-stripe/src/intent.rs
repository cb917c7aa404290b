//! # Stripe Payment Intents
//!
//! Client for Stripe's PaymentIntents API. The backend's only use of the
//! gateway is to mint a client secret the browser confirms on its own; no
//! webhook or capture callback flows through this server.

use bistro_core::{ApiError, ApiResult};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use crate::config::StripeConfig;

/// A created payment intent, reduced to what the client needs
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
}

/// Stripe PaymentIntents client
pub struct StripePaymentIntents {
    config: StripeConfig,
    client: Client,
}

/// Convert a dollar amount to the smallest currency unit (cents)
pub fn dollars_to_cents(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

impl StripePaymentIntents {
    /// Create a new client for the given configuration
    pub fn new(config: StripeConfig) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ApiError::Configuration(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> ApiResult<Self> {
        Self::new(StripeConfig::from_env()?)
    }

    /// Create a card payment intent for the given dollar amount and return
    /// the client secret. Currency is fixed to USD.
    #[instrument(skip(self))]
    pub async fn create_intent(&self, price: f64) -> ApiResult<PaymentIntent> {
        let amount = dollars_to_cents(price);

        debug!("creating Stripe payment intent: amount={} cents", amount);

        let form_params: Vec<(String, String)> = vec![
            ("amount".to_string(), amount.to_string()),
            ("currency".to_string(), "usd".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
        ];

        let url = format!("{}/v1/payment_intents", self.config.api_base_url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", self.config.auth_header())
            .header("Stripe-Version", &self.config.api_version)
            .form(&form_params)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        if !status.is_success() {
            error!("Stripe API error: status={}, body={}", status, body);

            if let Ok(error_response) = serde_json::from_str::<StripeErrorResponse>(&body) {
                return Err(ApiError::Gateway {
                    provider: "stripe".to_string(),
                    message: error_response.error.message,
                });
            }

            return Err(ApiError::Gateway {
                provider: "stripe".to_string(),
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let intent: PaymentIntent = serde_json::from_str(&body).map_err(|e| {
            ApiError::Serialization(format!("failed to parse Stripe response: {e}"))
        })?;

        info!("created Stripe payment intent: id={}", intent.id);

        Ok(intent)
    }
}

// =============================================================================
// Stripe API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct StripeErrorResponse {
    error: StripeError,
}

#[derive(Debug, Deserialize)]
struct StripeError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> StripePaymentIntents {
        let config = StripeConfig::new("sk_test_abc123").with_api_base_url(server.uri());
        StripePaymentIntents::new(config).unwrap()
    }

    #[test]
    fn test_dollars_to_cents() {
        assert_eq!(dollars_to_cents(42.0), 4200);
        assert_eq!(dollars_to_cents(0.99), 99);
        assert_eq!(dollars_to_cents(19.99), 1999);
    }

    #[tokio::test]
    async fn test_create_intent_returns_client_secret() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .and(header("Authorization", "Bearer sk_test_abc123"))
            .and(body_string_contains("amount=4200"))
            .and(body_string_contains("currency=usd"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "pi_123",
                "client_secret": "pi_123_secret_456"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let intent = client_for(&server).create_intent(42.0).await.unwrap();

        assert_eq!(intent.id, "pi_123");
        assert_eq!(intent.client_secret, "pi_123_secret_456");
    }

    #[tokio::test]
    async fn test_provider_error_is_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/payment_intents"))
            .respond_with(ResponseTemplate::new(402).set_body_json(serde_json::json!({
                "error": { "message": "Your card was declined." }
            })))
            .mount(&server)
            .await;

        let err = client_for(&server).create_intent(1.0).await.unwrap_err();

        match err {
            ApiError::Gateway { provider, message } => {
                assert_eq!(provider, "stripe");
                assert_eq!(message, "Your card was declined.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
