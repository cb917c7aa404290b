//! # bistro-stripe
//!
//! Stripe gateway client for bistro-boss-rs.
//!
//! This server's relationship with the gateway is deliberately thin: it
//! creates a payment intent and hands the resulting client secret to the
//! browser, which confirms the payment directly with Stripe. Payment
//! capture reaches this backend only as the checkout submission the client
//! posts afterwards.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use bistro_stripe::StripePaymentIntents;
//!
//! let gateway = StripePaymentIntents::from_env()?;
//! let intent = gateway.create_intent(42.0).await?;
//! // Send intent.client_secret to the browser
//! ```

pub mod config;
pub mod intent;

// Re-exports
pub use config::StripeConfig;
pub use intent::{dollars_to_cents, PaymentIntent, StripePaymentIntents};
