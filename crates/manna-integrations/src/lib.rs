//! # Manna Integrations
//!
//! Clients for the external providers the Manna Solutions platform calls.
//!
//! ## Overview
//!
//! - **Billing**: customer lookup and self-service portal sessions
//!   ([`BillingClient`])
//! - **Webhooks**: signature verification for billing events
//!   ([`WebhookVerifier`])
//! - **Extraction**: receipt images to expense fields through a multimodal
//!   model ([`ExtractionClient`])
//!
//! All endpoints and keys come from [`IntegrationConfig::from_env`]. A
//! missing key is reported by the client that needs it, so the server starts
//! without billing or extraction configured.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use manna_integrations::{BillingClient, IntegrationConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = IntegrationConfig::from_env()?;
//! let billing = BillingClient::new(config.billing.clone(), config.timeout())?;
//! let session = billing
//!     .open_billing_portal("driver@example.com", "https://example.com/settings")
//!     .await?;
//! println!("redirect to {}", session.url);
//! # Ok(())
//! # }
//! ```

pub mod billing;
pub mod config;
pub mod extraction;
pub mod webhook;

pub use billing::{BillingClient, BillingError, Customer, PortalSession};
pub use config::{BillingEndpoint, ConfigError, ExtractionEndpoint, IntegrationConfig};
pub use extraction::{
    ExpenseType, ExtractedExpense, ExtractionClient, ExtractionError, ExtractionOutcome,
    ExtractionRequest, ResponseParser, DEFAULT_MIME_TYPE,
};
pub use webhook::{
    compute_signature, WebhookError, WebhookEvent, WebhookOutcome, WebhookVerifier,
    DEFAULT_TOLERANCE_SECS,
};
