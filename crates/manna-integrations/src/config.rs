//! Provider configuration.
//!
//! Endpoints and credentials for the billing provider and the document
//! extraction model. Configuration is loaded from environment variables with
//! defaults pointing at the public provider APIs. Missing credentials are not
//! an error at load time; the client that needs them reports it when called.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing required environment variable.
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

/// Configuration for every external provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Billing provider (Stripe).
    pub billing: BillingEndpoint,

    /// Document extraction model (Gemini).
    pub extraction: ExtractionEndpoint,

    /// Request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            billing: BillingEndpoint::default(),
            extraction: ExtractionEndpoint::default(),
            timeout_secs: 30,
        }
    }
}

impl IntegrationConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `STRIPE_API_BASE_URL`: Billing API URL (default: https://api.stripe.com)
    /// - `STRIPE_PUBLISHABLE_KEY`: Publishable key handed to the browser
    /// - `STRIPE_API_SECRET_KEY`: Secret key for server calls
    /// - `STRIPE_WEBHOOK_SECRET`: Webhook signing secret
    /// - `AI_INTEGRATIONS_GEMINI_BASE_URL`: Extraction API URL
    ///   (default: https://generativelanguage.googleapis.com/v1beta)
    /// - `AI_INTEGRATIONS_GEMINI_API_KEY`: Extraction API key
    /// - `EXTRACTION_MODEL`: Model name (default: gemini-2.5-flash)
    /// - `INTEGRATION_TIMEOUT_SECS`: Request timeout in seconds (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();

        let timeout_secs = match std::env::var("INTEGRATION_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "INTEGRATION_TIMEOUT_SECS".to_string(),
                message: format!("expected a whole number of seconds, got {:?}", raw),
            })?,
            Err(_) => default.timeout_secs,
        };

        Ok(Self {
            billing: BillingEndpoint {
                base_url: std::env::var("STRIPE_API_BASE_URL").unwrap_or(default.billing.base_url),
                publishable_key: non_empty_var("STRIPE_PUBLISHABLE_KEY"),
                secret_key: non_empty_var("STRIPE_API_SECRET_KEY"),
                webhook_secret: non_empty_var("STRIPE_WEBHOOK_SECRET"),
            },
            extraction: ExtractionEndpoint {
                base_url: std::env::var("AI_INTEGRATIONS_GEMINI_BASE_URL")
                    .unwrap_or(default.extraction.base_url),
                api_key: non_empty_var("AI_INTEGRATIONS_GEMINI_API_KEY"),
                model: std::env::var("EXTRACTION_MODEL").unwrap_or(default.extraction.model),
            },
            timeout_secs,
        })
    }

    /// Get the request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate that all provider credentials are present for production.
    pub fn validate_for_production(&self) -> Result<(), ConfigError> {
        self.billing.credentials()?;
        if self.billing.webhook_secret.is_none() {
            return Err(ConfigError::MissingEnvVar("STRIPE_WEBHOOK_SECRET".to_string()));
        }
        if self.extraction.api_key.is_none() {
            return Err(ConfigError::MissingEnvVar(
                "AI_INTEGRATIONS_GEMINI_API_KEY".to_string(),
            ));
        }
        Ok(())
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{}/{}", base, path)
}

/// Billing provider endpoint and keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingEndpoint {
    /// Base URL for the API.
    pub base_url: String,

    /// Publishable key, safe to expose to browsers.
    pub publishable_key: Option<String>,

    /// Secret key for server-side calls.
    pub secret_key: Option<String>,

    /// Webhook signing secret.
    pub webhook_secret: Option<String>,
}

impl Default for BillingEndpoint {
    fn default() -> Self {
        Self {
            base_url: "https://api.stripe.com".to_string(),
            publishable_key: None,
            secret_key: None,
            webhook_secret: None,
        }
    }
}

impl BillingEndpoint {
    /// Build a full URL by appending a path to the base URL.
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Both keys, or the first one that is missing.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        let publishable = self
            .publishable_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("STRIPE_PUBLISHABLE_KEY".to_string()))?;
        let secret = self
            .secret_key
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar("STRIPE_API_SECRET_KEY".to_string()))?;
        Ok((publishable, secret))
    }
}

/// Document extraction model endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionEndpoint {
    /// Base URL for the API, including any version segment.
    pub base_url: String,

    /// API key sent as `x-goog-api-key`.
    pub api_key: Option<String>,

    /// Model name.
    pub model: String,
}

impl Default for ExtractionEndpoint {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
        }
    }
}

impl ExtractionEndpoint {
    /// Build a full URL by appending a path to the base URL.
    pub fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// URL of the model's content generation call.
    pub fn generate_content_url(&self) -> String {
        self.url(&format!("models/{}:generateContent", self.model))
    }
}
