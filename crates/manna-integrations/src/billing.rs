//! Billing provider client.
//!
//! Talks to the Stripe REST API with form-encoded requests and bearer auth.
//! Only the calls the platform needs are covered: customer lookup and
//! creation, and self-service billing portal sessions.

use crate::config::{BillingEndpoint, ConfigError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

/// Billing client errors.
#[derive(Debug, Error)]
pub enum BillingError {
    /// Keys are not configured.
    #[error("Billing provider not configured: {0}")]
    NotConfigured(#[from] ConfigError),

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error ({status}): {message}")]
    ApiError {
        /// HTTP status code.
        status: u16,
        /// Error message from the API.
        message: String,
    },

    /// Invalid response from the API.
    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    /// Authentication failed.
    #[error("Authentication failed")]
    AuthenticationFailed,
}

impl BillingError {
    /// Whether the failure comes from our own configuration rather than the provider.
    pub fn is_configuration(&self) -> bool {
        matches!(self, BillingError::NotConfigured(_))
    }
}

/// Billing provider client.
#[derive(Clone)]
pub struct BillingClient {
    /// HTTP client instance.
    client: Client,

    /// Endpoint and keys.
    endpoint: BillingEndpoint,
}

impl std::fmt::Debug for BillingClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BillingClient")
            .field("base_url", &self.endpoint.base_url)
            .field("configured", &self.endpoint.credentials().is_ok())
            .finish()
    }
}

impl BillingClient {
    /// Create a new billing client.
    pub fn new(endpoint: BillingEndpoint, timeout: Duration) -> Result<Self, BillingError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }

    /// The publishable key for browser-side checkout.
    pub fn publishable_key(&self) -> Result<&str, BillingError> {
        let (publishable, _) = self.endpoint.credentials()?;
        Ok(publishable)
    }

    fn secret_key(&self) -> Result<&str, BillingError> {
        let (_, secret) = self.endpoint.credentials()?;
        Ok(secret)
    }

    /// Find the first customer registered with `email`.
    #[instrument(skip(self))]
    pub async fn find_customer_by_email(&self, email: &str) -> Result<Option<Customer>, BillingError> {
        let secret = self.secret_key()?;
        debug!("Looking up billing customer");

        let url = self.endpoint.url("/v1/customers");
        let response = self
            .client
            .get(&url)
            .bearer_auth(secret)
            .query(&[("email", email), ("limit", "1")])
            .send()
            .await?;

        let list: CustomerList = self.handle_response(response).await?;
        Ok(list.data.into_iter().next())
    }

    /// Create a customer for `email`.
    #[instrument(skip(self))]
    pub async fn create_customer(&self, email: &str) -> Result<Customer, BillingError> {
        let secret = self.secret_key()?;

        let url = self.endpoint.url("/v1/customers");
        let response = self
            .client
            .post(&url)
            .bearer_auth(secret)
            .form(&[("email", email)])
            .send()
            .await?;

        let customer: Customer = self.handle_response(response).await?;
        info!(customer_id = %customer.id, "Billing customer created");
        Ok(customer)
    }

    /// Create a billing portal session for an existing customer.
    #[instrument(skip(self))]
    pub async fn create_portal_session(
        &self,
        customer_id: &str,
        return_url: &str,
    ) -> Result<PortalSession, BillingError> {
        let secret = self.secret_key()?;

        let url = self.endpoint.url("/v1/billing_portal/sessions");
        let response = self
            .client
            .post(&url)
            .bearer_auth(secret)
            .form(&[("customer", customer_id), ("return_url", return_url)])
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Open a portal session for `email`, creating the customer on first use.
    #[instrument(skip(self))]
    pub async fn open_billing_portal(
        &self,
        email: &str,
        return_url: &str,
    ) -> Result<PortalSession, BillingError> {
        let customer = match self.find_customer_by_email(email).await? {
            Some(customer) => customer,
            None => self.create_customer(email).await?,
        };
        self.create_portal_session(&customer.id, return_url).await
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T>(&self, response: reqwest::Response) -> Result<T, BillingError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            error!("Billing provider authentication failed");
            return Err(BillingError::AuthenticationFailed);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.error.message)
                .unwrap_or(body);
            warn!("Billing API error ({}): {}", status.as_u16(), message);
            return Err(BillingError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json()
            .await
            .map_err(|e| BillingError::InvalidResponse(e.to_string()))
    }
}

/// A billing customer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Customer {
    /// Provider customer ID.
    pub id: String,

    /// Email on file.
    #[serde(default)]
    pub email: Option<String>,
}

/// A self-service billing portal session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortalSession {
    /// Session ID.
    pub id: String,

    /// URL the browser is redirected to.
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct CustomerList {
    data: Vec<Customer>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}
