//! Shared application state.

use manna_integrations::{
    BillingClient, BillingError, ExtractionClient, ExtractionError, IntegrationConfig,
    WebhookVerifier,
};
use manna_store::DataStore;
use std::sync::Arc;
use thiserror::Error;

use crate::config::ServerConfig;

/// Errors building the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("Billing client: {0}")]
    Billing(#[from] BillingError),

    #[error("Extraction client: {0}")]
    Extraction(#[from] ExtractionError),
}

/// Everything a handler can reach. Cloned per request.
#[derive(Clone)]
pub struct AppState {
    /// Data access handle.
    pub store: DataStore,

    /// Billing provider client.
    pub billing: BillingClient,

    /// Document extraction client.
    pub extraction: ExtractionClient,

    /// Billing webhook verifier.
    pub webhooks: WebhookVerifier,

    /// Server settings.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Build the state from an open store and loaded configuration.
    pub fn new(
        store: DataStore,
        config: ServerConfig,
        integrations: &IntegrationConfig,
    ) -> Result<Self, StateError> {
        let timeout = integrations.timeout();
        Ok(Self {
            store,
            billing: BillingClient::new(integrations.billing.clone(), timeout)?,
            extraction: ExtractionClient::new(integrations.extraction.clone(), timeout)?,
            webhooks: WebhookVerifier::new(integrations.billing.webhook_secret.clone()),
            config: Arc::new(config),
        })
    }
}
