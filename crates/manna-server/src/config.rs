//! Server configuration.

use manna_integrations::ConfigError;
use serde::{Deserialize, Serialize};

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind.
    pub host: String,

    /// Port to bind.
    pub port: u16,

    /// Insert demo projects and the default tiers into an empty store at startup.
    pub seed_demo_data: bool,

    /// Public URL of the site, used for billing portal return links.
    pub public_base_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            seed_demo_data: true,
            public_base_url: "http://localhost:5000".to_string(),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `HOST`: Interface to bind (default: 0.0.0.0)
    /// - `PORT`: Port to bind (default: 5000)
    /// - `MANNA_SEED_DEMO_DATA`: Seed an empty store (default: true)
    /// - `PUBLIC_BASE_URL`: Public site URL (default: http://localhost:5000)
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();

        let port = match std::env::var("PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "PORT".to_string(),
                message: format!("expected a port number, got {:?}", raw),
            })?,
            Err(_) => default.port,
        };

        Ok(Self {
            host: std::env::var("HOST").unwrap_or(default.host),
            port,
            seed_demo_data: std::env::var("MANNA_SEED_DEMO_DATA")
                .map(|s| s != "false" && s != "0")
                .unwrap_or(default.seed_demo_data),
            public_base_url: std::env::var("PUBLIC_BASE_URL").unwrap_or(default.public_base_url),
        })
    }

    /// Address to bind, as `host:port`.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Where the billing portal sends the user back to.
    pub fn portal_return_url(&self) -> String {
        format!("{}/dashboard/settings", self.public_base_url.trim_end_matches('/'))
    }
}
