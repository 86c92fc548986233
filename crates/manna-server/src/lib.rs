//! # Manna Server
//!
//! REST backend for the Manna Solutions consulting site and the trucker
//! expense tracking product.
//!
//! ## Overview
//!
//! - **Consulting**: projects, contact messages, demo requests
//! - **Subscriptions**: tier catalog, tier authoring, recommendation
//! - **Trucker clients**: onboarding with tier recommendation, expense CRUD
//! - **Integrations**: billing portal, billing webhooks, receipt extraction
//!
//! ## Usage
//!
//! ```rust,no_run
//! use manna_integrations::IntegrationConfig;
//! use manna_server::{router, AppState, ServerConfig};
//! use manna_store::{DataStore, StoreConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = DataStore::open(StoreConfig::default())?;
//! let state = AppState::new(store, ServerConfig::default(), &IntegrationConfig::default())?;
//! let app = router(state);
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use config::ServerConfig;
pub use error::{ApiError, ApiResult, Entity};
pub use routes::router;
pub use state::{AppState, StateError};
