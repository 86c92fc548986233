//! HTTP routes
//!
//! Each submodule owns one group of paths and exposes `routes()`; [`router`]
//! merges them and attaches request tracing.

pub mod clients;
pub mod consulting;
pub mod expenses;
pub mod health;
pub mod integrations;
pub mod tiers;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(consulting::routes())
        .merge(tiers::routes())
        .merge(clients::routes())
        .merge(expenses::routes())
        .merge(integrations::routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
