//! Liveness endpoint.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// Overall health.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

/// `GET /health` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub store_open: bool,
    pub billing_configured: bool,
    pub webhooks_configured: bool,
}

impl IntoResponse for HealthResponse {
    fn into_response(self) -> Response {
        let status_code = match self.status {
            HealthStatus::Healthy => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status_code, Json(self)).into_response()
    }
}

async fn health(State(state): State<AppState>) -> HealthResponse {
    let store_open = state.store.is_open();
    HealthResponse {
        status: if store_open {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        },
        store_open,
        billing_configured: state.billing.publishable_key().is_ok(),
        webhooks_configured: state.webhooks.is_configured(),
    }
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
