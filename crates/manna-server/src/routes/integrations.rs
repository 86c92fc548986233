//! Billing portal, billing webhooks, and document extraction.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::{get, post};
use axum::{Json, Router};
use manna_integrations::{ExtractionOutcome, ExtractionRequest, WebhookOutcome};
use manna_store::validate_input;
use serde::{Deserialize, Serialize};
use tracing::info;
use validator::Validate;

use crate::error::{ApiError, ApiResult};
use crate::extract::ApiJson;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/extract-document", post(extract_document))
        .route("/api/stripe/billing-portal", post(billing_portal))
        .route("/api/stripe/config", get(billing_config))
        .route("/api/stripe/webhook", post(billing_webhook))
}

async fn extract_document(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<ExtractionRequest>,
) -> ApiResult<Json<ExtractionOutcome>> {
    let outcome = state.extraction.extract(request).await?;
    info!(
        model = state.extraction.model(),
        expense_type = ?outcome.extracted.expense_type,
        empty = outcome.extracted.is_empty(),
        "Document extracted"
    );
    Ok(Json(outcome))
}

/// `POST /api/stripe/billing-portal` body.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BillingPortalRequest {
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    /// Where to send the user afterwards; defaults to the dashboard settings page.
    #[validate(url(message = "must be a valid URL"))]
    pub return_url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BillingPortalResponse {
    pub url: String,
}

async fn billing_portal(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<BillingPortalRequest>,
) -> ApiResult<Json<BillingPortalResponse>> {
    validate_input(&request).map_err(|e| ApiError::invalid("Invalid billing portal request", e))?;

    let return_url = request
        .return_url
        .unwrap_or_else(|| state.config.portal_return_url());
    let session = state
        .billing
        .open_billing_portal(&request.email, &return_url)
        .await?;

    Ok(Json(BillingPortalResponse { url: session.url }))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingConfigResponse {
    pub publishable_key: String,
}

async fn billing_config(State(state): State<AppState>) -> ApiResult<Json<BillingConfigResponse>> {
    let publishable_key = state.billing.publishable_key()?.to_string();
    Ok(Json(BillingConfigResponse { publishable_key }))
}

async fn billing_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<serde_json::Value>> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok());

    match state.webhooks.verify(&body, signature)? {
        WebhookOutcome::Skipped => Ok(Json(serde_json::json!({ "received": true, "processed": false }))),
        WebhookOutcome::Verified(event) => {
            info!(event_id = %event.id, event_type = %event.event_type, "Billing event accepted");
            Ok(Json(serde_json::json!({ "received": true, "processed": true })))
        }
    }
}
