//! Billing webhook verification.
//!
//! Incoming events carry a `Stripe-Signature` header of the form
//! `t=<unix seconds>,v1=<hex hmac>`. The HMAC-SHA256 is taken over
//! `"<t>.<raw body>"` with the endpoint's signing secret. Verification
//! needs the body exactly as received, before any JSON parsing.

use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::{info, warn};

type HmacSha256 = Hmac<Sha256>;

/// Default allowed clock difference between signer and receiver, in seconds.
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Webhook verification errors.
#[derive(Debug, Error)]
pub enum WebhookError {
    /// The request carried no signature header.
    #[error("Missing webhook signature")]
    MissingSignature,

    /// The signature header could not be parsed.
    #[error("Invalid signature header: {0}")]
    MalformedHeader(String),

    /// The signed timestamp is outside the tolerance window.
    #[error("Webhook timestamp outside tolerance")]
    TimestampOutOfTolerance,

    /// No provided signature matches the payload.
    #[error("Invalid webhook signature")]
    SignatureMismatch,

    /// The signed payload is not a valid event.
    #[error("Invalid webhook payload: {0}")]
    InvalidPayload(String),
}

/// A verified webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    /// Event ID.
    pub id: String,

    /// Event type (e.g., "customer.subscription.updated").
    #[serde(rename = "type")]
    pub event_type: String,

    /// The object that triggered the event.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Result of handling an incoming webhook.
#[derive(Debug, Clone)]
pub enum WebhookOutcome {
    /// No signing secret is configured, so the event was not processed.
    Skipped,

    /// Signature checked and payload parsed.
    Verified(WebhookEvent),
}

/// Verifies webhook signatures against a signing secret.
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: Option<String>,
    tolerance_secs: i64,
}

impl std::fmt::Debug for WebhookVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebhookVerifier")
            .field("configured", &self.secret.is_some())
            .field("tolerance_secs", &self.tolerance_secs)
            .finish()
    }
}

impl WebhookVerifier {
    /// Create a verifier. `None` means events are skipped.
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Override the timestamp tolerance.
    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Whether a signing secret is configured.
    pub fn is_configured(&self) -> bool {
        self.secret.is_some()
    }

    /// Verify an incoming webhook against the current time.
    pub fn verify(&self, payload: &[u8], signature: Option<&str>) -> Result<WebhookOutcome, WebhookError> {
        self.verify_at(payload, signature, chrono::Utc::now().timestamp())
    }

    /// Verify an incoming webhook as if received at `now` (unix seconds).
    pub fn verify_at(
        &self,
        payload: &[u8],
        signature: Option<&str>,
        now: i64,
    ) -> Result<WebhookOutcome, WebhookError> {
        let Some(secret) = self.secret.as_deref() else {
            info!("STRIPE_WEBHOOK_SECRET not configured, skipping webhook processing");
            return Ok(WebhookOutcome::Skipped);
        };

        let header = signature.ok_or(WebhookError::MissingSignature)?;
        let parts = parse_signature_header(header)?;

        if now.abs_diff(parts.timestamp) > self.tolerance_secs.unsigned_abs() {
            warn!(timestamp = parts.timestamp, now, "Webhook timestamp outside tolerance");
            return Err(WebhookError::TimestampOutOfTolerance);
        }

        let expected = signature_bytes(secret, parts.timestamp, payload)?;
        let matched = parts.signatures.iter().any(|candidate| {
            hex::decode(candidate)
                .map(|provided| expected.as_slice().ct_eq(provided.as_slice()).unwrap_u8() == 1)
                .unwrap_or(false)
        });
        if !matched {
            warn!("Webhook signature mismatch");
            return Err(WebhookError::SignatureMismatch);
        }

        let event: WebhookEvent = serde_json::from_slice(payload).map_err(|e| {
            warn!(error = %e, "Failed to parse webhook payload");
            WebhookError::InvalidPayload("malformed JSON payload".to_string())
        })?;

        info!(event_id = %event.id, event_type = %event.event_type, "Stripe webhook received");
        Ok(WebhookOutcome::Verified(event))
    }
}

/// Compute the `v1` signature for a payload, hex encoded.
///
/// Used by senders and tests to produce a header the verifier accepts.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> Result<String, WebhookError> {
    signature_bytes(secret, timestamp, payload).map(hex::encode)
}

fn signature_bytes(secret: &str, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| WebhookError::MalformedHeader("unusable signing secret".to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    Ok(mac.finalize().into_bytes().to_vec())
}

struct SignatureParts {
    timestamp: i64,
    signatures: Vec<String>,
}

fn parse_signature_header(header: &str) -> Result<SignatureParts, WebhookError> {
    let mut timestamp = None;
    let mut signatures = Vec::new();

    for part in header.split(',') {
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| WebhookError::MalformedHeader("expected key=value pairs".to_string()))?;

        match key.trim() {
            "t" => timestamp = value.trim().parse().ok(),
            "v1" => signatures.push(value.trim().to_string()),
            _ => {} // other schemes
        }
    }

    let timestamp =
        timestamp.ok_or_else(|| WebhookError::MalformedHeader("missing timestamp".to_string()))?;
    if signatures.is_empty() {
        return Err(WebhookError::MalformedHeader("missing v1 signature".to_string()));
    }

    Ok(SignatureParts { timestamp, signatures })
}
