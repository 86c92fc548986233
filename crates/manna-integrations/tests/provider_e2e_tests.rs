//! End-to-end tests for the provider clients.
//!
//! wiremock stands in for the billing API and the extraction model so the
//! request shapes and response handling can be checked over real HTTP.

use manna_integrations::{
    BillingClient, BillingEndpoint, BillingError, ExpenseType, ExtractionClient,
    ExtractionEndpoint, ExtractionError, ExtractionRequest,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(5);

fn billing_client(server: &MockServer) -> BillingClient {
    BillingClient::new(
        BillingEndpoint {
            base_url: server.uri(),
            publishable_key: Some("pk_test_123".to_string()),
            secret_key: Some("sk_test_456".to_string()),
            webhook_secret: None,
        },
        TIMEOUT,
    )
    .unwrap()
}

fn extraction_client(server: &MockServer) -> ExtractionClient {
    ExtractionClient::new(
        ExtractionEndpoint {
            base_url: server.uri(),
            api_key: Some("gm_test".to_string()),
            model: "gemini-2.5-flash".to_string(),
        },
        TIMEOUT,
    )
    .unwrap()
}

fn model_reply(text: &str) -> serde_json::Value {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] }
        }]
    })
}

// ============================================================================
// Billing
// ============================================================================

#[tokio::test]
async fn test_portal_for_existing_customer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers"))
        .and(query_param("email", "driver@example.com"))
        .and(header("Authorization", "Bearer sk_test_456"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "object": "list",
            "data": [{ "id": "cus_existing", "email": "driver@example.com" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/billing_portal/sessions"))
        .and(body_string_contains("customer=cus_existing"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "bps_1",
            "url": "https://billing.example.com/session/bps_1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/customers"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let session = billing_client(&server)
        .open_billing_portal("driver@example.com", "http://localhost:5000/settings")
        .await
        .unwrap();

    assert_eq!(session.url, "https://billing.example.com/session/bps_1");
}

#[tokio::test]
async fn test_portal_creates_customer_on_first_use() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": [] })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/customers"))
        .and(body_string_contains("email=new%40example.com"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "cus_new",
            "email": "new@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/billing_portal/sessions"))
        .and(body_string_contains("customer=cus_new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "bps_2",
            "url": "https://billing.example.com/session/bps_2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let session = billing_client(&server)
        .open_billing_portal("new@example.com", "http://localhost:5000/settings")
        .await
        .unwrap();

    assert_eq!(session.id, "bps_2");
}

#[tokio::test]
async fn test_provider_error_message_is_surfaced() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/billing_portal/sessions"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "message": "No configuration provided", "type": "invalid_request_error" }
        })))
        .mount(&server)
        .await;

    let err = billing_client(&server)
        .create_portal_session("cus_1", "http://localhost")
        .await
        .unwrap_err();

    match err {
        BillingError::ApiError { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "No configuration provided");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_rejected_key_is_authentication_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = billing_client(&server)
        .find_customer_by_email("a@b.co")
        .await
        .unwrap_err();
    assert!(matches!(err, BillingError::AuthenticationFailed));
}

// ============================================================================
// Extraction
// ============================================================================

#[tokio::test]
async fn test_extraction_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(header("x-goog-api-key", "gm_test"))
        .and(body_string_contains("\"mimeType\":\"image/jpeg\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(model_reply(
            "```json\n{\"date\":\"2025-02-03\",\"amount\":\"87.40\",\"vendor\":\"Pilot\",\"description\":\"Diesel\",\"gallons\":\"22.5\",\"pricePerGallon\":\"3.884\",\"miles\":null,\"expenseType\":\"fuel\"}\n```",
        )))
        .expect(1)
        .mount(&server)
        .await;

    let outcome = extraction_client(&server)
        .extract(ExtractionRequest {
            image_base64: "aGVsbG8gcmVjZWlwdA==".to_string(),
            mime_type: None,
        })
        .await
        .unwrap();

    assert_eq!(outcome.extracted.vendor.as_deref(), Some("Pilot"));
    assert_eq!(outcome.extracted.expense_type, Some(ExpenseType::Fuel));
    assert!(outcome.raw_response.starts_with("```json"));
}

#[tokio::test]
async fn test_unparseable_reply_yields_empty_record() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(model_reply("Sorry, the image is too blurry.")),
        )
        .mount(&server)
        .await;

    let outcome = extraction_client(&server)
        .extract(ExtractionRequest {
            image_base64: "aGVsbG8=".to_string(),
            mime_type: Some("image/png".to_string()),
        })
        .await
        .unwrap();

    assert!(outcome.extracted.is_empty());
    assert_eq!(outcome.raw_response, "Sorry, the image is too blurry.");
}

#[tokio::test]
async fn test_model_failure_is_not_retried() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let err = extraction_client(&server)
        .extract(ExtractionRequest {
            image_base64: "aGVsbG8=".to_string(),
            mime_type: None,
        })
        .await
        .unwrap_err();

    match err {
        ExtractionError::ApiError { status, message } => {
            assert_eq!(status, 503);
            assert_eq!(message, "overloaded");
        }
        other => panic!("expected API error, got {:?}", other),
    }
}
