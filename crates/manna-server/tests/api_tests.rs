//! Router tests.
//!
//! Requests go through the full router with `tower::ServiceExt::oneshot`;
//! external providers are wiremock servers.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use manna_integrations::{compute_signature, IntegrationConfig};
use manna_server::{router, AppState, ServerConfig};
use manna_store::{seed_demo_data, DataStore, StoreConfig};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct TestApp {
    router: Router,
    store: DataStore,
}

impl TestApp {
    async fn seeded() -> Self {
        Self::with_config(true, IntegrationConfig::default()).await
    }

    async fn empty() -> Self {
        Self::with_config(false, IntegrationConfig::default()).await
    }

    async fn with_config(seed: bool, integrations: IntegrationConfig) -> Self {
        let store = DataStore::open(StoreConfig::default()).unwrap();
        if seed {
            seed_demo_data(&store).await.unwrap();
        }
        let state = AppState::new(store.clone(), ServerConfig::default(), &integrations).unwrap();
        Self {
            router: router(state),
            store,
        }
    }

    async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        self.dispatch(builder.body(body).unwrap()).await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn tier_id(&self, name: &str) -> String {
        let (_, tiers) = self.get("/api/subscription-tiers").await;
        tiers
            .as_array()
            .unwrap()
            .iter()
            .find(|t| t["name"] == name)
            .map(|t| t["id"].as_str().unwrap().to_string())
            .unwrap()
    }
}

fn onboarding(features: &[&str]) -> Value {
    json!({
        "companyName": "Red Line Hauling",
        "contactPerson": "Sam Ortiz",
        "email": "dispatch@redline.example",
        "fleetSize": 4,
        "operationType": "long-haul",
        "trackingFeatures": features,
    })
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let app = TestApp::seeded().await;
    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["billingConfigured"], false);
}

#[tokio::test]
async fn test_closed_store_is_unavailable() {
    let app = TestApp::seeded().await;
    app.store.close();

    let (status, body) = app.get("/api/projects").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "STORE_CLOSED");

    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "unhealthy");
}

// ============================================================================
// Subscription tiers
// ============================================================================

#[tokio::test]
async fn test_tiers_listed_in_order_with_prices() {
    let app = TestApp::seeded().await;
    let (status, body) = app.get("/api/subscription-tiers").await;

    assert_eq!(status, StatusCode::OK);
    let tiers = body.as_array().unwrap();
    let summary: Vec<(&str, &str, i64)> = tiers
        .iter()
        .map(|t| {
            (
                t["name"].as_str().unwrap(),
                t["finalPricePerMonth"].as_str().unwrap(),
                t["order"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Basic", "116.00", 1),
            ("Professional", "236.00", 2),
            ("Enterprise", "396.00", 3),
        ]
    );
}

#[tokio::test]
async fn test_empty_catalog_is_unavailable() {
    let app = TestApp::empty().await;

    let (status, body) = app.get("/api/subscription-tiers").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "CATALOG_UNAVAILABLE");

    let (status, _) = app
        .post("/api/subscription-tiers/recommend", json!({ "features": ["fuel"] }))
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_get_tier_by_id() {
    let app = TestApp::seeded().await;
    let id = app.tier_id("Professional").await;

    let (status, body) = app.get(&format!("/api/subscription-tiers/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["baseCostPerMonth"], "59.00");

    let (status, body) = app
        .get("/api/subscription-tiers/0192f0a4-1a2b-7c3d-8e4f-5a6b7c8d9e0f")
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Subscription tier not found");
}

#[tokio::test]
async fn test_recommendation_cascade() {
    let app = TestApp::seeded().await;
    let cases = [
        (json!(["paperwork"]), "Enterprise", "paperwork_dominant"),
        (json!(["maintenance"]), "Professional", "mid_tier_dominant"),
        (json!(["food"]), "Professional", "mid_tier_dominant"),
        (json!(["mileage", "fuel"]), "Basic", "basic_tier_dominant"),
        (json!([]), "Basic", "default"),
        (json!(["paperwork", "mileage", "fuel"]), "Enterprise", "paperwork_dominant"),
        (json!(["teleportation"]), "Basic", "default"),
    ];

    for (features, tier, rule) in cases {
        let (status, body) = app
            .post("/api/subscription-tiers/recommend", json!({ "features": features }))
            .await;
        assert_eq!(status, StatusCode::OK, "features {}", features);
        assert_eq!(body["tier"]["name"], tier, "features {}", features);
        assert_eq!(body["rule"], rule, "features {}", features);
    }
}

#[tokio::test]
async fn test_missing_tier_is_not_substituted() {
    let app = TestApp::empty().await;
    let (status, _) = app
        .post(
            "/api/subscription-tiers",
            json!({ "name": "Basic", "baseCostPerMonth": "29.00", "order": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app
        .post("/api/subscription-tiers/recommend", json!({ "features": ["paperwork"] }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NO_RECOMMENDATION");
}

#[tokio::test]
async fn test_tier_authoring_prices_and_checks_order() {
    let app = TestApp::seeded().await;

    let (status, body) = app
        .post(
            "/api/subscription-tiers",
            json!({
                "name": "Fleet",
                "description": "Multi-truck operations",
                "baseCostPerMonth": "149.00",
                "features": ["Everything in Enterprise", "Fleet dashboard"],
                "order": 4
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["markupPercentage"], "300");
    assert_eq!(body["finalPricePerMonth"], "596.00");

    let (status, body) = app
        .post(
            "/api/subscription-tiers",
            json!({ "name": "Starter", "baseCostPerMonth": "10.00", "order": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CATALOG_CONFLICT");

    let (status, body) = app
        .post(
            "/api/subscription-tiers",
            json!({ "name": "Fleet", "baseCostPerMonth": "199.00", "order": 7 }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "A tier named Fleet already exists");

    let (status, body) = app
        .post(
            "/api/subscription-tiers",
            json!({ "name": "Broken", "baseCostPerMonth": "-1", "order": 6 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

// ============================================================================
// Onboarding
// ============================================================================

#[tokio::test]
async fn test_onboarding_persists_recommended_tier() {
    let app = TestApp::seeded().await;
    let professional = app.tier_id("Professional").await;

    let (status, client) = app
        .post("/api/trucker-clients", onboarding(&["mileage", "maintenance"]))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(client["subscriptionTierId"], professional.as_str());
    assert_eq!(client["isActive"], true);
    assert!(client.get("trackingFeatures").is_none());

    let (status, fetched) = app
        .get(&format!("/api/trucker-clients/{}", client["id"].as_str().unwrap()))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["subscriptionTierId"], professional.as_str());
}

#[tokio::test]
async fn test_onboarding_with_explicit_tier() {
    let app = TestApp::seeded().await;
    let enterprise = app.tier_id("Enterprise").await;

    let mut body = onboarding(&["mileage"]);
    body["subscriptionTierId"] = json!(enterprise);
    let (status, client) = app.post("/api/trucker-clients", body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(client["subscriptionTierId"], enterprise.as_str());

    let mut body = onboarding(&[]);
    body["subscriptionTierId"] = json!("0192f0a4-1a2b-7c3d-8e4f-5a6b7c8d9e0f");
    let (status, body) = app.post("/api/trucker-clients", body).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Subscription tier not found");
}

#[tokio::test]
async fn test_onboarding_without_matching_tier_conflicts() {
    let app = TestApp::empty().await;
    app.post(
        "/api/subscription-tiers",
        json!({ "name": "Basic", "baseCostPerMonth": "29.00", "order": 1 }),
    )
    .await;

    let (status, body) = app
        .post("/api/trucker-clients", onboarding(&["paperwork"]))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "NO_RECOMMENDATION");

    let (_, clients) = app.get("/api/trucker-clients").await;
    assert!(clients.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_onboarding_validation() {
    let app = TestApp::seeded().await;
    let mut body = onboarding(&["fuel"]);
    body["companyName"] = json!("   ");
    body["email"] = json!("not-an-email");

    let (status, body) = app.post("/api/trucker-clients", body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["message"], "Invalid trucker client data");
    assert!(body["errors"]["companyName"].is_array());
    assert_eq!(body["errors"]["email"][0], "must be a valid email address");
}

// ============================================================================
// Consulting records
// ============================================================================

#[tokio::test]
async fn test_project_lifecycle() {
    let app = TestApp::seeded().await;

    let (_, projects) = app.get("/api/projects").await;
    assert_eq!(projects.as_array().unwrap().len(), 3);

    let (status, project) = app
        .post(
            "/api/projects",
            json!({
                "name": "Route Optimization",
                "client": "Red Line Hauling",
                "status": "Active",
                "progress": 10,
                "dueDate": "2025-09-01",
                "description": "Fuel-aware routing for regional lanes."
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let uri = format!("/api/projects/{}", project["id"].as_str().unwrap());

    let (status, patched) = app
        .send(Method::PATCH, &uri, Some(json!({ "status": "In Review", "progress": 95 })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(patched["status"], "In Review");
    assert_eq!(patched["name"], "Route Optimization");

    let (status, body) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted");

    let (status, body) = app.get(&uri).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Project not found");
}

#[tokio::test]
async fn test_contact_validation_errors_by_field() {
    let app = TestApp::seeded().await;
    let (status, body) = app
        .post("/api/contacts", json!({ "name": "", "email": "nope", "message": "Hello" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid contact data");
    assert!(body["errors"]["name"].is_array());
    assert!(body["errors"]["email"].is_array());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = TestApp::seeded().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/contacts")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let (status, body) = app.dispatch(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_invalid_id_is_bad_request() {
    let app = TestApp::seeded().await;
    let (status, body) = app.get("/api/projects/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "BAD_REQUEST");
}

// ============================================================================
// Expenses
// ============================================================================

#[tokio::test]
async fn test_expense_list_requires_client_filter() {
    let app = TestApp::seeded().await;
    let (status, body) = app.get("/api/fuel-expenses").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "truckerClientId query parameter is required");
}

#[tokio::test]
async fn test_fuel_expense_flow() {
    let app = TestApp::seeded().await;
    let (_, client) = app
        .post("/api/trucker-clients", onboarding(&["fuel"]))
        .await;
    let client_id = client["id"].as_str().unwrap().to_string();

    let (status, expense) = app
        .post(
            "/api/fuel-expenses",
            json!({
                "truckerClientId": client_id,
                "expenseDate": "2025-03-05",
                "gallons": "120.5",
                "costPerGallon": "3.899",
                "location": "Amarillo, TX"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(expense["totalCost"], "469.83");

    let (status, list) = app
        .get(&format!("/api/fuel-expenses?truckerClientId={}", client_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 1);

    let uri = format!("/api/fuel-expenses/{}", expense["id"].as_str().unwrap());
    let (status, body) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Fuel expense deleted");

    let (status, _) = app.send(Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_negative_miles_rejected() {
    let app = TestApp::seeded().await;
    let (status, body) = app
        .post(
            "/api/mileage-logs",
            json!({
                "truckerClientId": "0192f0a4-1a2b-7c3d-8e4f-5a6b7c8d9e0f",
                "logDate": "2025-03-05",
                "milesDriven": "-12"
            }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid mileage log data");
    assert_eq!(body["errors"]["milesDriven"][0], "must not be negative");
}

// ============================================================================
// Integrations
// ============================================================================

#[tokio::test]
async fn test_billing_unconfigured() {
    let app = TestApp::seeded().await;

    let (status, body) = app.get("/api/stripe/config").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "NOT_CONFIGURED");

    let (status, _) = app
        .post("/api/stripe/billing-portal", json!({ "email": "driver@example.com" }))
        .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_billing_portal_and_config() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/customers"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "id": "cus_1", "email": "driver@example.com" }]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/billing_portal/sessions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "bps_1",
            "url": "https://billing.example.com/p/bps_1"
        })))
        .mount(&server)
        .await;

    let mut integrations = IntegrationConfig::default();
    integrations.billing.base_url = server.uri();
    integrations.billing.publishable_key = Some("pk_test_123".to_string());
    integrations.billing.secret_key = Some("sk_test_456".to_string());
    let app = TestApp::with_config(true, integrations).await;

    let (status, body) = app.get("/api/stripe/config").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["publishableKey"], "pk_test_123");

    let (status, body) = app
        .post("/api/stripe/billing-portal", json!({ "email": "driver@example.com" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["url"], "https://billing.example.com/p/bps_1");

    let (status, body) = app
        .post("/api/stripe/billing-portal", json!({ "email": "nope" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["errors"]["email"].is_array());
}

#[tokio::test]
async fn test_webhook_without_secret_is_skipped() {
    let app = TestApp::seeded().await;
    let (status, body) = app
        .post("/api/stripe/webhook", json!({ "id": "evt_1", "type": "invoice.paid" }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed"], false);
}

#[tokio::test]
async fn test_webhook_signature_checked() {
    let mut integrations = IntegrationConfig::default();
    integrations.billing.webhook_secret = Some("whsec_test".to_string());
    let app = TestApp::with_config(true, integrations).await;

    let payload = r#"{"id":"evt_9","type":"customer.subscription.updated","data":{"object":{}}}"#;
    let timestamp = chrono::Utc::now().timestamp();
    let signature = compute_signature("whsec_test", timestamp, payload.as_bytes()).unwrap();

    let signed = |sig: String, body: &str| {
        Request::builder()
            .method(Method::POST)
            .uri("/api/stripe/webhook")
            .header("Stripe-Signature", sig)
            .body(Body::from(body.to_string()))
            .unwrap()
    };

    let (status, body) = app
        .dispatch(signed(format!("t={},v1={}", timestamp, signature), payload))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["processed"], true);

    let tampered = payload.replace("evt_9", "evt_10");
    let (status, body) = app
        .dispatch(signed(format!("t={},v1={}", timestamp, signature), &tampered))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "WEBHOOK_ERROR");
}

#[tokio::test]
async fn test_extract_document() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"vendor\":\"Waffle House\",\"amount\":\"18.45\",\"expenseType\":\"food\"}" }] }
            }]
        })))
        .mount(&server)
        .await;

    let mut integrations = IntegrationConfig::default();
    integrations.extraction.base_url = server.uri();
    let app = TestApp::with_config(true, integrations).await;

    let (status, body) = app
        .post("/api/extract-document", json!({ "imageBase64": "aGVsbG8=" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["extracted"]["vendor"], "Waffle House");
    assert_eq!(body["extracted"]["expenseType"], "food");
    assert_eq!(body["extracted"]["miles"], Value::Null);

    let (status, body) = app
        .post("/api/extract-document", json!({ "imageBase64": "" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Image data is required");
}

#[tokio::test]
async fn test_extraction_provider_failure_is_bad_gateway() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let mut integrations = IntegrationConfig::default();
    integrations.extraction.base_url = server.uri();
    let app = TestApp::with_config(true, integrations).await;

    let (status, body) = app
        .post("/api/extract-document", json!({ "imageBase64": "aGVsbG8=" }))
        .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["message"], "Failed to extract document information");
}
