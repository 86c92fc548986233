//! API error types
//!
//! Every handler returns [`ApiResult`]. Errors render as
//! `{ "message": ..., "code": ..., "errors"?: {field: [..]} }` with the
//! status from [`ApiError::status_code`].

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use manna_integrations::{BillingError, ExtractionError, WebhookError};
use manna_pricing::PricingError;
use manna_store::{StoreError, ValidationError};
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, error, warn};

/// API error types.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request body failed validation
    #[error("{message}")]
    Validation {
        message: String,
        errors: BTreeMap<String, Vec<String>>,
    },

    /// Request could not be read
    #[error("{0}")]
    BadRequest(String),

    /// Record does not exist
    #[error("{0}")]
    NotFound(String),

    /// The cascade picked a tier the catalog does not carry
    #[error("No subscription tier matches the requested features")]
    NoRecommendation,

    /// Onboarding could not resolve a tier for the client
    #[error("No subscription tier matches the requested features")]
    UnresolvedTier,

    /// A new tier would break catalog pricing or ordering
    #[error("{0}")]
    CatalogConflict(String),

    /// The tier catalog is empty
    #[error("Subscription tiers are not available yet")]
    CatalogUnavailable,

    /// Data store is closed
    #[error("Data store is closed")]
    StoreClosed,

    /// An integration has no credentials
    #[error("{0}")]
    NotConfigured(String),

    /// An external provider failed
    #[error("{message}")]
    Upstream { message: String, detail: String },

    /// Webhook failed verification
    #[error("Webhook error: {0}")]
    Webhook(String),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    /// Check if this error should be logged at error level.
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation { .. } | ApiError::BadRequest(_) | ApiError::Webhook(_) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::NotFound(_) | ApiError::NoRecommendation => StatusCode::NOT_FOUND,
            ApiError::UnresolvedTier | ApiError::CatalogConflict(_) => StatusCode::CONFLICT,
            ApiError::CatalogUnavailable | ApiError::StoreClosed | ApiError::NotConfigured(_) => {
                StatusCode::SERVICE_UNAVAILABLE
            }
            ApiError::Upstream { .. } => StatusCode::BAD_GATEWAY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation { .. } => "VALIDATION_ERROR",
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::NoRecommendation | ApiError::UnresolvedTier => "NO_RECOMMENDATION",
            ApiError::CatalogConflict(_) => "CATALOG_CONFLICT",
            ApiError::CatalogUnavailable => "CATALOG_UNAVAILABLE",
            ApiError::StoreClosed => "STORE_CLOSED",
            ApiError::NotConfigured(_) => "NOT_CONFIGURED",
            ApiError::Upstream { .. } => "UPSTREAM_ERROR",
            ApiError::Webhook(_) => "WEBHOOK_ERROR",
            ApiError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Build a validation error from a typed one, replacing its summary.
    pub fn invalid(message: impl Into<String>, error: ValidationError) -> Self {
        ApiError::Validation {
            message: message.into(),
            errors: error.field_errors,
        }
    }

    /// Map a store failure, naming the entity in validation messages.
    pub fn from_store(error: StoreError, entity: Entity) -> Self {
        match error {
            StoreError::Validation(v) => ApiError::invalid(entity.invalid_message(), v),
            other => other.into(),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Validation(v) => ApiError::Validation {
                message: v.message,
                errors: v.field_errors,
            },
            StoreError::Closed => ApiError::StoreClosed,
            StoreError::DuplicateTier(_) | StoreError::Catalog(_) => {
                ApiError::CatalogConflict(error.to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::Validation {
            message: error.message,
            errors: error.field_errors,
        }
    }
}

impl From<PricingError> for ApiError {
    fn from(error: PricingError) -> Self {
        ApiError::BadRequest(error.to_string())
    }
}

impl From<BillingError> for ApiError {
    fn from(error: BillingError) -> Self {
        match error {
            BillingError::NotConfigured(e) => ApiError::NotConfigured(e.to_string()),
            other => ApiError::Upstream {
                message: "Failed to open billing portal".to_string(),
                detail: other.to_string(),
            },
        }
    }
}

impl From<ExtractionError> for ApiError {
    fn from(error: ExtractionError) -> Self {
        if error.is_client_error() {
            return ApiError::BadRequest(error.to_string());
        }
        ApiError::Upstream {
            message: "Failed to extract document information".to_string(),
            detail: error.to_string(),
        }
    }
}

impl From<WebhookError> for ApiError {
    fn from(error: WebhookError) -> Self {
        ApiError::Webhook(error.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<BTreeMap<String, Vec<String>>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.error_code();

        match &self {
            ApiError::Upstream { detail, .. } => error!(code, detail = %detail, "Upstream provider failed"),
            ApiError::Internal(detail) => error!(code, detail = %detail, "Request failed"),
            e if e.is_server_error() => warn!(code, error = %e, "Request failed"),
            e => debug!(code, error = %e, "Request rejected"),
        }

        let (message, errors) = match self {
            ApiError::Validation { message, errors } => (message, Some(errors)),
            ApiError::Internal(_) => ("Internal server error".to_string(), None),
            other => (other.to_string(), None),
        };

        (status, Json(ErrorBody { message, code, errors })).into_response()
    }
}

/// Records exposed over REST, for messages that name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Project,
    Contact,
    DemoRequest,
    SubscriptionTier,
    TruckerClient,
    MileageLog,
    FuelExpense,
    MaintenanceExpense,
    FoodExpense,
    PaperworkDocument,
}

impl Entity {
    /// Display label, capitalized.
    pub fn label(&self) -> &'static str {
        match self {
            Entity::Project => "Project",
            Entity::Contact => "Contact",
            Entity::DemoRequest => "Demo request",
            Entity::SubscriptionTier => "Subscription tier",
            Entity::TruckerClient => "Trucker client",
            Entity::MileageLog => "Mileage log",
            Entity::FuelExpense => "Fuel expense",
            Entity::MaintenanceExpense => "Maintenance expense",
            Entity::FoodExpense => "Food expense",
            Entity::PaperworkDocument => "Paperwork document",
        }
    }

    /// 404 for this entity.
    pub fn not_found(&self) -> ApiError {
        ApiError::NotFound(format!("{} not found", self.label()))
    }

    /// Body returned after a successful delete.
    pub fn deleted(&self) -> Json<serde_json::Value> {
        Json(serde_json::json!({ "message": format!("{} deleted", self.label()) }))
    }

    fn invalid_message(&self) -> String {
        format!("Invalid {} data", self.label().to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Entity::Project.not_found().status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::UnresolvedTier.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::CatalogUnavailable.status_code(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(ApiError::CatalogUnavailable.error_code(), "CATALOG_UNAVAILABLE");
        assert_eq!(ApiError::StoreClosed.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_store_validation_names_entity() {
        let err = ApiError::from_store(
            StoreError::Validation(ValidationError::new("Invalid request data").with_field_error("email", "bad")),
            Entity::DemoRequest,
        );
        match err {
            ApiError::Validation { message, errors } => {
                assert_eq!(message, "Invalid demo request data");
                assert_eq!(errors["email"], vec!["bad".to_string()]);
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_tier_conflicts_from_store() {
        let err: ApiError = StoreError::DuplicateTier("Fleet".to_string()).into();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "CATALOG_CONFLICT");
        assert_eq!(err.to_string(), "A tier named Fleet already exists");
    }

    #[test]
    fn test_client_extraction_errors_are_bad_requests() {
        let err: ApiError = ExtractionError::MissingImage.into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Image data is required");
    }

    #[test]
    fn test_missing_keys_are_unavailable() {
        let err: ApiError = BillingError::NotConfigured(manna_integrations::ConfigError::MissingEnvVar(
            "STRIPE_API_SECRET_KEY".to_string(),
        ))
        .into();
        assert_eq!(err.status_code(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
