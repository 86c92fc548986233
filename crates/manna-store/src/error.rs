//! Error types for storage operations

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

/// Storage error types.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Input failed boundary validation
    #[error("{0}")]
    Validation(#[from] ValidationError),

    /// The data store was closed and no longer accepts operations
    #[error("Data store is closed")]
    Closed,

    /// The configured backend is not available in this build
    #[error("Unsupported storage backend: {0}")]
    UnsupportedBackend(String),

    /// The backend failed
    #[error("Storage backend error: {0}")]
    Backend(String),

    /// Seed pricing could not be authored
    #[error("Pricing error: {0}")]
    Pricing(#[from] manna_pricing::PricingError),

    /// A tier with this name is already stored
    #[error("A tier named {0} already exists")]
    DuplicateTier(String),

    /// Storing the tier would break catalog pricing or ordering
    #[error("{0}")]
    Catalog(#[from] manna_pricing::CatalogError),
}

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

impl StoreError {
    /// Check if this error should be logged at error level.
    ///
    /// Validation failures and tier conflicts are caller mistakes and are expected.
    pub fn is_server_error(&self) -> bool {
        !matches!(
            self,
            StoreError::Validation(_) | StoreError::DuplicateTier(_) | StoreError::Catalog(_)
        )
    }
}

/// A request body that failed validation, with messages grouped by field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct ValidationError {
    /// Summary message
    pub message: String,

    /// Field name to list of problems
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl ValidationError {
    /// Create a validation error with no field details.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            field_errors: BTreeMap::new(),
        }
    }

    /// Attach a problem to a field.
    pub fn with_field_error(mut self, field: impl Into<String>, error: impl Into<String>) -> Self {
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(error.into());
        self
    }

    /// True if no field carries an error.
    pub fn is_empty(&self) -> bool {
        self.field_errors.is_empty()
    }
}

impl From<validator::ValidationErrors> for ValidationError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut out = ValidationError::new("Invalid request data");
        for (field, problems) in errors.field_errors() {
            for problem in problems {
                let message = problem
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| problem.code.to_string());
                out = out.with_field_error(camel_case(&field), message);
            }
        }
        out
    }
}

/// Field names are reported the way they appear on the wire.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for ch in field.chars() {
        if ch == '_' {
            upper = true;
        } else if upper {
            out.extend(ch.to_uppercase());
            upper = false;
        } else {
            out.push(ch);
        }
    }
    out
}
