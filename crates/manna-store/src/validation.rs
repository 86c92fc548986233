//! Boundary validation helpers
//!
//! Input structs derive [`validator::Validate`]; the helpers here turn the
//! derive's error tree into a [`ValidationError`] and supply the custom
//! checks the derive cannot express.

use rust_decimal::Decimal;
use std::borrow::Cow;
use validator::Validate;

use crate::error::ValidationError;

/// Validate an input struct, returning a typed error with per-field messages.
pub fn validate_input<T: Validate>(input: &T) -> Result<(), ValidationError> {
    input.validate().map_err(ValidationError::from)
}

/// Reject negative amounts (money, miles, gallons).
pub fn non_negative(value: &Decimal) -> Result<(), validator::ValidationError> {
    if *value < Decimal::ZERO {
        let mut error = validator::ValidationError::new("non_negative");
        error.message = Some(Cow::Borrowed("must not be negative"));
        return Err(error);
    }
    Ok(())
}

/// Reject strings that are empty after trimming.
pub fn not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut error = validator::ValidationError::new("not_blank");
        error.message = Some(Cow::Borrowed("must not be blank"));
        return Err(error);
    }
    Ok(())
}
