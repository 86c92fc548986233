//! Markup-based price calculation
//!
//! A tier's customer-facing monthly price is its base cost plus a percentage
//! markup, rounded to cents. The price is computed once when a tier is
//! authored and stored on the tier; the same function re-derives it when the
//! catalog is verified, so both paths must agree to the cent.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::{PricingError, PricingResult};

/// Markup applied to every seeded tier, in percent.
pub const DEFAULT_MARKUP_PERCENTAGE: Decimal = Decimal::from_parts(300, 0, 0, false, 0);

/// Compute the final monthly price from a base cost and a markup percentage.
///
/// The result is `base_cost * (1 + markup_percentage / 100)` rounded to two
/// decimal places, half-up.
///
/// # Errors
///
/// Returns [`PricingError::InvalidArgument`] if either input is negative or
/// the result does not fit in a `Decimal`.
///
/// # Examples
///
/// ```
/// use manna_pricing::{compute_final_price, Decimal};
///
/// let price = compute_final_price(Decimal::new(2900, 2), Decimal::from(300)).unwrap();
/// assert_eq!(price.to_string(), "116.00");
/// ```
pub fn compute_final_price(base_cost: Decimal, markup_percentage: Decimal) -> PricingResult<Decimal> {
    if base_cost < Decimal::ZERO {
        return Err(PricingError::InvalidArgument(format!(
            "base cost must not be negative, got {}",
            base_cost
        )));
    }
    if markup_percentage < Decimal::ZERO {
        return Err(PricingError::InvalidArgument(format!(
            "markup percentage must not be negative, got {}",
            markup_percentage
        )));
    }

    let multiplier = markup_percentage
        .checked_div(Decimal::ONE_HUNDRED)
        .and_then(|ratio| ratio.checked_add(Decimal::ONE))
        .ok_or_else(|| PricingError::InvalidArgument("markup percentage out of range".to_string()))?;

    let raw = base_cost
        .checked_mul(multiplier)
        .ok_or_else(|| PricingError::InvalidArgument("price out of range".to_string()))?;

    // Inputs are non-negative here, so away-from-zero is half-up.
    let mut price = raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    price.rescale(2);
    Ok(price)
}

/// Floating-point entry point for [`compute_final_price`].
///
/// # Errors
///
/// Returns [`PricingError::InvalidArgument`] for NaN, infinite, or negative
/// inputs.
pub fn compute_final_price_f64(base_cost: f64, markup_percentage: f64) -> PricingResult<Decimal> {
    compute_final_price(to_decimal("base cost", base_cost)?, to_decimal("markup percentage", markup_percentage)?)
}

fn to_decimal(field: &str, value: f64) -> PricingResult<Decimal> {
    if !value.is_finite() {
        return Err(PricingError::InvalidArgument(format!("{} must be finite, got {}", field, value)));
    }
    Decimal::try_from(value)
        .map_err(|e| PricingError::InvalidArgument(format!("{} is not representable: {}", field, e)))
}
