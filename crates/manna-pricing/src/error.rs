//! Error types for pricing and catalog checks

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised while computing prices or authoring tiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PricingError {
    /// An input was negative, non-finite, or out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type for pricing operations.
pub type PricingResult<T> = Result<T, PricingError>;

/// A violation of the catalog invariants found in authored tier data.
///
/// These point at data-entry bugs in the seeded or admin-created tiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The stored final price does not match the price derived from cost and markup.
    #[error("Tier {tier}: stored price {stored} does not match derived price {derived}")]
    PriceMismatch {
        /// Tier name.
        tier: String,
        /// Price stored on the tier.
        stored: Decimal,
        /// Price recomputed from base cost and markup.
        derived: Decimal,
    },

    /// A tier with a lower display order costs more than the next tier.
    #[error("Tier {lower} (order {lower_order}) is priced above {higher} (order {higher_order})")]
    OrderingViolation {
        /// Name of the lower-order tier.
        lower: String,
        /// Display order of the lower tier.
        lower_order: i32,
        /// Name of the higher-order tier.
        higher: String,
        /// Display order of the higher tier.
        higher_order: i32,
    },

    /// The stored cost or markup cannot be priced at all.
    #[error("Tier {tier}: {source}")]
    Unpriceable {
        /// Tier name.
        tier: String,
        /// Underlying pricing error.
        #[source]
        source: PricingError,
    },
}
