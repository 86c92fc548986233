//! # Manna Pricing
//!
//! Subscription tier pricing and plan recommendation for the trucker expense
//! tracking product.
//!
//! ## Overview
//!
//! The manna-pricing crate handles:
//! - **Tiers**: The subscription tier record and its authoring step
//! - **Pricing**: Markup-based final price calculation
//! - **Features**: The tracked-expense feature vocabulary
//! - **Recommendation**: Mapping a feature request to a tier
//! - **Catalog**: The ordered list of tiers with invariant checks
//!
//! ## Flow
//!
//! ```text
//! onboarding wizard ─→ FeatureRequest ─┐
//!                                      ├─→ recommend() ─→ SubscriptionTier
//! data store ─────────→ TierCatalog ───┘                        │
//!                                                   final_price_per_month
//! ```
//!
//! Everything in this crate is pure and synchronous; callers fetch the tiers
//! and persist the chosen tier id themselves.
//!
//! ## Usage
//!
//! ```rust
//! use manna_pricing::{default_tiers, FeatureId, FeatureRequest, TierCatalog};
//!
//! let catalog = TierCatalog::new(default_tiers().unwrap());
//! let request = FeatureRequest::from_features([FeatureId::Mileage, FeatureId::Food]);
//!
//! let tier = catalog.recommend(&request).unwrap();
//! assert_eq!(tier.name, "Professional");
//! assert_eq!(tier.final_price_per_month.to_string(), "236.00");
//! ```

pub mod catalog;
pub mod error;
pub mod features;
pub mod price;
pub mod recommend;
pub mod tier;

pub use catalog::TierCatalog;
pub use error::{CatalogError, PricingError, PricingResult};
pub use features::{FeatureId, FeatureRequest};
pub use price::{compute_final_price, compute_final_price_f64, DEFAULT_MARKUP_PERCENTAGE};
pub use recommend::{recommend, RecommendationRule};
pub use tier::{default_tiers, SubscriptionTier, TierDraft, TierName};

pub use rust_decimal::Decimal;
