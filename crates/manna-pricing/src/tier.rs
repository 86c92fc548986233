//! Subscription tiers
//!
//! This module defines the subscription tier record offered by the trucker
//! expense tracker and the authoring step that prices a new tier.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PricingResult;
use crate::price::{compute_final_price, DEFAULT_MARKUP_PERCENTAGE};

/// The well-known tier names.
///
/// Tier names double as rank keys: the recommender looks tiers up by these
/// exact strings.
///
/// # Examples
///
/// ```
/// use manna_pricing::TierName;
///
/// assert_eq!(TierName::parse("professional"), Some(TierName::Professional));
/// assert!(TierName::Enterprise > TierName::Basic);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TierName {
    /// Mileage and fuel tracking
    Basic,

    /// Adds maintenance and food tracking
    Professional,

    /// Adds paperwork management
    Enterprise,
}

impl TierName {
    /// Parse tier name (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Some(TierName::Basic),
            "professional" | "pro" => Some(TierName::Professional),
            "enterprise" => Some(TierName::Enterprise),
            _ => None,
        }
    }

    /// The exact name stored on the tier record.
    pub fn as_str(&self) -> &'static str {
        match self {
            TierName::Basic => "Basic",
            TierName::Professional => "Professional",
            TierName::Enterprise => "Enterprise",
        }
    }
}

impl std::fmt::Display for TierName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A subscription plan as persisted and served to the pricing page.
///
/// `final_price_per_month` is fixed when the tier is authored (see
/// [`TierDraft::author`]) and is never recomputed on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionTier {
    /// Unique identifier for the tier
    pub id: Uuid,

    /// Tier name, e.g. "Basic"
    pub name: String,

    /// Marketing description
    pub description: String,

    /// Provider's internal monthly cost
    pub base_cost_per_month: Decimal,

    /// Markup applied on top of the base cost, in percent
    pub markup_percentage: Decimal,

    /// Customer-facing monthly price
    pub final_price_per_month: Decimal,

    /// Human-readable feature descriptions, in display order
    pub features: Vec<String>,

    /// Display rank; lower is cheaper
    pub order: i32,
}

impl SubscriptionTier {
    /// The well-known name of this tier, if it has one.
    pub fn tier_name(&self) -> Option<TierName> {
        TierName::parse(&self.name)
    }

    /// Re-derive the final price from the stored cost basis.
    pub fn derived_price(&self) -> PricingResult<Decimal> {
        compute_final_price(self.base_cost_per_month, self.markup_percentage)
    }
}

/// Input for authoring a new tier.
///
/// # Examples
///
/// ```
/// use manna_pricing::{Decimal, TierDraft};
///
/// let tier = TierDraft::new("Basic", Decimal::new(2900, 2), 1)
///     .with_description("Essential expense tracking for truckers")
///     .with_features(["Mileage tracking", "Fuel expense logs"])
///     .author()
///     .unwrap();
/// assert_eq!(tier.final_price_per_month, Decimal::new(11600, 2));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TierDraft {
    /// Tier name
    pub name: String,

    /// Marketing description
    #[serde(default)]
    pub description: String,

    /// Provider's internal monthly cost
    pub base_cost_per_month: Decimal,

    /// Markup in percent (defaults to 300)
    #[serde(default = "default_markup")]
    pub markup_percentage: Decimal,

    /// Feature descriptions
    #[serde(default)]
    pub features: Vec<String>,

    /// Display rank
    pub order: i32,
}

fn default_markup() -> Decimal {
    DEFAULT_MARKUP_PERCENTAGE
}

impl TierDraft {
    /// Start a draft with the default markup and no features.
    pub fn new(name: impl Into<String>, base_cost_per_month: Decimal, order: i32) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            base_cost_per_month,
            markup_percentage: DEFAULT_MARKUP_PERCENTAGE,
            features: Vec::new(),
            order,
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Override the markup percentage.
    pub fn with_markup(mut self, markup_percentage: Decimal) -> Self {
        self.markup_percentage = markup_percentage;
        self
    }

    /// Set the feature descriptions.
    pub fn with_features<I, S>(mut self, features: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.features = features.into_iter().map(Into::into).collect();
        self
    }

    /// Price the draft and produce a tier with a fresh id.
    ///
    /// # Errors
    ///
    /// Fails with `InvalidArgument` when the cost or markup is negative.
    pub fn author(self) -> PricingResult<SubscriptionTier> {
        let final_price_per_month = compute_final_price(self.base_cost_per_month, self.markup_percentage)?;
        Ok(SubscriptionTier {
            id: Uuid::now_v7(),
            name: self.name,
            description: self.description,
            base_cost_per_month: self.base_cost_per_month,
            markup_percentage: self.markup_percentage,
            final_price_per_month,
            features: self.features,
            order: self.order,
        })
    }
}

/// The three tiers the product launches with.
///
/// Basic $29 → $116, Professional $59 → $236, Enterprise $99 → $396, all at
/// a 300% markup.
pub fn default_tiers() -> PricingResult<Vec<SubscriptionTier>> {
    let drafts = [
        TierDraft::new(TierName::Basic.as_str(), Decimal::new(2900, 2), 1)
            .with_description("Essential expense tracking for truckers")
            .with_features(["Mileage tracking", "Fuel expense logs", "Basic reporting"]),
        TierDraft::new(TierName::Professional.as_str(), Decimal::new(5900, 2), 2)
            .with_description("Comprehensive expense management")
            .with_features([
                "Mileage tracking",
                "Fuel expense logs",
                "Maintenance tracking",
                "Food/meal expenses",
                "Advanced reporting",
                "Monthly summaries",
            ]),
        TierDraft::new(TierName::Enterprise.as_str(), Decimal::new(9900, 2), 3)
            .with_description("Complete solution with documentation")
            .with_features([
                "Mileage tracking",
                "Fuel expense logs",
                "Maintenance tracking",
                "Food/meal expenses",
                "Paperwork/documentation",
                "Advanced reporting",
                "Monthly summaries",
                "Priority support",
                "Custom integrations",
            ]),
    ];

    drafts.into_iter().map(TierDraft::author).collect()
}
