//! Tier recommendation
//!
//! Maps the features a prospective client asked for to the tier that should
//! be offered. This is a fixed priority cascade keyed by tier name, not a
//! cheapest-superset search: any higher-tier feature in the request decides
//! the outcome, whatever lower-tier features come with it.

use serde::{Deserialize, Serialize};

use crate::features::{FeatureId, FeatureRequest};
use crate::tier::{SubscriptionTier, TierName};

/// The cascade rule that decided a recommendation.
///
/// Rules are evaluated top-down and the first match wins:
///
/// | Rule | Trigger | Tier |
/// |---|---|---|
/// | `PaperworkDominant` | `paperwork` | Enterprise |
/// | `MidTierDominant` | `maintenance` or `food` | Professional |
/// | `BasicTierDominant` | `mileage` or `fuel` | Basic |
/// | `Default` | anything else | Basic |
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationRule {
    /// Paperwork management requested
    PaperworkDominant,

    /// Maintenance or food tracking requested, no paperwork
    MidTierDominant,

    /// Only mileage or fuel tracking requested
    BasicTierDominant,

    /// Empty or unrecognized request
    Default,
}

impl RecommendationRule {
    /// Select the rule that applies to a request.
    pub fn classify(features: &FeatureRequest) -> Self {
        if features.contains(FeatureId::Paperwork) {
            RecommendationRule::PaperworkDominant
        } else if features.contains_any(&[FeatureId::Maintenance, FeatureId::Food]) {
            RecommendationRule::MidTierDominant
        } else if features.contains_any(&[FeatureId::Mileage, FeatureId::Fuel]) {
            RecommendationRule::BasicTierDominant
        } else {
            RecommendationRule::Default
        }
    }

    /// The tier this rule points at.
    pub fn required_tier(&self) -> TierName {
        match self {
            RecommendationRule::PaperworkDominant => TierName::Enterprise,
            RecommendationRule::MidTierDominant => TierName::Professional,
            RecommendationRule::BasicTierDominant | RecommendationRule::Default => TierName::Basic,
        }
    }
}

/// Recommend a tier for a feature request.
///
/// The tier is looked up in `catalog` by exact name. If the catalog has no
/// tier with the required name the result is `None`; no other tier is
/// substituted, since that would quote the wrong price.
///
/// # Examples
///
/// ```
/// use manna_pricing::{default_tiers, recommend, FeatureRequest};
///
/// let tiers = default_tiers().unwrap();
/// let request = FeatureRequest::from_ids(["paperwork", "mileage"]);
/// assert_eq!(recommend(&request, &tiers).unwrap().name, "Enterprise");
/// ```
pub fn recommend<'a>(features: &FeatureRequest, catalog: &'a [SubscriptionTier]) -> Option<&'a SubscriptionTier> {
    let wanted = RecommendationRule::classify(features).required_tier();
    catalog.iter().find(|tier| tier.name == wanted.as_str())
}
