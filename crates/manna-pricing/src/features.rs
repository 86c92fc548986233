//! Tracked-expense feature vocabulary
//!
//! The onboarding wizard lets a prospective client tick which expense
//! categories they want to track. Those raw ids are the input to the tier
//! recommender.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A trackable expense feature.
///
/// # Examples
///
/// ```
/// use manna_pricing::FeatureId;
///
/// assert_eq!(FeatureId::parse("Paperwork"), Some(FeatureId::Paperwork));
/// assert_eq!(FeatureId::parse("tolls"), None);
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum FeatureId {
    /// Daily miles driven
    Mileage,

    /// Fuel purchases
    Fuel,

    /// Repairs and maintenance
    Maintenance,

    /// Per diem and meals
    Food,

    /// Receipts and document storage
    Paperwork,
}

impl FeatureId {
    /// All features, in wizard display order.
    pub const ALL: [FeatureId; 5] = [
        FeatureId::Mileage,
        FeatureId::Fuel,
        FeatureId::Maintenance,
        FeatureId::Food,
        FeatureId::Paperwork,
    ];

    /// Parse a feature id (case-insensitive, surrounding whitespace ignored).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "mileage" => Some(FeatureId::Mileage),
            "fuel" => Some(FeatureId::Fuel),
            "maintenance" => Some(FeatureId::Maintenance),
            "food" => Some(FeatureId::Food),
            "paperwork" => Some(FeatureId::Paperwork),
            _ => None,
        }
    }

    /// Get string representation of the feature.
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureId::Mileage => "mileage",
            FeatureId::Fuel => "fuel",
            FeatureId::Maintenance => "maintenance",
            FeatureId::Food => "food",
            FeatureId::Paperwork => "paperwork",
        }
    }

    /// Get the wizard label for the feature.
    pub fn label(&self) -> &'static str {
        match self {
            FeatureId::Mileage => "Mileage Tracking",
            FeatureId::Fuel => "Fuel Expenses",
            FeatureId::Maintenance => "Maintenance Expenses",
            FeatureId::Food => "Food & Meal Expenses",
            FeatureId::Paperwork => "Paperwork Management",
        }
    }
}

/// The set of features a prospective client asked for.
///
/// Ephemeral: it is consumed by the recommender and never persisted.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct FeatureRequest {
    features: BTreeSet<FeatureId>,
}

impl FeatureRequest {
    /// Create an empty request.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a request from typed feature ids.
    pub fn from_features(features: impl IntoIterator<Item = FeatureId>) -> Self {
        Self {
            features: features.into_iter().collect(),
        }
    }

    /// Build a request from raw wizard ids.
    ///
    /// Unrecognized ids are dropped; they have no bearing on the recommendation.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            features: ids
                .into_iter()
                .filter_map(|id| FeatureId::parse(id.as_ref()))
                .collect(),
        }
    }

    /// Check whether a feature was requested.
    pub fn contains(&self, feature: FeatureId) -> bool {
        self.features.contains(&feature)
    }

    /// Check whether any of the given features was requested.
    pub fn contains_any(&self, features: &[FeatureId]) -> bool {
        features.iter().any(|f| self.features.contains(f))
    }

    /// Number of distinct features requested.
    pub fn len(&self) -> usize {
        self.features.len()
    }

    /// True when nothing was requested.
    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Iterate over the requested features in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = FeatureId> + '_ {
        self.features.iter().copied()
    }
}

impl FromIterator<FeatureId> for FeatureRequest {
    fn from_iter<T: IntoIterator<Item = FeatureId>>(iter: T) -> Self {
        Self::from_features(iter)
    }
}
