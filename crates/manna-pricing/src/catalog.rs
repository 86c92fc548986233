//! Tier catalog
//!
//! The catalog is the ordered, read-only view of the tiers fetched from the
//! data store. It never writes tiers.

use crate::error::CatalogError;
use crate::features::FeatureRequest;
use crate::recommend::recommend;
use crate::tier::SubscriptionTier;
use uuid::Uuid;

/// Tiers sorted by display order, cheapest first.
#[derive(Debug, Clone, Default)]
pub struct TierCatalog {
    tiers: Vec<SubscriptionTier>,
}

impl TierCatalog {
    /// Build a catalog, sorting tiers by `order` ascending.
    ///
    /// The sort is stable, so tiers sharing an order keep their input order.
    pub fn new(mut tiers: Vec<SubscriptionTier>) -> Self {
        tiers.sort_by_key(|t| t.order);
        Self { tiers }
    }

    /// All tiers, ordered by `order` ascending.
    ///
    /// An empty slice means the catalog was never provisioned; callers should
    /// surface a loading or error state rather than price anything.
    pub fn list_tiers(&self) -> &[SubscriptionTier] {
        &self.tiers
    }

    /// True when no tiers are available.
    pub fn is_empty(&self) -> bool {
        self.tiers.is_empty()
    }

    /// Number of tiers.
    pub fn len(&self) -> usize {
        self.tiers.len()
    }

    /// Find a tier by exact name.
    pub fn find_by_name(&self, name: &str) -> Option<&SubscriptionTier> {
        self.tiers.iter().find(|t| t.name == name)
    }

    /// Find a tier by id.
    pub fn find_by_id(&self, id: Uuid) -> Option<&SubscriptionTier> {
        self.tiers.iter().find(|t| t.id == id)
    }

    /// Recommend a tier for a feature request. See [`recommend`].
    pub fn recommend(&self, features: &FeatureRequest) -> Option<&SubscriptionTier> {
        recommend(features, &self.tiers)
    }

    /// Check the authored data against the pricing and ordering invariants.
    ///
    /// Every tier's stored final price must equal the price re-derived from
    /// its base cost and markup, and prices must not decrease with `order`.
    /// Returns the first violation found.
    pub fn verify(&self) -> Result<(), CatalogError> {
        for tier in &self.tiers {
            let derived = tier.derived_price().map_err(|source| CatalogError::Unpriceable {
                tier: tier.name.clone(),
                source,
            })?;
            if derived != tier.final_price_per_month {
                return Err(CatalogError::PriceMismatch {
                    tier: tier.name.clone(),
                    stored: tier.final_price_per_month,
                    derived,
                });
            }
        }

        for pair in self.tiers.windows(2) {
            let (lower, higher) = (&pair[0], &pair[1]);
            if lower.final_price_per_month > higher.final_price_per_month {
                return Err(CatalogError::OrderingViolation {
                    lower: lower.name.clone(),
                    lower_order: lower.order,
                    higher: higher.name.clone(),
                    higher_order: higher.order,
                });
            }
        }

        Ok(())
    }

    /// Consume the catalog, returning the ordered tiers.
    pub fn into_tiers(self) -> Vec<SubscriptionTier> {
        self.tiers
    }
}

impl From<Vec<SubscriptionTier>> for TierCatalog {
    fn from(tiers: Vec<SubscriptionTier>) -> Self {
        Self::new(tiers)
    }
}
