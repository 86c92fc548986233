//! End-to-end checks of the pricing and recommendation contract.
//!
//! Exercises the public API the way the onboarding flow uses it: fetch the
//! catalog, recommend from a feature set, read the stored price.

use manna_pricing::{
    compute_final_price, default_tiers, recommend, Decimal, FeatureId, FeatureRequest, PricingError,
    RecommendationRule, SubscriptionTier, TierCatalog, TierDraft,
};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn catalog() -> TierCatalog {
    TierCatalog::new(default_tiers().unwrap())
}

#[test]
fn test_stored_price_matches_rederived_price() {
    for tier in catalog().list_tiers() {
        let rederived = compute_final_price(tier.base_cost_per_month, tier.markup_percentage).unwrap();
        assert_eq!(rederived, tier.final_price_per_month, "tier {}", tier.name);
    }
}

#[test]
fn test_prices_non_decreasing_by_order() {
    let catalog = catalog();
    for pair in catalog.list_tiers().windows(2) {
        assert!(pair[0].order <= pair[1].order);
        assert!(pair[0].final_price_per_month <= pair[1].final_price_per_month);
    }
}

#[test]
fn test_recommendation_cascade() {
    let catalog = catalog();
    let cases: [(&[FeatureId], &str); 6] = [
        (&[FeatureId::Paperwork], "Enterprise"),
        (&[FeatureId::Maintenance], "Professional"),
        (&[FeatureId::Food], "Professional"),
        (&[FeatureId::Mileage, FeatureId::Fuel], "Basic"),
        (&[], "Basic"),
        (&[FeatureId::Paperwork, FeatureId::Mileage, FeatureId::Fuel], "Enterprise"),
    ];

    for (features, expected) in cases {
        let request = FeatureRequest::from_features(features.iter().copied());
        let tier = catalog.recommend(&request).unwrap();
        assert_eq!(tier.name, expected, "features {:?}", features);
    }
}

#[test]
fn test_recommendation_is_repeatable() {
    let catalog = catalog();
    let request = FeatureRequest::from_features([FeatureId::Maintenance, FeatureId::Mileage]);
    let picks: Vec<_> = (0..5).map(|_| catalog.recommend(&request).map(|t| t.id)).collect();
    assert!(picks.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_missing_enterprise_yields_absence() {
    let tiers: Vec<SubscriptionTier> = default_tiers()
        .unwrap()
        .into_iter()
        .filter(|t| t.name != "Enterprise")
        .collect();

    let request = FeatureRequest::from_features([FeatureId::Paperwork]);
    assert_eq!(RecommendationRule::classify(&request), RecommendationRule::PaperworkDominant);
    assert!(recommend(&request, &tiers).is_none());
}

#[test]
fn test_price_boundaries() {
    assert_eq!(compute_final_price(dec("0"), dec("300")).unwrap().to_string(), "0.00");
    assert_eq!(compute_final_price(dec("29"), dec("0")).unwrap().to_string(), "29.00");
    assert!(matches!(
        compute_final_price(dec("-0.01"), dec("300")),
        Err(PricingError::InvalidArgument(_))
    ));
}

#[test]
fn test_custom_catalog_recommendation() {
    let tiers = vec![
        TierDraft::new("Enterprise", dec("120"), 3).author().unwrap(),
        TierDraft::new("Basic", dec("10"), 1).with_markup(dec("50")).author().unwrap(),
    ];
    let catalog = TierCatalog::new(tiers);
    assert_eq!(catalog.list_tiers()[0].name, "Basic");
    assert_eq!(catalog.list_tiers()[0].final_price_per_month, dec("15.00"));

    // Professional is missing, so a mid-tier request has no answer.
    let request = FeatureRequest::from_features([FeatureId::Food]);
    assert!(catalog.recommend(&request).is_none());
}
