//! Subscription tier catalog and recommendation.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use manna_pricing::{
    FeatureRequest, RecommendationRule, SubscriptionTier, TierCatalog, TierDraft,
};
use manna_store::{Storage, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult, Entity};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/subscription-tiers", get(list_tiers).post(create_tier))
        .route("/api/subscription-tiers/recommend", post(recommend_tier))
        .route("/api/subscription-tiers/{id}", get(get_tier))
}

/// Load the catalog, treating an empty one as unavailable.
pub(crate) async fn load_catalog(state: &AppState) -> ApiResult<TierCatalog> {
    let catalog = TierCatalog::new(state.store.list_subscription_tiers().await?);
    if catalog.is_empty() {
        return Err(ApiError::CatalogUnavailable);
    }
    Ok(catalog)
}

async fn list_tiers(State(state): State<AppState>) -> ApiResult<Json<Vec<SubscriptionTier>>> {
    let catalog = load_catalog(&state).await?;
    Ok(Json(catalog.into_tiers()))
}

async fn get_tier(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<SubscriptionTier>> {
    state
        .store
        .get_subscription_tier(id)
        .await?
        .map(Json)
        .ok_or_else(|| Entity::SubscriptionTier.not_found())
}

async fn create_tier(
    State(state): State<AppState>,
    ApiJson(draft): ApiJson<TierDraft>,
) -> ApiResult<(StatusCode, Json<SubscriptionTier>)> {
    if draft.name.trim().is_empty() {
        return Err(ApiError::invalid(
            "Invalid subscription tier data",
            ValidationError::new("").with_field_error("name", "must not be blank"),
        ));
    }

    // name and catalog checks run inside the store's insert
    let tier = state.store.create_subscription_tier(draft.author()?).await?;
    info!(tier_id = %tier.id, tier = %tier.name, price = %tier.final_price_per_month, "Subscription tier authored");
    Ok((StatusCode::CREATED, Json(tier)))
}

/// `POST /api/subscription-tiers/recommend` body.
#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    /// Feature ids; unknown ids are ignored.
    #[serde(default)]
    pub features: Vec<String>,
}

/// `POST /api/subscription-tiers/recommend` response.
#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub rule: RecommendationRule,
    pub tier: SubscriptionTier,
}

async fn recommend_tier(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RecommendRequest>,
) -> ApiResult<Json<RecommendResponse>> {
    let features = FeatureRequest::from_ids(&request.features);
    let catalog = load_catalog(&state).await?;

    let rule = RecommendationRule::classify(&features);
    let tier = catalog
        .recommend(&features)
        .cloned()
        .ok_or(ApiError::NoRecommendation)?;
    debug!(?rule, tier = %tier.name, "Tier recommended");

    Ok(Json(RecommendResponse { rule, tier }))
}
