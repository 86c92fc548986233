//! Trucker clients and onboarding.
//!
//! Onboarding creates the client record. When the wizard does not name a
//! tier, the recommender picks one from the requested tracking features; the
//! features themselves are not stored.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::NaiveDate;
use manna_pricing::{FeatureRequest, RecommendationRule};
use manna_store::validation::not_blank;
use manna_store::{validate_input, NewTruckerClient, Storage, TruckerClient, TruckerClientPatch};
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::error::{ApiError, ApiResult, Entity};
use crate::extract::{ApiJson, ApiPath};
use crate::routes::tiers::load_catalog;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/trucker-clients", get(list_clients).post(onboard_client))
        .route("/api/trucker-clients/{id}", get(get_client).patch(update_client))
}

/// Onboarding wizard payload.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingRequest {
    #[validate(custom(function = "not_blank"))]
    pub company_name: String,

    pub contact_person: Option<String>,

    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    pub phone: Option<String>,

    pub address: Option<String>,

    pub fleet_size: Option<u32>,

    pub operation_type: Option<String>,

    /// Feature ids picked in the wizard; unknown ids are ignored.
    #[serde(default)]
    pub tracking_features: Vec<String>,

    /// Explicit tier choice; skips the recommender.
    pub subscription_tier_id: Option<Uuid>,

    pub subscription_start_date: Option<NaiveDate>,
}

impl OnboardingRequest {
    fn into_client(self, subscription_tier_id: Uuid) -> NewTruckerClient {
        NewTruckerClient {
            company_name: self.company_name,
            contact_person: self.contact_person,
            email: self.email,
            phone: self.phone,
            address: self.address,
            subscription_tier_id,
            subscription_start_date: self.subscription_start_date,
            is_active: None,
        }
    }
}

async fn ensure_tier_exists(state: &AppState, tier_id: Uuid) -> ApiResult<()> {
    match state.store.get_subscription_tier(tier_id).await? {
        Some(_) => Ok(()),
        None => Err(Entity::SubscriptionTier.not_found()),
    }
}

async fn onboard_client(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<OnboardingRequest>,
) -> ApiResult<(StatusCode, Json<TruckerClient>)> {
    validate_input(&request).map_err(|e| ApiError::invalid("Invalid trucker client data", e))?;

    let tier_id = match request.subscription_tier_id {
        Some(tier_id) => {
            ensure_tier_exists(&state, tier_id).await?;
            tier_id
        }
        None => {
            let features = FeatureRequest::from_ids(&request.tracking_features);
            let catalog = load_catalog(&state).await?;
            let tier = catalog.recommend(&features).ok_or(ApiError::UnresolvedTier)?;
            info!(
                rule = ?RecommendationRule::classify(&features),
                tier = %tier.name,
                fleet_size = ?request.fleet_size,
                operation_type = ?request.operation_type,
                "Tier recommended during onboarding"
            );
            tier.id
        }
    };

    let client = state
        .store
        .create_trucker_client(request.into_client(tier_id))
        .await
        .map_err(|e| ApiError::from_store(e, Entity::TruckerClient))?;
    info!(client_id = %client.id, tier_id = %client.subscription_tier_id, "Trucker client onboarded");
    Ok((StatusCode::CREATED, Json(client)))
}

async fn list_clients(State(state): State<AppState>) -> ApiResult<Json<Vec<TruckerClient>>> {
    Ok(Json(state.store.list_trucker_clients().await?))
}

async fn get_client(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<TruckerClient>> {
    state
        .store
        .get_trucker_client(id)
        .await?
        .map(Json)
        .ok_or_else(|| Entity::TruckerClient.not_found())
}

async fn update_client(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<TruckerClientPatch>,
) -> ApiResult<Json<TruckerClient>> {
    if let Some(tier_id) = patch.subscription_tier_id {
        ensure_tier_exists(&state, tier_id).await?;
    }

    state
        .store
        .update_trucker_client(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, Entity::TruckerClient))?
        .map(Json)
        .ok_or_else(|| Entity::TruckerClient.not_found())
}
