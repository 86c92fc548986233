//! Expense records: mileage, fuel, maintenance, food, paperwork.
//!
//! All five kinds share one shape: list by client, create, and get, patch or
//! delete by id. The handlers are generated per kind.

use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// `?truckerClientId=` filter required by every list endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientFilter {
    pub trucker_client_id: Option<Uuid>,
}

impl ClientFilter {
    fn required(&self) -> ApiResult<Uuid> {
        self.trucker_client_id
            .ok_or_else(|| ApiError::BadRequest("truckerClientId query parameter is required".to_string()))
    }
}

macro_rules! expense_resource {
    (
        $module:ident, $path:literal, $entity:expr,
        $record:ty, $new:ty, $patch:ty,
        create: $create:ident,
        get: $get:ident,
        list: $list:ident,
        update: $update:ident,
        delete: $delete:ident $(,)?
    ) => {
        pub mod $module {
            use axum::extract::State;
            use axum::http::StatusCode;
            use axum::routing::get;
            use axum::{Json, Router};
            use manna_store::Storage;
            use uuid::Uuid;

            use super::ClientFilter;
            use crate::error::{ApiError, ApiResult, Entity};
            use crate::extract::{ApiJson, ApiPath, ApiQuery};
            use crate::state::AppState;

            const ENTITY: Entity = $entity;

            pub fn routes() -> Router<AppState> {
                Router::new()
                    .route($path, get(list).post(create))
                    .route(
                        concat!($path, "/{id}"),
                        get(fetch).patch(update).delete(remove),
                    )
            }

            async fn list(
                State(state): State<AppState>,
                ApiQuery(filter): ApiQuery<ClientFilter>,
            ) -> ApiResult<Json<Vec<$record>>> {
                let client_id = filter.required()?;
                Ok(Json(state.store.$list(client_id).await?))
            }

            async fn create(
                State(state): State<AppState>,
                ApiJson(input): ApiJson<$new>,
            ) -> ApiResult<(StatusCode, Json<$record>)> {
                let record = state
                    .store
                    .$create(input)
                    .await
                    .map_err(|e| ApiError::from_store(e, ENTITY))?;
                Ok((StatusCode::CREATED, Json(record)))
            }

            async fn fetch(
                State(state): State<AppState>,
                ApiPath(id): ApiPath<Uuid>,
            ) -> ApiResult<Json<$record>> {
                state
                    .store
                    .$get(id)
                    .await?
                    .map(Json)
                    .ok_or_else(|| ENTITY.not_found())
            }

            async fn update(
                State(state): State<AppState>,
                ApiPath(id): ApiPath<Uuid>,
                ApiJson(patch): ApiJson<$patch>,
            ) -> ApiResult<Json<$record>> {
                state
                    .store
                    .$update(id, patch)
                    .await
                    .map_err(|e| ApiError::from_store(e, ENTITY))?
                    .map(Json)
                    .ok_or_else(|| ENTITY.not_found())
            }

            async fn remove(
                State(state): State<AppState>,
                ApiPath(id): ApiPath<Uuid>,
            ) -> ApiResult<Json<serde_json::Value>> {
                if state.store.$delete(id).await? {
                    Ok(ENTITY.deleted())
                } else {
                    Err(ENTITY.not_found())
                }
            }
        }
    };
}

expense_resource!(
    mileage, "/api/mileage-logs", Entity::MileageLog,
    manna_store::MileageLog, manna_store::NewMileageLog, manna_store::MileageLogPatch,
    create: create_mileage_log,
    get: get_mileage_log,
    list: list_mileage_logs,
    update: update_mileage_log,
    delete: delete_mileage_log,
);

expense_resource!(
    fuel, "/api/fuel-expenses", Entity::FuelExpense,
    manna_store::FuelExpense, manna_store::NewFuelExpense, manna_store::FuelExpensePatch,
    create: create_fuel_expense,
    get: get_fuel_expense,
    list: list_fuel_expenses,
    update: update_fuel_expense,
    delete: delete_fuel_expense,
);

expense_resource!(
    maintenance, "/api/maintenance-expenses", Entity::MaintenanceExpense,
    manna_store::MaintenanceExpense, manna_store::NewMaintenanceExpense, manna_store::MaintenanceExpensePatch,
    create: create_maintenance_expense,
    get: get_maintenance_expense,
    list: list_maintenance_expenses,
    update: update_maintenance_expense,
    delete: delete_maintenance_expense,
);

expense_resource!(
    food, "/api/food-expenses", Entity::FoodExpense,
    manna_store::FoodExpense, manna_store::NewFoodExpense, manna_store::FoodExpensePatch,
    create: create_food_expense,
    get: get_food_expense,
    list: list_food_expenses,
    update: update_food_expense,
    delete: delete_food_expense,
);

expense_resource!(
    paperwork, "/api/paperwork-documents", Entity::PaperworkDocument,
    manna_store::PaperworkDocument, manna_store::NewPaperworkDocument, manna_store::PaperworkDocumentPatch,
    create: create_paperwork_document,
    get: get_paperwork_document,
    list: list_paperwork_documents,
    update: update_paperwork_document,
    delete: delete_paperwork_document,
);

pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(mileage::routes())
        .merge(fuel::routes())
        .merge(maintenance::routes())
        .merge(food::routes())
        .merge(paperwork::routes())
}
