//! Consultancy site: projects, contact messages, demo requests.

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use manna_store::{
    Contact, DemoRequest, NewContact, NewDemoRequest, NewProject, Project, ProjectPatch, Storage,
};
use tracing::info;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult, Entity};
use crate::extract::{ApiJson, ApiPath};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/projects", get(list_projects).post(create_project))
        .route(
            "/api/projects/{id}",
            get(get_project).patch(update_project).delete(delete_project),
        )
        .route("/api/contacts", get(list_contacts).post(create_contact))
        .route("/api/demo-requests", get(list_demo_requests).post(create_demo_request))
}

async fn list_projects(State(state): State<AppState>) -> ApiResult<Json<Vec<Project>>> {
    Ok(Json(state.store.list_projects().await?))
}

async fn get_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<Project>> {
    state
        .store
        .get_project(id)
        .await?
        .map(Json)
        .ok_or_else(|| Entity::Project.not_found())
}

async fn create_project(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = state
        .store
        .create_project(input)
        .await
        .map_err(|e| ApiError::from_store(e, Entity::Project))?;
    Ok((StatusCode::CREATED, Json(project)))
}

async fn update_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(patch): ApiJson<ProjectPatch>,
) -> ApiResult<Json<Project>> {
    state
        .store
        .update_project(id, patch)
        .await
        .map_err(|e| ApiError::from_store(e, Entity::Project))?
        .map(Json)
        .ok_or_else(|| Entity::Project.not_found())
}

async fn delete_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> ApiResult<Json<serde_json::Value>> {
    if state.store.delete_project(id).await? {
        Ok(Entity::Project.deleted())
    } else {
        Err(Entity::Project.not_found())
    }
}

async fn create_contact(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewContact>,
) -> ApiResult<(StatusCode, Json<Contact>)> {
    let contact = state
        .store
        .create_contact(input)
        .await
        .map_err(|e| ApiError::from_store(e, Entity::Contact))?;
    info!(contact_id = %contact.id, "Contact message received");
    Ok((StatusCode::CREATED, Json(contact)))
}

async fn list_contacts(State(state): State<AppState>) -> ApiResult<Json<Vec<Contact>>> {
    Ok(Json(state.store.list_contacts().await?))
}

async fn create_demo_request(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewDemoRequest>,
) -> ApiResult<(StatusCode, Json<DemoRequest>)> {
    let request = state
        .store
        .create_demo_request(input)
        .await
        .map_err(|e| ApiError::from_store(e, Entity::DemoRequest))?;
    info!(demo_request_id = %request.id, "Demo request received");
    Ok((StatusCode::CREATED, Json(request)))
}

async fn list_demo_requests(State(state): State<AppState>) -> ApiResult<Json<Vec<DemoRequest>>> {
    Ok(Json(state.store.list_demo_requests().await?))
}
