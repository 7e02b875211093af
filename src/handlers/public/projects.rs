use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use crate::database::models::Project;
use crate::error::{ApiError, ApiResult, PlainResult, StorageContext};
use crate::handlers::parse_id;
use crate::middleware::ApiSuccess;
use crate::state::AppState;

pub const INVALID_ID: &str = "Invalid project ID";

/// GET /api/projects - all projects, newest first
pub async fn list(State(state): State<AppState>) -> PlainResult<Json<Vec<Project>>> {
    let projects = state
        .projects()
        .list_all()
        .await
        .or_storage("Failed to fetch projects")?;
    Ok(Json(projects))
}

/// GET /api/projects/featured - newest featured projects
pub async fn featured(State(state): State<AppState>) -> PlainResult<Json<Vec<Project>>> {
    let projects = state
        .projects()
        .list_featured()
        .await
        .or_storage("Failed to fetch featured projects")?;
    Ok(Json(projects))
}

/// GET /api/projects/category/:category - exact category match
pub async fn by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> PlainResult<Json<Vec<Project>>> {
    let projects = state
        .projects()
        .list_by_category(&category)
        .await
        .or_storage("Failed to fetch projects")?;
    Ok(Json(projects))
}

/// GET /api/projects/:id - project detail; counts as a view
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> PlainResult<Json<Project>> {
    let id = parse_id(&id).ok_or_else(|| ApiError::bad_request(INVALID_ID))?;
    let project = state
        .projects()
        .view(id)
        .await
        .or_storage("Failed to fetch project")?;
    Ok(Json(project))
}

/// POST /api/projects/:id/view - count a view without fetching the project
pub async fn record_view(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiSuccess<Value>> {
    let id = parse_id(&id).ok_or_else(|| ApiError::bad_request(INVALID_ID))?;
    let views = state
        .projects()
        .increment_views(id)
        .await
        .or_storage("Failed to update views")?;
    Ok(ApiSuccess::ok(json!({ "views": views })))
}
