use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::database::models::ProjectFields;
use crate::error::{ApiError, PlainResult, StorageContext};
use crate::handlers::public::projects::INVALID_ID;
use crate::handlers::{bad_body, parse_id};
use crate::middleware::AuthUser;
use crate::state::AppState;

const REQUIRED_FIELDS: &str = "Title, description, and technologies are required";

/// Create/replace body. `featured` accepts a bool, a number or the strings
/// "true"/"1" since admin forms send all three.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub technologies: Option<String>,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub category: Option<String>,
    pub featured: Option<Value>,
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Widths of the projects columns.
const TITLE_MAX: usize = 255;
const URL_MAX: usize = 500;
const CATEGORY_MAX: usize = 100;

fn check_lengths(fields: &ProjectFields) -> Result<(), ApiError> {
    let checks = [
        ("Title", Some(fields.title.as_str()), TITLE_MAX),
        ("Image URL", fields.image_url.as_deref(), URL_MAX),
        ("Project URL", fields.project_url.as_deref(), URL_MAX),
        ("GitHub URL", fields.github_url.as_deref(), URL_MAX),
        ("Category", fields.category.as_deref(), CATEGORY_MAX),
    ];

    for (field, value, max) in checks {
        if value.is_some_and(|v| v.chars().count() > max) {
            return Err(ApiError::bad_request(format!(
                "{} must be at most {} characters",
                field, max
            )));
        }
    }
    Ok(())
}

fn truthy(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Some(Value::String(s)) => matches!(s.trim(), "true" | "1"),
        _ => false,
    }
}

impl ProjectRequest {
    /// Fields for a new project; the three text fields are mandatory.
    pub fn into_new_fields(self) -> Result<ProjectFields, ApiError> {
        let featured = truthy(self.featured.as_ref());
        let (Some(title), Some(description), Some(technologies)) = (
            optional(self.title),
            optional(self.description),
            optional(self.technologies),
        ) else {
            return Err(ApiError::bad_request(REQUIRED_FIELDS));
        };

        let fields = ProjectFields {
            title,
            description,
            technologies,
            image_url: optional(self.image_url),
            project_url: optional(self.project_url),
            github_url: optional(self.github_url),
            category: optional(self.category),
            featured,
        };
        check_lengths(&fields)?;
        Ok(fields)
    }

    /// Fields for a full replace: anything missing is blanked.
    pub fn into_replacement(self) -> Result<ProjectFields, ApiError> {
        let fields = ProjectFields {
            featured: truthy(self.featured.as_ref()),
            title: optional(self.title).unwrap_or_default(),
            description: optional(self.description).unwrap_or_default(),
            technologies: optional(self.technologies).unwrap_or_default(),
            image_url: optional(self.image_url),
            project_url: optional(self.project_url),
            github_url: optional(self.github_url),
            category: optional(self.category),
        };
        check_lengths(&fields)?;
        Ok(fields)
    }
}

/// POST /api/projects
pub async fn create(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> PlainResult<(StatusCode, Json<Value>)> {
    let Json(request) = payload.map_err(|rejection| bad_body(rejection, REQUIRED_FIELDS))?;
    let fields = request.into_new_fields()?;

    let project = state
        .projects()
        .insert(&fields)
        .await
        .or_storage("Failed to create project")?;

    info!("Project {} created by {}", project.id, admin.username);

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Project created successfully",
            "project": project,
        })),
    ))
}

/// PUT /api/projects/:id - overwrite every column
pub async fn update(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<ProjectRequest>, JsonRejection>,
) -> PlainResult<Json<Value>> {
    let id = parse_id(&id).ok_or_else(|| ApiError::bad_request(INVALID_ID))?;
    let Json(request) = payload.map_err(|rejection| bad_body(rejection, "Invalid request body"))?;
    let fields = request.into_replacement()?;

    let project = state
        .projects()
        .replace(id, &fields)
        .await
        .or_storage("Failed to update project")?;

    info!("Project {} updated by {}", id, admin.username);

    Ok(Json(json!({
        "message": "Project updated successfully",
        "project": project,
    })))
}

/// DELETE /api/projects/:id - also removes the uploaded image, best effort
pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<String>,
) -> PlainResult<Json<Value>> {
    let id = parse_id(&id).ok_or_else(|| ApiError::bad_request(INVALID_ID))?;
    let project = state
        .projects()
        .delete_404(id)
        .await
        .or_storage("Failed to delete project")?;

    if let Some(image_url) = project.image_url.as_deref() {
        match state.images.delete(image_url).await {
            Ok(true) => {}
            Ok(false) => debug!("No stored image to remove for {}", image_url),
            Err(err) => warn!("Failed to delete image {}: {}", image_url, err),
        }
    }

    info!("Project {} deleted by {}", id, admin.username);

    Ok(Json(json!({
        "message": "Project deleted successfully",
        "deletedId": id,
    })))
}
