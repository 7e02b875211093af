use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{error, info, warn};

use crate::auth::{verify_credentials, AuthError};
use crate::error::{ApiError, PlainResult, StorageContext};
use crate::handlers::bad_body;
use crate::state::AppState;

const REQUIRED: &str = "Username and password required";

#[derive(Debug, Default, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// POST /api/admin/login - exchange admin credentials for a token
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> PlainResult<Json<Value>> {
    let Json(request) = payload.map_err(|rejection| bad_body(rejection, REQUIRED))?;

    let username = request.username.unwrap_or_default();
    let password = request.password.unwrap_or_default();
    if username.trim().is_empty() || password.is_empty() {
        return Err(ApiError::bad_request(REQUIRED).into());
    }

    let admin = state
        .admins()
        .find_by_username(&username)
        .await
        .or_storage("Internal server error")?;

    let keys = state.tokens.clone();
    let grant = tokio::task::spawn_blocking(move || verify_credentials(admin, &password, &keys))
        .await
        .map_err(|err| {
            error!("Login task failed: {}", err);
            ApiError::internal_server_error("Internal server error")
        })?
        .map_err(|err| {
            if matches!(err, AuthError::InvalidCredentials) {
                warn!("Failed login attempt for {:?}", username);
            }
            err
        })?;

    info!("Admin {} logged in", grant.admin.username);

    Ok(Json(json!({
        "token": grant.token,
        "user": {
            "id": grant.admin.id,
            "username": grant.admin.username,
            "name": grant.admin.display_name(),
        }
    })))
}
