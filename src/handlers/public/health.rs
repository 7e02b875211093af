use axum::{
    extract::{OriginalUri, State},
    http::{Method, StatusCode},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::state::AppState;

pub const FEATURES: [&str; 4] = ["projects", "contact", "messages", "authentication"];

/// GET /api/health - liveness plus a database probe
pub async fn health(State(state): State<AppState>) -> Json<Value> {
    let database = match state.db.health_check().await {
        Ok(()) => "connected",
        Err(err) => {
            warn!("Health check could not reach the database: {}", err);
            "unavailable"
        }
    };

    Json(json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "service": "Portfolio API",
        "features": FEATURES,
        "database": database,
    }))
}

/// Fallback for unknown routes.
pub async fn not_found(method: Method, OriginalUri(uri): OriginalUri) -> (StatusCode, Json<Value>) {
    info!("404 Not Found: {} {}", method, uri);
    (
        StatusCode::NOT_FOUND,
        Json(json!({
            "error": "Endpoint not found",
            "path": uri.to_string(),
        })),
    )
}
