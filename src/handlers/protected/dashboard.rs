use axum::extract::State;
use serde_json::{json, Value};

use crate::error::{ApiResult, StorageContext};
use crate::middleware::ApiSuccess;
use crate::services::DashboardStats;
use crate::state::AppState;

/// GET /api/dashboard/stats - counters for the admin dashboard
pub async fn stats(State(state): State<AppState>) -> ApiResult<ApiSuccess<Value>> {
    let stats = DashboardStats::fetch(state.db.pool())
        .await
        .or_storage("Failed to fetch dashboard stats")?;
    Ok(ApiSuccess::ok(json!({ "stats": stats })))
}
