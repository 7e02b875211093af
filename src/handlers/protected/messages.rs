use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Extension, Json,
};
use serde::{Deserialize, Deserializer};
use serde_json::{json, Value};
use tracing::info;

use crate::database::models::{MessageStatus, MessageUpdate};
use crate::error::{ApiError, ApiResult, StorageContext};
use crate::handlers::{bad_body, parse_id};
use crate::middleware::{ApiSuccess, AuthUser};
use crate::services::{ListingStats, MessageListQuery, MessageListing, MessageStats, StatsWindows};
use crate::state::AppState;

const INVALID_ID: &str = "Invalid message ID";

fn message_id(raw: &str) -> Result<i64, ApiError> {
    parse_id(raw).ok_or_else(|| ApiError::bad_request(INVALID_ID))
}

/// GET /api/messages - paginated, filtered listing with summary counters
pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> ApiResult<ApiSuccess<Value>> {
    let pairs = query.map(|Query(pairs)| pairs).unwrap_or_default();
    let query = MessageListQuery::from_pairs(pairs);
    let listing = MessageListing::from_query(&query, &state.config.query);
    let windows = StatsWindows::now();
    let repo = state.messages();

    let (page, stats) = tokio::try_join!(
        listing.fetch(&repo),
        MessageStats::fetch(state.db.pool(), &windows)
    )
    .or_storage("Failed to fetch messages")?;

    Ok(ApiSuccess::ok(json!({
        "messages": page.rows,
        "pagination": page.pagination,
        "stats": ListingStats::from(stats),
    })))
}

/// GET /api/messages/:id - message detail; marks unread messages as read
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ApiSuccess<Value>> {
    let id = message_id(&id)?;
    let message = state
        .messages()
        .view(id)
        .await
        .or_storage("Failed to fetch message")?;
    Ok(ApiSuccess::ok(json!({ "message": message })))
}

/// Body of `PUT /api/messages/:id`. `admin_notes` distinguishes absent from
/// an explicit `null`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateMessageRequest {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub admin_notes: Option<Option<String>>,
}

fn deserialize_some<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl UpdateMessageRequest {
    pub fn into_update(self) -> Result<MessageUpdate, ApiError> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<MessageStatus>()
                    .map_err(|_| ApiError::bad_request("Invalid status value"))?,
            ),
        };

        let update = MessageUpdate {
            status,
            admin_notes: self.admin_notes,
        };
        if update.is_empty() {
            return Err(ApiError::bad_request("No data to update"));
        }
        Ok(update)
    }
}

/// PUT /api/messages/:id - change status and/or admin notes
pub async fn update(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateMessageRequest>, JsonRejection>,
) -> ApiResult<ApiSuccess<Value>> {
    let id = message_id(&id)?;
    let Json(request) = payload.map_err(|rejection| bad_body(rejection, "Invalid request body"))?;
    let update = request.into_update()?;

    let message = state
        .messages()
        .update_admin(id, &update)
        .await
        .or_storage("Failed to update message")?;

    info!("Message {} updated by {} (status={})", id, admin.username, message.status);

    Ok(ApiSuccess::ok(json!({
        "message": "Message updated successfully",
        "data": message,
    })))
}

/// DELETE /api/messages/:id
pub async fn delete(
    State(state): State<AppState>,
    Extension(admin): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResult<ApiSuccess<Value>> {
    let id = message_id(&id)?;
    state
        .messages()
        .delete_404(id)
        .await
        .or_storage("Failed to delete message")?;

    info!("Message {} deleted by {}", id, admin.username);
    Ok(ApiSuccess::ok(json!({ "message": "Message deleted successfully" })))
}

/// GET /api/messages/stats/summary
pub async fn stats_summary(State(state): State<AppState>) -> ApiResult<ApiSuccess<Value>> {
    let stats = MessageStats::fetch(state.db.pool(), &StatsWindows::now())
        .await
        .or_storage("Failed to fetch statistics")?;
    Ok(ApiSuccess::ok(json!({ "stats": stats })))
}

/// GET /api/messages/count/unread
pub async fn unread_count(State(state): State<AppState>) -> ApiResult<ApiSuccess<Value>> {
    let count = state
        .messages()
        .unread_count()
        .await
        .or_storage("Failed to count unread messages")?;
    Ok(ApiSuccess::ok(json!({ "count": count })))
}
