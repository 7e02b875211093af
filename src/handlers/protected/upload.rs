use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};
use tracing::{error, info};

use crate::error::{ApiError, PlainResult};
use crate::services::image_store::is_allowed_image_type;
use crate::state::AppState;

pub const IMAGE_FIELD: &str = "image";
const NO_FILE: &str = "No files were uploaded";

pub fn size_limit_message(max_bytes: usize) -> String {
    format!("File size exceeds limit ({}MB)", max_bytes / (1024 * 1024))
}

fn multipart_error(err: MultipartError, max_bytes: usize) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(size_limit_message(max_bytes))
    } else {
        ApiError::bad_request(err.body_text())
    }
}

/// POST /api/upload - store one image from the `image` multipart field
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> PlainResult<Json<Value>> {
    let max_bytes = state.config.uploads.max_bytes;
    let mut multipart = multipart.map_err(|_| ApiError::bad_request(NO_FILE))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| multipart_error(err, max_bytes))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let mimetype = field.content_type().unwrap_or_default().to_string();
        if !is_allowed_image_type(&mimetype) {
            return Err(ApiError::bad_request("Only image files are allowed").into());
        }
        let original_name = field.file_name().unwrap_or("upload").to_string();

        let bytes = field
            .bytes()
            .await
            .map_err(|err| multipart_error(err, max_bytes))?;
        if bytes.len() > max_bytes {
            return Err(ApiError::payload_too_large(size_limit_message(max_bytes)).into());
        }

        let stored = state.images.store(&original_name, &bytes).await.map_err(|err| {
            error!("Upload error: {}", err);
            ApiError::internal_server_error("Failed to upload file")
        })?;

        info!("Stored upload {} ({} bytes)", stored.filename, bytes.len());

        return Ok(Json(json!({
            "success": true,
            "message": "File uploaded successfully",
            "filename": stored.filename,
            "path": stored.path,
            "size": bytes.len(),
            "mimetype": mimetype,
        })));
    }

    Err(ApiError::bad_request(NO_FILE).into())
}
