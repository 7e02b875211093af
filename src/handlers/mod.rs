// handlers/mod.rs - route handlers by access tier
//
// Public (no token) and protected (admin token via `require_admin`).

pub mod protected;
pub mod public;

use axum::extract::rejection::JsonRejection;
use tracing::debug;

use crate::error::ApiError;

/// Numeric `:id` path segment.
pub fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok()
}

/// Log a rejected JSON body and turn it into a 400 with `message`.
pub fn bad_body(rejection: JsonRejection, message: &str) -> ApiError {
    debug!("Rejected request body: {}", rejection.body_text());
    ApiError::bad_request(message)
}
