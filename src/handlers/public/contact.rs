use std::net::SocketAddr;

use axum::{
    extract::{rejection::JsonRejection, ConnectInfo, State},
    http::{header::USER_AGENT, HeaderMap},
    Json,
};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::database::models::NewContactMessage;
use crate::error::{ApiError, ApiResult, StorageContext};
use crate::handlers::bad_body;
use crate::middleware::ApiSuccess;
use crate::state::AppState;

pub const DEFAULT_SUBJECT: &str = "General Inquiry";
const REQUIRED_FIELDS: &str = "Name, email, and message are required";
const IP_MAX_LEN: usize = 45;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

#[derive(Debug, Default, Deserialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
    pub subject: Option<String>,
}

// Column widths of contact_messages; message is TEXT but capped anyway.
const NAME_MAX: usize = 100;
const EMAIL_MAX: usize = 255;
const SUBJECT_MAX: usize = 200;
const MESSAGE_MAX: usize = 5000;

fn max_len(field: &str, value: &str, max: usize) -> Result<(), ApiError> {
    if value.chars().count() > max {
        return Err(ApiError::bad_request(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

fn required(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl ContactRequest {
    /// Trim, validate and normalize a public submission.
    pub fn validate(
        &self,
        ip_address: Option<String>,
        user_agent: Option<String>,
    ) -> Result<NewContactMessage, ApiError> {
        let (Some(name), Some(email), Some(message)) = (
            required(&self.name),
            required(&self.email),
            required(&self.message),
        ) else {
            return Err(ApiError::bad_request(REQUIRED_FIELDS));
        };

        if !EMAIL_RE.is_match(&email) {
            return Err(ApiError::bad_request("Invalid email format"));
        }

        let subject = required(&self.subject).unwrap_or_else(|| DEFAULT_SUBJECT.to_string());
        max_len("Name", &name, NAME_MAX)?;
        max_len("Email", &email, EMAIL_MAX)?;
        max_len("Subject", &subject, SUBJECT_MAX)?;
        max_len("Message", &message, MESSAGE_MAX)?;

        Ok(NewContactMessage {
            name,
            email: email.to_lowercase(),
            message,
            subject,
            ip_address,
            user_agent,
        })
    }
}

/// First `X-Forwarded-For` hop, then `X-Real-IP`, then the socket peer.
/// Forwarding headers are ignored unless the server sits behind a proxy.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> Option<String> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.split(',').next())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(str::to_string)
    };

    let forwarded = if trust_proxy {
        header("x-forwarded-for").or_else(|| header("x-real-ip"))
    } else {
        None
    };

    forwarded
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .map(|ip| ip.chars().take(IP_MAX_LEN).collect())
}

/// POST /api/contact - public contact form submission
pub async fn submit(
    State(state): State<AppState>,
    headers: HeaderMap,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    payload: Result<Json<ContactRequest>, JsonRejection>,
) -> ApiResult<ApiSuccess<Value>> {
    let Json(request) = payload.map_err(|rejection| bad_body(rejection, REQUIRED_FIELDS))?;

    let ip = client_ip(
        &headers,
        connect_info.map(|ConnectInfo(addr)| addr),
        state.config.security.trust_proxy,
    );
    let user_agent = headers
        .get(USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let new_message = request.validate(ip, user_agent)?;
    let saved = state
        .messages()
        .insert(&new_message)
        .await
        .or_storage("A server error occurred. Please try again later.")?;

    info!("New contact message {} from {}", saved.id, saved.email);

    Ok(ApiSuccess::created(json!({
        "message": "Your message has been sent. Thank you!",
        "data": {
            "id": saved.id,
            "name": saved.name,
            "email": saved.email,
            "created_at": saved.created_at,
        }
    })))
}
