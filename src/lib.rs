pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod error;
pub mod filter;
pub mod handlers;
pub mod middleware;
pub mod services;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tower::Layer;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    services::ServeDir,
    set_header::{SetResponseHeader, SetResponseHeaderLayer},
    trace::TraceLayer,
};
use tracing::warn;

use crate::config::AppConfig;
use crate::error::handle_panic;
use crate::state::AppState;

/// Slack above the file limit for multipart boundaries and headers.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// The full HTTP application.
pub fn app(state: AppState) -> Router {
    let config = state.config.clone();

    let mut router = Router::new()
        .merge(public_routes())
        .merge(admin_routes(&state))
        .nest_service("/uploads", uploads_service(&config))
        .fallback(handlers::public::not_found);

    if config.security.expose_error_detail {
        router = router.layer(axum_middleware::from_fn(middleware::expose_error_detail));
    }

    router
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer(&config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn public_routes() -> Router<AppState> {
    use handlers::public;

    Router::new()
        .route("/api/health", get(public::health))
        .route("/api/contact", post(public::contact_submit))
        .route("/api/admin/login", post(public::login))
        // Projects (read-only)
        .route("/api/projects", get(public::projects_list))
        .route("/api/projects/featured", get(public::projects_featured))
        .route("/api/projects/category/:category", get(public::projects_by_category))
        .route("/api/projects/:id", get(public::project_show))
        .route("/api/projects/:id/view", post(public::project_record_view))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    use axum::routing::put;
    use handlers::protected;

    let upload_limit = state.config.uploads.max_bytes + MULTIPART_OVERHEAD;

    Router::new()
        // Messages
        .route("/api/messages", get(protected::messages_list))
        .route("/api/messages/stats/summary", get(protected::messages_stats_summary))
        .route("/api/messages/count/unread", get(protected::messages_unread_count))
        .route(
            "/api/messages/:id",
            get(protected::message_show)
                .put(protected::message_update)
                .delete(protected::message_delete),
        )
        // Projects (mutations)
        .route("/api/projects", post(protected::project_create))
        .route(
            "/api/projects/:id",
            put(protected::project_update).delete(protected::project_delete),
        )
        .route(
            "/api/upload",
            post(protected::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route("/api/dashboard/stats", get(protected::dashboard_stats))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::require_admin,
        ))
}

/// Uploaded images, served as static files with a one day cache.
fn uploads_service(config: &AppConfig) -> SetResponseHeader<ServeDir, HeaderValue> {
    SetResponseHeaderLayer::if_not_present(CACHE_CONTROL, HeaderValue::from_static("public, max-age=86400"))
        .layer(ServeDir::new(&config.uploads.dir))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {:?}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
}
