//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Two JSON proxies (chat and contact) sit next to the static portfolio
//! site. Each proxy answers on its `/api/*` path and on the Netlify
//! function path older front ends still post to. Anything that is not
//! an API route falls through to files under `WEBSITE_DIR`.

pub mod chat;
pub mod contact;

use std::path::Path;

use axum::Router;
use axum::extract::{Request, State};
use axum::http::header::{CONTENT_TYPE, ORIGIN};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::error::ApiError;
use crate::state::AppState;

pub const CHAT_PATH: &str = "/api/chat";
pub const CHAT_LEGACY_PATH: &str = "/.netlify/functions/chat";
pub const CONTACT_PATH: &str = "/api/contact";
pub const CONTACT_LEGACY_PATH: &str = "/.netlify/functions/sendMessage";

/// Proxy routes with origin enforcement, CORS, and the JSON 405 fallback.
fn api_routes(state: AppState) -> Router {
    let cors = cors_layer(&state.allowed_origins);

    Router::new()
        .route(CHAT_PATH, post(chat::chat).fallback(method_not_allowed))
        .route(CHAT_LEGACY_PATH, post(chat::chat).fallback(method_not_allowed))
        .route(CONTACT_PATH, post(contact::submit).fallback(method_not_allowed))
        .route(CONTACT_LEGACY_PATH, post(contact::submit).fallback(method_not_allowed))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_allowed_origin))
        .route("/healthz", get(healthz))
        .layer(cors)
        .with_state(state)
}

/// Full application: proxies, health check, static site fallback.
pub fn app(state: AppState, website_dir: &Path) -> Router {
    let website_service = ServeDir::new(website_dir).append_index_html_on_directories(true);

    api_routes(state)
        .fallback_service(website_service)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE]);

    if allowed_origins.is_empty() {
        return base.allow_origin(Any);
    }
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();
    base.allow_origin(AllowOrigin::list(origins))
}

async fn require_allowed_origin(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let origin = request.headers().get(ORIGIN).and_then(|v| v.to_str().ok());
    if !state.origin_allowed(origin) {
        warn!(origin = origin.unwrap_or_default(), path = %request.uri().path(), "origin rejected");
        return ApiError::Forbidden.into_response();
    }
    next.run(request).await
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
