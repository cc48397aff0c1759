//! Voicelink server library logic.

pub mod api;
pub mod api_proxy;
pub mod api_skill;
pub mod config;
pub mod middleware;
pub mod tool;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Extension, Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tower_http::cors::{Any, CorsLayer};
use voicelink_backend::ConversationClient;
use voicelink_locale::LocaleStore;
use voicelink_skill::SkillRouter;

/// Maximum request body size (1 MiB). Protects against OOM from oversized
/// payloads; the proxy handler enforces its own tighter input limit.
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Application state shared across all request handlers.
pub struct AppState {
    /// Voice intent router, owning the locale catalogs, session store, and
    /// backend client.
    pub skill: SkillRouter,
    /// Shared secret the proxy middleware compares against. Empty means
    /// unconfigured.
    pub proxy_api_key: String,
    /// The CLI tool the proxy endpoint shells out to.
    pub tool: tool::CliTool,
}

/// Errors that can occur while assembling application state at startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load locale catalogs: {0}")]
    Locale(#[from] voicelink_locale::LocaleError),

    #[error("failed to build backend client: {0}")]
    Backend(#[from] voicelink_backend::BackendError),
}

/// Builds application state from loaded configuration.
///
/// Loads and verifies every locale catalog up front, so a deployment with a
/// broken phrase resource fails here instead of at request time.
pub fn build_state(config: &config::Config) -> Result<AppState, StartupError> {
    let locales = LocaleStore::load_dir(&config.skill.locale_dir)?;
    let client = ConversationClient::new(&config.backend)?;
    let skill = SkillRouter::new(locales, client, config.skill.behavior.clone());
    let tool = tool::CliTool::new(
        config.proxy.tool.clone(),
        Duration::from_secs(config.proxy.timeout_secs),
    );

    Ok(AppState {
        skill,
        proxy_api_key: config.proxy.api_key.clone(),
        tool,
    })
}

/// Health check handler.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let proxy_routes = Router::new()
        .route("/gemini", post(api_proxy::gemini_handler))
        .layer(axum::middleware::from_fn(middleware::proxy_auth_middleware));

    Router::new()
        .route("/health", get(health))
        .route("/skill", post(api_skill::skill_handler))
        .merge(proxy_routes)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
