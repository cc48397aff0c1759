//! Request authentication for the proxy endpoint.

use crate::api::ApiError;
use crate::AppState;
use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::sync::Arc;

/// Header carrying the caller's shared secret.
pub const API_KEY_HEADER: &str = "X-API-Key";

/// Middleware authenticating proxy callers via `X-API-Key`.
///
/// An unset server-side secret is a configuration fault and maps to 500,
/// distinct from the 401 a caller gets for a missing or mismatched key. No
/// handler runs unless the key compares equal byte-for-byte.
pub async fn proxy_auth_middleware(req: Request<Body>, next: Next) -> Result<Response, ApiError> {
    let state = req
        .extensions()
        .get::<Arc<AppState>>()
        .ok_or_else(|| ApiError::InternalServerError("missing application state".to_string()))?
        .clone();

    if state.proxy_api_key.is_empty() {
        tracing::error!("proxy request refused: proxy.api_key is not configured");
        return Err(ApiError::Misconfigured(
            "proxy API key is not configured".to_string(),
        ));
    }

    let supplied = req
        .headers()
        .get(API_KEY_HEADER)
        .and_then(|value| value.to_str().ok());

    match supplied {
        Some(key) if key.as_bytes() == state.proxy_api_key.as_bytes() => Ok(next.run(req).await),
        _ => Err(ApiError::Unauthorized),
    }
}
