//! Handler for the authenticated CLI proxy endpoint.

use crate::api::ApiError;
use crate::tool::ToolError;
use crate::AppState;
use axum::extract::{Extension, Json};
use std::sync::Arc;
use tracing::error;
use voicelink_types::{ProxyReply, ProxyRequest};

/// Handler for `POST /gemini`. Authentication has already happened in the
/// middleware layer; this handler only validates the payload and relays the
/// tool's output.
pub async fn gemini_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<ProxyRequest>,
) -> Result<Json<ProxyReply>, ApiError> {
    if payload.input.trim().is_empty() {
        return Err(ApiError::BadRequest("missing input text".to_string()));
    }

    let output = state.tool.run(&payload.input).await.map_err(|e| {
        error!("tool invocation failed: {e}");
        match e {
            e @ ToolError::InputTooLarge(_) => ApiError::BadRequest(e.to_string()),
            ToolError::Failed { stderr, .. } => ApiError::InternalServerError(stderr),
            other => ApiError::InternalServerError(other.to_string()),
        }
    })?;

    Ok(Json(ProxyReply { output }))
}
