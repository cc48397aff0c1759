//! Handler for the voice-platform webhook.

use crate::AppState;
use axum::extract::{Extension, Json};
use std::sync::Arc;
use voicelink_types::{SkillRequest, SkillResponse};

/// Handler for `POST /skill`.
///
/// The router never fails: every handler error has already been folded into
/// a speakable response by the time it reaches this boundary, so the
/// platform always receives a well-formed envelope.
pub async fn skill_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(envelope): Json<SkillRequest>,
) -> Json<SkillResponse> {
    Json(state.skill.handle(envelope).await)
}
