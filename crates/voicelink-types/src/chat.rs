//! Wire format for the conversational backend's `/chat` endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `POST {base_url}/chat`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub prompt: String,
    /// Conversation correlation token from a prior turn. Omitted from the
    /// body on the first turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversation_id: Option<String>,
}

/// Response body from the backend.
///
/// The backend replies with one of three shapes — a `response`, an `error`,
/// or a bare `message` — so every field is optional and the client
/// classifies whichever combination arrives.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatReply {
    #[serde(default)]
    pub response: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
