//! Payloads for the authenticated CLI proxy endpoint.

use serde::{Deserialize, Serialize};

/// Request body for `POST /gemini`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProxyRequest {
    #[serde(default)]
    pub input: String,
}

/// Success body: the tool's captured standard output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyReply {
    pub output: String,
}
