//! HTTP client for the conversational backend.
//!
//! Performs the single synchronous round trip to `POST {base_url}/chat` and
//! folds every failure mode into a speech-ready phrase: the caller always
//! gets something safe to say, never an error to propagate. The client is
//! stateless; conversation continuity is the caller's session state, passed
//! in and handed back per call.

mod client;
mod config;

pub use client::{ConversationClient, ConverseOutcome, ConverseReply, ConverseRequest};
pub use config::BackendConfig;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("failed to construct HTTP client: {0}")]
    Http(#[from] reqwest::Error),
}
