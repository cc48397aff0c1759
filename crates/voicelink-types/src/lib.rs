//! Shared wire types for the voicelink platform.
//!
//! Defines the voice-platform request/response envelope, the chat wire
//! format spoken to the conversational backend, and the proxy endpoint
//! payloads. These types carry no behavior beyond envelope construction;
//! all routing and transport logic lives in the consumer crates.

pub mod chat;
pub mod envelope;
pub mod proxy;

pub use chat::{ChatReply, ChatRequest};
pub use envelope::{
    Intent, Request, ResponseBuilder, SkillRequest, SkillResponse, Slot, User,
};
pub use proxy::{ProxyReply, ProxyRequest};
