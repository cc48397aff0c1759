//! Voice-platform request/response envelope.
//!
//! Mirrors the JSON shape the voice platform posts to a custom skill
//! endpoint and the response shape it expects back. Field names follow the
//! platform's camelCase wire convention.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Inbound request envelope from the voice platform.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillRequest {
    pub version: String,
    #[serde(default)]
    pub session: Option<Session>,
    pub context: Context,
    pub request: Request,
}

impl SkillRequest {
    /// The platform user id, used as the session-store key.
    pub fn user_id(&self) -> &str {
        &self.context.system.user.user_id
    }

    /// The account-linking bearer token, if the user has linked an account.
    pub fn access_token(&self) -> Option<&str> {
        self.context.system.user.access_token.as_deref()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,
    #[serde(default)]
    pub new: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Context {
    pub system: System,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct System {
    pub user: User,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    #[serde(default)]
    pub access_token: Option<String>,
}

/// The typed request variants the router dispatches on.
///
/// Request types the platform may add later deserialize into `Other` rather
/// than failing the whole envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    #[serde(rename = "LaunchRequest")]
    Launch { locale: String },
    #[serde(rename = "IntentRequest")]
    Intent { locale: String, intent: Intent },
    #[serde(rename = "SessionEndedRequest")]
    SessionEnded {
        #[serde(default)]
        reason: Option<String>,
    },
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: Option<HashMap<String, Slot>>,
}

impl Intent {
    /// Returns the spoken value of a named slot, if the platform filled it.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots
            .as_ref()
            .and_then(|slots| slots.get(name))
            .and_then(|slot| slot.value.as_deref())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<String>,
}

/// Outbound response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct SkillResponse {
    pub version: String,
    pub response: ResponseBody,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    pub should_end_session: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub text: String,
}

impl OutputSpeech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            speech_type: "PlainText".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Builder mirroring the platform SDK's response factory.
///
/// `speak` replaces any previously staged speech (the SDK semantics the
/// query handler relies on: a staged "processing" phrase is superseded by
/// the final reply). `ask` sets the reprompt and keeps the session open.
#[derive(Debug, Clone, Default)]
pub struct ResponseBuilder {
    speech: Option<String>,
    reprompt: Option<String>,
    should_end_session: bool,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speak(mut self, text: impl Into<String>) -> Self {
        self.speech = Some(text.into());
        self
    }

    pub fn ask(mut self, text: impl Into<String>) -> Self {
        self.reprompt = Some(text.into());
        self.should_end_session = false;
        self
    }

    pub fn with_should_end_session(mut self, end: bool) -> Self {
        self.should_end_session = end;
        self
    }

    pub fn build(self) -> SkillResponse {
        SkillResponse {
            version: "1.0".to_string(),
            response: ResponseBody {
                output_speech: self.speech.map(OutputSpeech::plain),
                reprompt: self.reprompt.map(|text| Reprompt {
                    output_speech: OutputSpeech::plain(text),
                }),
                should_end_session: self.should_end_session,
            },
        }
    }
}
