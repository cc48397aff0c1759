use crate::{BackendConfig, BackendError};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error};
use voicelink_locale::Phrases;
use voicelink_speech::normalize;
use voicelink_types::{ChatReply, ChatRequest};

/// One turn's input to [`ConversationClient::converse`].
#[derive(Debug)]
pub struct ConverseRequest<'a> {
    /// The spoken query text.
    pub prompt: &'a str,
    /// Conversation correlation token held in the caller's session, if any.
    pub conversation_id: Option<String>,
    /// Account-linking bearer credential for the backend.
    pub access_token: &'a str,
    /// Region code steering numeric normalization (e.g. `"DE"`).
    pub region: &'a str,
    /// Localized phrases for the failure surfaces.
    pub phrases: &'a Phrases,
}

/// How the turn resolved. Every variant still carries speakable text in
/// [`ConverseReply::speech`]; the outcome exists for logging and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverseOutcome {
    /// Normalized backend reply text.
    Success,
    /// The backend answered with its own error or an empty reply; the
    /// spoken text derives from the backend's message.
    BackendError,
    /// The round trip timed out.
    Timeout,
    /// Connect/read failure or an unusable response body.
    Transport,
    /// No backend base URL is configured.
    Misconfigured,
}

/// Result of one turn. `conversation_id` is the value the caller should
/// write back into its session: the backend's token when one was returned,
/// otherwise the token that was passed in.
#[derive(Debug)]
pub struct ConverseReply {
    pub speech: String,
    pub conversation_id: Option<String>,
    pub outcome: ConverseOutcome,
}

/// Client for the conversational backend's `/chat` endpoint.
#[derive(Debug, Clone)]
pub struct ConversationClient {
    http: reqwest::Client,
    base_url: String,
}

impl ConversationClient {
    pub fn new(config: &BackendConfig) -> Result<Self, BackendError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: config.trimmed_base_url().to_string(),
        })
    }

    /// Performs one backend turn, always returning speech-ready text.
    ///
    /// No outcome is retried, and nothing escapes as an error: transport
    /// failures become the localized timeout/error phrases, backend-supplied
    /// error text is spoken as-is (normalized), and success text passes
    /// through the normalizer.
    pub async fn converse(&self, req: ConverseRequest<'_>) -> ConverseReply {
        if self.base_url.is_empty() {
            error!("backend base URL is not configured; set backend.base_url");
            return ConverseReply {
                speech: req.phrases.error_message.clone(),
                conversation_id: req.conversation_id,
                outcome: ConverseOutcome::Misconfigured,
            };
        }

        let url = format!("{}/chat", self.base_url);
        let body = ChatRequest {
            prompt: req.prompt.to_string(),
            conversation_id: req.conversation_id.clone(),
        };
        debug!(url = %url, has_conversation_id = body.conversation_id.is_some(), "backend request");

        let response = match self
            .http
            .post(&url)
            .bearer_auth(req.access_token)
            .json(&body)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) if e.is_timeout() => {
                error!("timeout talking to backend: {e}");
                return ConverseReply {
                    speech: req.phrases.timeout_message.clone(),
                    conversation_id: req.conversation_id,
                    outcome: ConverseOutcome::Timeout,
                };
            }
            Err(e) => {
                error!("transport failure talking to backend: {e:?}");
                return ConverseReply {
                    speech: req.phrases.error_message.clone(),
                    conversation_id: req.conversation_id,
                    outcome: ConverseOutcome::Transport,
                };
            }
        };

        let status = response.status();
        debug!(status = %status, "backend response");

        let is_json = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("application/json"))
            .unwrap_or(false);
        if !is_json {
            let text = response.text().await.unwrap_or_default();
            error!(status = %status, "backend returned a non-JSON response: {text}");
            return ConverseReply {
                speech: req.phrases.error_message.clone(),
                conversation_id: req.conversation_id,
                outcome: ConverseOutcome::Transport,
            };
        }

        let reply: ChatReply = match response.json().await {
            Ok(reply) => reply,
            Err(e) => {
                error!("failed to decode backend response body: {e:?}");
                return ConverseReply {
                    speech: req.phrases.error_message.clone(),
                    conversation_id: req.conversation_id,
                    outcome: ConverseOutcome::Transport,
                };
            }
        };

        let mut conversation_id = req.conversation_id;
        let mut outcome = ConverseOutcome::Success;
        let speech = if status.is_success() && reply.response.is_some() {
            // The returned conversation token supersedes the held one;
            // absent the field, the prior token is retained.
            if let Some(id) = reply.conversation_id {
                conversation_id = Some(id);
            }
            reply.response.unwrap_or_default()
        } else if let Some(error_text) = reply.error {
            error!("backend reported an error: {error_text}");
            outcome = ConverseOutcome::BackendError;
            error_text
        } else {
            error!(status = %status, "backend response carried neither text nor an error");
            outcome = ConverseOutcome::BackendError;
            req.phrases.error_message.clone()
        };

        if speech.is_empty() {
            return match reply.message {
                Some(message) => {
                    error!("backend returned empty speech: {message}");
                    ConverseReply {
                        speech: normalize(
                            &format!("{} {}", req.phrases.error_message, message),
                            req.region,
                        ),
                        conversation_id,
                        outcome: ConverseOutcome::BackendError,
                    }
                }
                None => {
                    error!("backend returned empty speech and no message");
                    ConverseReply {
                        speech: req.phrases.error_message.clone(),
                        conversation_id,
                        outcome: ConverseOutcome::BackendError,
                    }
                }
            };
        }

        ConverseReply {
            speech: normalize(&speech, req.region),
            conversation_id,
            outcome,
        }
    }
}
