//! Dispatch over the fixed handler set.

use crate::session::SessionStore;
use crate::{SkillConfig, SkillError};
use chrono::{FixedOffset, NaiveDate, Utc};
use rand::seq::SliceRandom;
use tracing::{debug, error, info};
use voicelink_backend::{ConversationClient, ConverseRequest};
use voicelink_locale::{region_of, LocaleStore, Phrases};
use voicelink_types::{Intent, Request, ResponseBuilder, SkillRequest, SkillResponse};

/// Intent name the platform's interaction model assigns to a spoken query.
pub const QUERY_INTENT: &str = "AnswerQueryIntent";

/// Name of the slot carrying the query text.
const QUERY_SLOT: &str = "query";

/// The deployment's home offset for "first launch of the day" greetings.
/// Fixed at UTC-3 regardless of where the process runs.
const HOME_OFFSET_HOURS: i32 = -3;

fn today_in_home_offset() -> NaiveDate {
    let offset =
        FixedOffset::east_opt(HOME_OFFSET_HOURS * 3600).expect("static offset is in range");
    Utc::now().with_timezone(&offset).date_naive()
}

/// Routes platform envelopes to handlers and absorbs every handler error
/// into a spoken response.
pub struct SkillRouter {
    locales: LocaleStore,
    sessions: SessionStore,
    client: ConversationClient,
    config: SkillConfig,
}

impl SkillRouter {
    pub fn new(locales: LocaleStore, client: ConversationClient, config: SkillConfig) -> Self {
        Self {
            locales,
            sessions: SessionStore::new(),
            client,
            config,
        }
    }

    /// Handles one envelope. Infallible at this boundary: handler errors are
    /// logged and converted into the localized error phrase, spoken and
    /// re-prompted.
    pub async fn handle(&self, envelope: SkillRequest) -> SkillResponse {
        let locale = request_locale(&envelope.request).to_string();

        let result = match &envelope.request {
            Request::Launch { .. } => self.handle_launch(&envelope, &locale),
            Request::Intent { intent, .. } => match intent.name.as_str() {
                QUERY_INTENT => self.handle_query(&envelope, &locale, intent).await,
                "AMAZON.HelpIntent" => self.handle_help(&locale),
                "AMAZON.CancelIntent" | "AMAZON.StopIntent" => self.handle_stop(&locale),
                other => Err(SkillError::UnknownIntent(other.to_string())),
            },
            Request::SessionEnded { reason } => {
                debug!(?reason, "session ended by the platform");
                Ok(ResponseBuilder::new().build())
            }
            Request::Other => Err(SkillError::UnknownRequest),
        };

        result.unwrap_or_else(|e| {
            error!("intent handling failed: {e:?}");
            let phrases = self.locales.phrases(&locale);
            ResponseBuilder::new()
                .speak(&phrases.error_message)
                .ask(&phrases.error_message)
                .build()
        })
    }

    fn handle_launch(
        &self,
        envelope: &SkillRequest,
        locale: &str,
    ) -> Result<SkillResponse, SkillError> {
        let phrases = self.locales.phrases(locale);

        if self.resolve_account_link(envelope).is_none() {
            error!("unable to resolve an account-linking token for launch");
            return Ok(ResponseBuilder::new()
                .speak(&phrases.error_message)
                .with_should_end_session(true)
                .build());
        }

        let today = today_in_home_offset();
        let mut first_of_day = false;
        self.sessions.update(envelope.user_id(), |state| {
            first_of_day = state.last_interaction_date != Some(today);
            state.last_interaction_date = Some(today);
        });

        if self.config.suppress_greeting {
            return Ok(ResponseBuilder::new().ask("").build());
        }

        let greeting = if first_of_day {
            &phrases.welcome_message
        } else {
            &phrases.resume_message
        };
        Ok(ResponseBuilder::new().speak(greeting).ask(greeting).build())
    }

    async fn handle_query(
        &self,
        envelope: &SkillRequest,
        locale: &str,
        intent: &Intent,
    ) -> Result<SkillResponse, SkillError> {
        let phrases = self.locales.phrases(locale);

        let token = self
            .resolve_account_link(envelope)
            .ok_or(SkillError::MissingAccountLink)?;
        let query = intent
            .slot_value(QUERY_SLOT)
            .filter(|value| !value.trim().is_empty())
            .ok_or(SkillError::MissingSlot(QUERY_SLOT))?;

        info!("query received from the platform: {query}");

        // Stage the processing phrase while the backend call runs; the final
        // speak replaces it, matching the platform SDK's builder semantics.
        let builder = ResponseBuilder::new()
            .speak(&phrases.processing_message)
            .with_should_end_session(false);

        let held = self.sessions.get(envelope.user_id()).conversation_id;
        let reply = self
            .client
            .converse(ConverseRequest {
                prompt: query,
                conversation_id: held,
                access_token: &token,
                region: region_of(locale),
                phrases,
            })
            .await;

        self.sessions.update(envelope.user_id(), |state| {
            state.conversation_id = reply.conversation_id.clone();
        });

        debug!(multi_turn = self.config.multi_turn, outcome = ?reply.outcome, "query answered");
        if self.config.multi_turn {
            Ok(builder
                .speak(reply.speech)
                .ask(&phrases.followup_question)
                .build())
        } else {
            Ok(builder
                .speak(reply.speech)
                .with_should_end_session(true)
                .build())
        }
    }

    fn handle_help(&self, locale: &str) -> Result<SkillResponse, SkillError> {
        let phrases = self.locales.phrases(locale);
        Ok(ResponseBuilder::new()
            .speak(&phrases.help_message)
            .ask(&phrases.help_message)
            .build())
    }

    fn handle_stop(&self, locale: &str) -> Result<SkillResponse, SkillError> {
        let phrases = self.locales.phrases(locale);
        let goodbye = pick_exit_phrase(phrases);
        Ok(ResponseBuilder::new()
            .speak(goodbye)
            .with_should_end_session(true)
            .build())
    }

    /// The platform's linked-account token, or the configured debug token
    /// when debug mode is enabled.
    fn resolve_account_link(&self, envelope: &SkillRequest) -> Option<String> {
        if let Some(token) = envelope.access_token() {
            return Some(token.to_string());
        }
        if self.config.debug {
            return self.config.debug_token.clone();
        }
        None
    }
}

fn request_locale(request: &Request) -> &str {
    match request {
        Request::Launch { locale } | Request::Intent { locale, .. } => locale,
        Request::SessionEnded { .. } | Request::Other => "",
    }
}

fn pick_exit_phrase(phrases: &Phrases) -> &str {
    let choices = phrases.exit_choices();
    choices
        .choose(&mut rand::thread_rng())
        .copied()
        .unwrap_or(&phrases.exit_messages)
}
