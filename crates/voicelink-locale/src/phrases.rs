//! Typed phrase catalog built from a raw table.

use crate::table::PhraseTable;
use crate::LocaleError;

/// Every phrase a handler may speak. The enum exists so startup
/// verification and the catalog fields can never drift apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseKey {
    WelcomeMessage,
    ResumeMessage,
    ProcessingMessage,
    FollowupQuestion,
    HelpMessage,
    ExitMessages,
    ErrorMessage,
    TimeoutMessage,
}

impl PhraseKey {
    pub const ALL: [PhraseKey; 8] = [
        PhraseKey::WelcomeMessage,
        PhraseKey::ResumeMessage,
        PhraseKey::ProcessingMessage,
        PhraseKey::FollowupQuestion,
        PhraseKey::HelpMessage,
        PhraseKey::ExitMessages,
        PhraseKey::ErrorMessage,
        PhraseKey::TimeoutMessage,
    ];

    /// The `name` this key carries in a `.lang` resource.
    pub fn resource_name(self) -> &'static str {
        match self {
            PhraseKey::WelcomeMessage => "welcome_message",
            PhraseKey::ResumeMessage => "resume_message",
            PhraseKey::ProcessingMessage => "processing_message",
            PhraseKey::FollowupQuestion => "followup_question",
            PhraseKey::HelpMessage => "help_message",
            PhraseKey::ExitMessages => "exit_messages",
            PhraseKey::ErrorMessage => "error_message",
            PhraseKey::TimeoutMessage => "timeout_message",
        }
    }
}

/// One locale's complete spoken-phrase catalog.
#[derive(Debug, Clone)]
pub struct Phrases {
    pub welcome_message: String,
    pub resume_message: String,
    pub processing_message: String,
    pub followup_question: String,
    pub help_message: String,
    /// Semicolon-delimited list of goodbye phrases; the router picks one at
    /// random.
    pub exit_messages: String,
    pub error_message: String,
    pub timeout_message: String,
}

impl Phrases {
    /// Builds the catalog, failing on the first missing required phrase.
    pub fn from_table(locale: &str, table: &PhraseTable) -> Result<Self, LocaleError> {
        let required = |key: PhraseKey| -> Result<String, LocaleError> {
            table
                .get(key.resource_name())
                .map(str::to_string)
                .ok_or(LocaleError::MissingPhrase {
                    locale: locale.to_string(),
                    key: key.resource_name(),
                })
        };

        Ok(Self {
            welcome_message: required(PhraseKey::WelcomeMessage)?,
            resume_message: required(PhraseKey::ResumeMessage)?,
            processing_message: required(PhraseKey::ProcessingMessage)?,
            followup_question: required(PhraseKey::FollowupQuestion)?,
            help_message: required(PhraseKey::HelpMessage)?,
            exit_messages: required(PhraseKey::ExitMessages)?,
            error_message: required(PhraseKey::ErrorMessage)?,
            timeout_message: required(PhraseKey::TimeoutMessage)?,
        })
    }

    pub fn get(&self, key: PhraseKey) -> &str {
        match key {
            PhraseKey::WelcomeMessage => &self.welcome_message,
            PhraseKey::ResumeMessage => &self.resume_message,
            PhraseKey::ProcessingMessage => &self.processing_message,
            PhraseKey::FollowupQuestion => &self.followup_question,
            PhraseKey::HelpMessage => &self.help_message,
            PhraseKey::ExitMessages => &self.exit_messages,
            PhraseKey::ErrorMessage => &self.error_message,
            PhraseKey::TimeoutMessage => &self.timeout_message,
        }
    }

    /// Splits `exit_messages` into its individual phrases.
    pub fn exit_choices(&self) -> Vec<&str> {
        self.exit_messages
            .split(';')
            .map(str::trim)
            .filter(|phrase| !phrase.is_empty())
            .collect()
    }
}
