use serde::Deserialize;

/// Behavior switches for the intent handlers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillConfig {
    /// Enables the debug-token fallback when the platform supplies no
    /// account-linking credential.
    #[serde(default)]
    pub debug: bool,

    /// Credential used in place of account linking when `debug` is set.
    #[serde(default)]
    pub debug_token: Option<String>,

    /// After answering a query, re-prompt with the follow-up question
    /// instead of ending the session.
    #[serde(default)]
    pub multi_turn: bool,

    /// Open the session silently on launch instead of greeting.
    #[serde(default)]
    pub suppress_greeting: bool,
}
