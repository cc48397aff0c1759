use serde::Deserialize;
use std::time::Duration;

fn default_timeout_secs() -> u64 {
    10
}

/// Connection settings for the conversational backend.
#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    /// Base URL of the backend; the client posts to `{base_url}/chat`.
    /// Empty means unconfigured and every call fails fast with the error
    /// phrase.
    #[serde(default)]
    pub base_url: String,

    /// Request timeout in seconds for the round trip.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl BackendConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Base URL with trailing slashes trimmed, so path joining is uniform.
    pub fn trimmed_base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}
