//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;
use voicelink_backend::BackendConfig;
use voicelink_skill::SkillConfig;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Conversational backend settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Voice-skill settings.
    #[serde(default)]
    pub skill: SkillSection,

    /// CLI proxy endpoint settings.
    #[serde(default)]
    pub proxy: ProxyConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Voice-skill configuration: where phrase resources live plus the
/// behavior switches consumed by the intent router.
#[derive(Debug, Clone, Deserialize)]
pub struct SkillSection {
    /// Directory of `*.lang` phrase resources, loaded at startup.
    #[serde(default = "default_locale_dir")]
    pub locale_dir: String,

    #[serde(flatten)]
    pub behavior: SkillConfig,
}

/// CLI proxy configuration.
#[derive(Clone, Deserialize)]
pub struct ProxyConfig {
    /// Shared secret callers must present in `X-API-Key`. Empty means the
    /// proxy endpoint is unconfigured and refuses every request.
    #[serde(default)]
    pub api_key: String,

    /// The conversational CLI binary to invoke.
    #[serde(default = "default_tool")]
    pub tool: String,

    /// Hard ceiling on subprocess runtime in seconds.
    #[serde(default = "default_proxy_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("api_key", &"[REDACTED]")
            .field("tool", &self.tool)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "voicelink_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    3000
}

fn default_locale_dir() -> String {
    "locale".to_string()
}

fn default_tool() -> String {
    "gemini".to_string()
}

fn default_proxy_timeout_secs() -> u64 {
    60
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Default for SkillSection {
    fn default() -> Self {
        Self {
            locale_dir: default_locale_dir(),
            behavior: SkillConfig::default(),
        }
    }
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            tool: default_tool(),
            timeout_secs: default_proxy_timeout_secs(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

fn env_flag(value: &str) -> bool {
    value == "true" || value == "1"
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `VOICELINK_HOST` overrides `server.host`
/// - `VOICELINK_PORT` overrides `server.port`
/// - `VOICELINK_BACKEND_URL` overrides `backend.base_url`
/// - `VOICELINK_LOCALE_DIR` overrides `skill.locale_dir`
/// - `VOICELINK_DEBUG` overrides `skill.debug` (set to "true" to enable)
/// - `VOICELINK_DEBUG_TOKEN` overrides `skill.debug_token`
/// - `VOICELINK_MULTI_TURN` overrides `skill.multi_turn`
/// - `VOICELINK_SUPPRESS_GREETING` overrides `skill.suppress_greeting`
/// - `VOICELINK_PROXY_API_KEY` overrides `proxy.api_key`
/// - `VOICELINK_PROXY_TOOL` overrides `proxy.tool`
/// - `VOICELINK_LOG_LEVEL` overrides `logging.level`
/// - `VOICELINK_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    // Environment variable overrides
    if let Ok(host) = std::env::var("VOICELINK_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Ok(port) = std::env::var("VOICELINK_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Ok(url) = std::env::var("VOICELINK_BACKEND_URL") {
        config.backend.base_url = url;
    }
    if let Ok(dir) = std::env::var("VOICELINK_LOCALE_DIR") {
        config.skill.locale_dir = dir;
    }
    if let Ok(debug) = std::env::var("VOICELINK_DEBUG") {
        config.skill.behavior.debug = env_flag(&debug);
    }
    if let Ok(token) = std::env::var("VOICELINK_DEBUG_TOKEN") {
        config.skill.behavior.debug_token = Some(token);
    }
    if let Ok(multi_turn) = std::env::var("VOICELINK_MULTI_TURN") {
        config.skill.behavior.multi_turn = env_flag(&multi_turn);
    }
    if let Ok(suppress) = std::env::var("VOICELINK_SUPPRESS_GREETING") {
        config.skill.behavior.suppress_greeting = env_flag(&suppress);
    }
    if let Ok(key) = std::env::var("VOICELINK_PROXY_API_KEY") {
        config.proxy.api_key = key;
    }
    if let Ok(tool) = std::env::var("VOICELINK_PROXY_TOOL") {
        config.proxy.tool = tool;
    }
    if let Ok(level) = std::env::var("VOICELINK_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Ok(json) = std::env::var("VOICELINK_LOG_JSON") {
        config.logging.json = env_flag(&json);
    }

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // load_config reads the process environment, and tests in one binary
    // run in parallel threads; tests that touch VOICELINK_* variables take
    // this lock so they cannot observe each other's values.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn defaults_without_a_file() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = load_config(None).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.proxy.tool, "gemini");
        assert_eq!(config.proxy.timeout_secs, 60);
        assert_eq!(config.skill.locale_dir, "locale");
        assert!(!config.skill.behavior.multi_turn);
        assert!(config.backend.base_url.is_empty());
    }

    #[test]
    fn parses_toml_sections() {
        let contents = r#"
            [server]
            port = 8080

            [backend]
            base_url = "https://backend.example/api/"
            timeout_secs = 5

            [skill]
            locale_dir = "phrases"
            multi_turn = true
            debug = true
            debug_token = "dev-tok"

            [proxy]
            api_key = "secret"
            tool = "/usr/local/bin/gemini"
        "#;
        let config: Config = toml::from_str(contents).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.backend.trimmed_base_url(), "https://backend.example/api");
        assert_eq!(config.skill.locale_dir, "phrases");
        assert!(config.skill.behavior.multi_turn);
        assert_eq!(config.skill.behavior.debug_token.as_deref(), Some("dev-tok"));
        assert_eq!(config.proxy.api_key, "secret");
        assert_eq!(config.proxy.tool, "/usr/local/bin/gemini");
    }

    #[test]
    fn environment_overrides_beat_file_values() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let vars = [
            ("VOICELINK_PORT", "9999"),
            ("VOICELINK_BACKEND_URL", "https://env.example"),
            ("VOICELINK_PROXY_API_KEY", "env-secret"),
            ("VOICELINK_DEBUG", "true"),
            ("VOICELINK_MULTI_TURN", "1"),
            ("VOICELINK_LOG_LEVEL", "debug"),
        ];
        for (name, value) in vars {
            std::env::set_var(name, value);
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[server]\nport = 8080\n\n[proxy]\napi_key = \"file-secret\"\n",
        )
        .unwrap();
        let config = load_config(path.to_str());

        for (name, _) in vars {
            std::env::remove_var(name);
        }

        let config = config.unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.backend.base_url, "https://env.example");
        assert_eq!(config.proxy.api_key, "env-secret");
        assert!(config.skill.behavior.debug);
        assert!(config.skill.behavior.multi_turn);
        assert_eq!(config.logging.level, "debug");
        // Values with no override keep their file or default settings.
        assert_eq!(config.proxy.tool, "gemini");
        assert!(!config.skill.behavior.suppress_greeting);
    }

    #[test]
    fn malformed_numeric_override_is_ignored() {
        let _env = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        std::env::set_var("VOICELINK_PORT", "not-a-port");
        let config = load_config(None);
        std::env::remove_var("VOICELINK_PORT");
        assert_eq!(config.unwrap().server.port, 3000);
    }

    #[test]
    fn proxy_debug_output_redacts_the_key() {
        let proxy = ProxyConfig {
            api_key: "very-secret".to_string(),
            ..Default::default()
        };
        let rendered = format!("{proxy:?}");
        assert!(!rendered.contains("very-secret"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
