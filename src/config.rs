//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::responder::{KeywordEntry, KeywordResponder, KeywordTable, FALLBACK_RESPONSE, GREETING};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub assistant: AssistantConfig,

    #[serde(default)]
    pub commands: CommandConfig,

    #[serde(default)]
    pub speech: SpeechConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Chat assistant configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AssistantConfig {
    /// Simulated "thinking" time before a reply (ms)
    #[serde(default = "default_thinking_delay")]
    pub thinking_delay_ms: u64,

    /// Pause between a voice transcript and sending it (ms)
    #[serde(default = "default_autosend_delay")]
    pub voice_autosend_delay_ms: u64,

    #[serde(default = "default_greeting")]
    pub greeting: String,

    #[serde(default = "default_fallback")]
    pub fallback_response: String,

    /// Entries appended after the built-in keyword table
    #[serde(default)]
    pub keywords: Vec<KeywordEntry>,
}

fn default_thinking_delay() -> u64 {
    1000
}

fn default_autosend_delay() -> u64 {
    500
}

fn default_greeting() -> String {
    GREETING.to_string()
}

fn default_fallback() -> String {
    FALLBACK_RESPONSE.to_string()
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            thinking_delay_ms: default_thinking_delay(),
            voice_autosend_delay_ms: default_autosend_delay(),
            greeting: default_greeting(),
            fallback_response: default_fallback(),
            keywords: Vec::new(),
        }
    }
}

impl AssistantConfig {
    pub fn thinking_delay(&self) -> Duration {
        Duration::from_millis(self.thinking_delay_ms)
    }

    pub fn autosend_delay(&self) -> Duration {
        Duration::from_millis(self.voice_autosend_delay_ms)
    }

    /// Build the responder: built-in table, then configured entries
    pub fn responder(&self) -> Result<KeywordResponder, ConfigError> {
        let mut table = KeywordTable::builtin();
        table
            .extend(self.keywords.iter().cloned().map(|e| KeywordEntry::new(e.keyword, e.response)))
            .map_err(|e| ConfigError::Invalid(e.to_string()))?;
        Ok(KeywordResponder::new(table).fallback(self.fallback_response.clone()))
    }
}

/// Voice command configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CommandConfig {
    /// Delay before navigating to the selected view (ms)
    #[serde(default = "default_navigation_delay")]
    pub navigation_delay_ms: u64,

    /// Cancel a pending navigation when a newer command arrives
    #[serde(default)]
    pub supersede_pending: bool,
}

fn default_navigation_delay() -> u64 {
    2000
}

impl Default for CommandConfig {
    fn default() -> Self {
        Self {
            navigation_delay_ms: default_navigation_delay(),
            supersede_pending: false,
        }
    }
}

impl CommandConfig {
    pub fn navigation_delay(&self) -> Duration {
        Duration::from_millis(self.navigation_delay_ms)
    }
}

/// Speech service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SpeechConfig {
    #[serde(default = "default_lang")]
    pub lang: String,

    #[serde(default = "default_unit")]
    pub rate: f32,

    #[serde(default = "default_unit")]
    pub pitch: f32,

    #[serde(default = "default_unit")]
    pub volume: f32,

    #[serde(default = "default_enabled")]
    pub recognition_enabled: bool,

    #[serde(default = "default_enabled")]
    pub synthesis_enabled: bool,
}

fn default_lang() -> String {
    "en-US".to_string()
}

fn default_unit() -> f32 {
    1.0
}

fn default_enabled() -> bool {
    true
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            lang: default_lang(),
            rate: default_unit(),
            pitch: default_unit(),
            volume: default_unit(),
            recognition_enabled: default_enabled(),
            synthesis_enabled: default_enabled(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Standard config file locations, most specific first
    pub fn default_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("healthdash").join("config.toml"));
        }
        paths.push(PathBuf::from("/etc/healthdash/config.toml"));
        paths.push(PathBuf::from("./config.toml"));
        paths
    }

    /// Load from default locations or environment
    pub fn load_default() -> Result<Self, ConfigError> {
        Self::load_first(&Self::default_paths())
    }

    /// Load the first file of `paths` that exists, else defaults plus environment
    ///
    /// A file that exists but does not load is an error, not a reason to
    /// fall back to defaults.
    pub fn load_first(paths: &[PathBuf]) -> Result<Self, ConfigError> {
        match paths.iter().find(|path| path.exists()) {
            Some(path) => Self::load_with_env(path),
            None => {
                let config = Self::from_env();
                config.validate()?;
                Ok(config)
            }
        }
    }

    /// Check values that would otherwise surface as odd runtime behavior
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(entry) = self
            .assistant
            .keywords
            .iter()
            .find(|e| e.keyword.trim().is_empty())
        {
            return Err(ConfigError::Invalid(format!(
                "keyword for response {:?} is empty",
                entry.response
            )));
        }

        let speech = &self.speech;
        if !(0.1..=10.0).contains(&speech.rate) {
            return Err(ConfigError::Invalid(format!(
                "speech.rate must be between 0.1 and 10, got {}",
                speech.rate
            )));
        }
        if !(0.0..=2.0).contains(&speech.pitch) {
            return Err(ConfigError::Invalid(format!(
                "speech.pitch must be between 0 and 2, got {}",
                speech.pitch
            )));
        }
        if !(0.0..=1.0).contains(&speech.volume) {
            return Err(ConfigError::Invalid(format!(
                "speech.volume must be between 0 and 1, got {}",
                speech.volume
            )));
        }

        Ok(())
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        // Assistant overrides
        if let Some(ms) = env_parse("HEALTHDASH_THINKING_DELAY_MS") {
            self.assistant.thinking_delay_ms = ms;
        }
        if let Some(ms) = env_parse("HEALTHDASH_AUTOSEND_DELAY_MS") {
            self.assistant.voice_autosend_delay_ms = ms;
        }

        // Command overrides
        if let Some(ms) = env_parse("HEALTHDASH_NAVIGATION_DELAY_MS") {
            self.commands.navigation_delay_ms = ms;
        }
        if let Some(supersede) = env_parse("HEALTHDASH_SUPERSEDE_PENDING") {
            self.commands.supersede_pending = supersede;
        }

        // Speech overrides
        if let Ok(lang) = std::env::var("HEALTHDASH_SPEECH_LANG") {
            self.speech.lang = lang;
        }

        // Logging overrides
        if let Ok(level) = std::env::var("HEALTHDASH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("HEALTHDASH_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring {}={:?}: not a valid value", key, raw);
            None
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# healthdash configuration
#
# Environment variables override these settings:
# - HEALTHDASH_THINKING_DELAY_MS
# - HEALTHDASH_AUTOSEND_DELAY_MS
# - HEALTHDASH_NAVIGATION_DELAY_MS
# - HEALTHDASH_SUPERSEDE_PENDING
# - HEALTHDASH_SPEECH_LANG
# - HEALTHDASH_LOG_LEVEL
# - HEALTHDASH_LOG_FORMAT

[assistant]
# Simulated thinking time before a chat reply (ms)
thinking_delay_ms = 1000

# Pause between a voice transcript and auto-sending it (ms)
voice_autosend_delay_ms = 500

# First message of every chat
greeting = "Hello! I'm your AI health assistant. How can I help you today?"

# Reply when no keyword matches
fallback_response = "I don't have specific information about that. Consider consulting your healthcare provider for personalized advice."

# Extra keywords, appended after the built-in table. When several keywords
# match a question the LAST one in table order wins, so these override the
# built-ins.
# [[assistant.keywords]]
# keyword = "cold"
# response = "Rest, drink fluids, and see a doctor if a fever lasts more than three days."

[commands]
# Delay before navigating to the selected view (ms)
navigation_delay_ms = 2000

# Cancel a pending navigation when a newer command arrives
supersede_pending = false

[speech]
lang = "en-US"
rate = 1.0
pitch = 1.0
volume = 1.0
recognition_enabled = true
synthesis_enabled = true

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.assistant.thinking_delay(), Duration::from_millis(1000));
        assert_eq!(config.assistant.autosend_delay(), Duration::from_millis(500));
        assert_eq!(config.commands.navigation_delay(), Duration::from_millis(2000));
        assert!(!config.commands.supersede_pending);
        assert_eq!(config.speech.lang, "en-US");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_generated_config_parses() {
        let config: Config = toml::from_str(&generate_default_config()).unwrap();
        assert_eq!(config.assistant.greeting, GREETING);
        assert_eq!(config.assistant.fallback_response, FALLBACK_RESPONSE);
        assert_eq!(config.commands.navigation_delay_ms, 2000);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
[assistant]
thinking_delay_ms = 10

[[assistant.keywords]]
keyword = "Cold"
response = "Rest and stay warm."

[commands]
supersede_pending = true
"#
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.assistant.thinking_delay_ms, 10);
        assert_eq!(config.assistant.voice_autosend_delay_ms, 500);
        assert!(config.commands.supersede_pending);

        let responder = config.assistant.responder().unwrap();
        assert_eq!(responder.table().len(), 7);
        assert_eq!(
            responder.respond("I have a headache and a cold"),
            "Rest and stay warm."
        );
    }

    #[test]
    fn test_load_first_takes_first_existing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let present = dir.path().join("config.toml");
        std::fs::write(&present, "[commands]\nsupersede_pending = true\n").unwrap();

        let config = Config::load_first(&[missing.clone(), present]).unwrap();
        assert!(config.commands.supersede_pending);

        let config = Config::load_first(&[missing]).unwrap();
        assert!(!config.commands.supersede_pending);
    }

    #[test]
    fn test_load_first_reports_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("config.toml");
        let fallback = dir.path().join("other.toml");
        std::fs::write(&broken, "[assistant\n").unwrap();
        std::fs::write(&fallback, "").unwrap();

        let err = Config::load_first(&[broken.clone(), fallback]).unwrap_err();
        match err {
            ConfigError::Parse { path, .. } => assert_eq!(path, broken),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/healthdash.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[commands]\nnavigation_delay_ms = \"soon\"\n").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_rejects_empty_keyword() {
        let mut config = Config::default();
        config.assistant.keywords.push(KeywordEntry {
            keyword: " ".to_string(),
            response: "everything".to_string(),
        });
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
        assert!(config.assistant.responder().is_err());
    }

    #[test]
    fn test_rejects_out_of_range_voice() {
        let mut config = Config::default();
        config.speech.volume = 1.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = Config::default();
        config.speech.rate = 0.0;
        assert!(config.validate().is_err());
    }
}
