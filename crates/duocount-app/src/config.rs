#![forbid(unsafe_code)]

//! Application configuration, loadable from TOML or JSON.
//!
//! # Example (TOML)
//!
//! ```toml
//! initial_language = "pt"
//! fetch_delay_ms = 250
//! stale_content = "discard"
//! log_filter = "duocount=debug"
//!
//! [viewport]
//! width = 60
//! height = 8
//! ```
//!
//! Every field is optional; omitted fields take their defaults.

use std::path::Path;

use duocount_i18n::Language;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::app::StaleContentPolicy;

// ---------------------------------------------------------------------------
// AppConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Language shown at mount.
    #[serde(with = "language_code")]
    pub initial_language: Language,

    /// Simulated content fetch latency.
    pub fetch_delay_ms: u64,

    /// What to do with a fetch result that was superseded by a language change.
    pub stale_content: StaleContentPolicy,

    pub viewport: ViewportConfig,

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            initial_language: Language::English,
            fetch_delay_ms: 1000,
            stale_content: StaleContentPolicy::default(),
            viewport: ViewportConfig::default(),
            log_filter: "info".to_owned(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: u16,
    pub height: u16,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 48,
            height: 8,
        }
    }
}

impl AppConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Load from a JSON file on disk.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Load a file, picking the format from its extension (`.json` is JSON,
    /// anything else TOML), then validate it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::from_json_file(path)?
        } else {
            Self::from_toml_file(path)?
        };
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.viewport.width == 0 {
            errors.push("viewport.width must be > 0".to_owned());
        }
        if self.viewport.height == 0 {
            errors.push("viewport.height must be > 0".to_owned());
        }
        if self.log_filter.trim().is_empty() {
            errors.push("log_filter must not be empty".to_owned());
        }
        errors
    }

    pub fn fetch_delay(&self) -> Duration {
        Duration::from_millis(self.fetch_delay_ms)
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// JSON parse error.
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Serde helpers for Language
// ---------------------------------------------------------------------------

mod language_code {
    use duocount_i18n::Language;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(language: &Language, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(language.code())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Language, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults() {
        let config = AppConfig::default();
        assert_eq!(config.initial_language, Language::English);
        assert_eq!(config.fetch_delay(), Duration::from_millis(1000));
        assert_eq!(config.stale_content, StaleContentPolicy::Discard);
        assert_eq!(config.viewport, ViewportConfig { width: 48, height: 8 });
        assert!(config.validate().is_empty());
    }

    #[test]
    fn empty_toml_is_default() {
        let config = AppConfig::from_toml_str("").expect("empty toml");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
initial_language = "pt"
fetch_delay_ms = 250
stale_content = "overwrite"

[viewport]
width = 60
"#;
        let config = AppConfig::from_toml_str(toml).expect("valid toml");
        assert_eq!(config.initial_language, Language::Portuguese);
        assert_eq!(config.fetch_delay_ms, 250);
        assert_eq!(config.stale_content, StaleContentPolicy::Overwrite);
        assert_eq!(config.viewport.width, 60);
        assert_eq!(config.viewport.height, 8);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn unknown_language_is_a_parse_error() {
        let err = AppConfig::from_toml_str(r#"initial_language = "fr""#).unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
        assert!(err.to_string().contains("fr"));
    }

    #[test]
    fn json_round_trip() {
        let config = AppConfig {
            initial_language: Language::Portuguese,
            fetch_delay_ms: 5,
            ..AppConfig::default()
        };
        let json = serde_json::to_string(&config).expect("serialize");
        assert!(json.contains(r#""initial_language":"pt""#));
        assert!(json.contains(r#""stale_content":"discard""#));
        assert_eq!(AppConfig::from_json_str(&json).expect("parse"), config);
    }

    #[test]
    fn validate_catches_zero_viewport() {
        let config = AppConfig {
            viewport: ViewportConfig { width: 0, height: 0 },
            ..AppConfig::default()
        };
        let errors = config.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("width"));
        assert!(errors[1].contains("height"));
    }

    #[test]
    fn load_picks_format_by_extension() {
        let dir = tempfile::tempdir().expect("tempdir");

        let json_path = dir.path().join("duocount.json");
        let mut file = std::fs::File::create(&json_path).expect("create json");
        write!(file, r#"{{"fetch_delay_ms": 10}}"#).expect("write json");
        assert_eq!(AppConfig::load(&json_path).expect("load json").fetch_delay_ms, 10);

        let toml_path = dir.path().join("duocount.toml");
        std::fs::write(&toml_path, "fetch_delay_ms = 20\n").expect("write toml");
        assert_eq!(AppConfig::load(&toml_path).expect("load toml").fetch_delay_ms, 20);
    }

    #[test]
    fn load_rejects_invalid_config() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "[viewport]\nheight = 0\n").expect("write");
        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(ref errs) if errs.len() == 1));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = AppConfig::load("/nonexistent/duocount.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}
