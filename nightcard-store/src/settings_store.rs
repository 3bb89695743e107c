//! User preferences store.
//!
//! Manages user settings with persistence.

use nightcard_core::DEFAULT_EMOTION;
use nightcard_providers::gemini::{DEFAULT_MODEL, GEMINI_API_BASE};
use nightcard_providers::prompt::{DEFAULT_MAX_MESSAGE_CHARS, DEFAULT_TEMPERATURE, DEFAULT_TOP_P};
use nightcard_providers::{GeminiConfig, GenerationParams};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::persistence::{default_settings_path, load_json, save_json};

/// Where the share screen points.
pub const DEFAULT_SHARE_URL: &str = "https://xiamao233.github.io/peace2.0/";

/// Default request timeout in seconds.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Gemini model name.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Nucleus-sampling threshold.
    pub top_p: f32,

    /// Length bound written into the instruction.
    pub max_message_chars: u32,

    /// Emotion used when none is given.
    pub default_emotion: String,

    /// Gemini API base URL.
    pub api_base: String,

    /// HTTP timeout for the generation request.
    pub request_timeout_secs: u64,

    /// Link encoded in the share QR code.
    pub share_url: String,

    /// Environment variable checked first for the API key.
    pub api_key_env: Option<String>,

    /// Log level.
    pub log_level: LogLevel,

    /// Colored terminal output.
    pub use_colors: bool,

    /// Never call the generation service.
    pub offline: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
            default_emotion: DEFAULT_EMOTION.to_string(),
            api_base: GEMINI_API_BASE.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            share_url: DEFAULT_SHARE_URL.to_string(),
            api_key_env: None,
            log_level: LogLevel::default(),
            use_colors: true,
            offline: false,
        }
    }
}

impl Settings {
    /// Keys accepted by [`Settings::set_field`].
    pub const KEYS: &'static [&'static str] = &[
        "model",
        "temperature",
        "top_p",
        "max_message_chars",
        "default_emotion",
        "api_base",
        "request_timeout_secs",
        "share_url",
        "api_key_env",
        "log_level",
        "use_colors",
        "offline",
    ];

    /// Builds the Gemini provider configuration.
    pub fn gemini_config(&self) -> GeminiConfig {
        GeminiConfig {
            api_base: self.api_base.clone(),
            model: self.model.clone(),
            params: GenerationParams {
                temperature: self.temperature,
                top_p: self.top_p,
                max_message_chars: self.max_message_chars,
            },
        }
    }

    /// HTTP timeout as a duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Sets one field from its string form.
    ///
    /// `api_key_env` accepts an empty string to clear it.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for unknown keys or unparsable values.
    pub fn set_field(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let value = value.trim();
        match key {
            "model" => self.model = non_empty(key, value)?,
            "temperature" => self.temperature = parse_in_range(key, value, 0.0, 2.0)?,
            "top_p" => self.top_p = parse_in_range(key, value, 0.0, 1.0)?,
            "max_message_chars" => self.max_message_chars = parse_positive(key, value)?,
            "default_emotion" => self.default_emotion = non_empty(key, value)?,
            "api_base" => self.api_base = non_empty(key, value)?.trim_end_matches('/').to_string(),
            "request_timeout_secs" => self.request_timeout_secs = parse_positive(key, value)?,
            "share_url" => self.share_url = non_empty(key, value)?,
            "api_key_env" => {
                self.api_key_env = (!value.is_empty()).then(|| value.to_string());
            }
            "log_level" => self.log_level = value.parse()?,
            "use_colors" => self.use_colors = parse(key, value)?,
            "offline" => self.offline = parse(key, value)?,
            _ => {
                return Err(StoreError::Config(format!(
                    "unknown setting '{key}' (expected one of: {})",
                    Self::KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }
}

fn invalid(key: &str, value: &str) -> StoreError {
    StoreError::Config(format!("invalid value '{value}' for '{key}'"))
}

fn non_empty(key: &str, value: &str) -> Result<String, StoreError> {
    if value.is_empty() {
        return Err(invalid(key, value));
    }
    Ok(value.to_string())
}

fn parse<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, StoreError> {
    value.parse().map_err(|_| invalid(key, value))
}

fn parse_positive<T>(key: &str, value: &str) -> Result<T, StoreError>
where
    T: std::str::FromStr + Default + PartialOrd,
{
    let parsed: T = parse(key, value)?;
    if parsed <= T::default() {
        return Err(invalid(key, value));
    }
    Ok(parsed)
}

fn parse_in_range(key: &str, value: &str, min: f32, max: f32) -> Result<f32, StoreError> {
    let parsed: f32 = parse(key, value)?;
    if !(min..=max).contains(&parsed) {
        return Err(invalid(key, value));
    }
    Ok(parsed)
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

impl std::str::FromStr for LogLevel {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            other => Err(StoreError::Config(format!("unknown log level '{other}'"))),
        }
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    load_warning: Option<String>,
}

impl SettingsStore {
    /// Creates a store holding default settings.
    pub fn new(path: PathBuf) -> Self {
        Self::with_settings(path, Settings::default())
    }

    fn with_settings(path: PathBuf, settings: Settings) -> Self {
        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
            load_warning: None,
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing or malformed file yields defaults. For a malformed file
    /// the reason is kept in [`SettingsStore::load_warning`], since logging
    /// is usually not set up yet when settings are loaded.
    ///
    /// # Errors
    ///
    /// Returns error if the file's existence cannot be checked.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        if !tokio::fs::try_exists(&path).await? {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            return Ok(Self::new(path));
        }

        info!(path = %path.display(), "Loading settings");
        match load_json(&path).await {
            Ok(settings) => Ok(Self::with_settings(path, settings)),
            Err(e) => {
                warn!(error = %e, "Failed to load settings, using defaults");
                let warning = format!(
                    "ignoring unreadable settings file {}: {e}",
                    path.display()
                );
                let mut store = Self::new(path);
                store.load_warning = Some(warning);
                Ok(store)
            }
        }
    }

    /// Why the settings file was ignored on load, if it was.
    pub fn load_warning(&self) -> Option<&str> {
        self.load_warning.as_deref()
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings in place.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        let mut settings = self.settings.write().await;
        f(&mut settings);
    }

    /// Sets one field by name.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Config`] for unknown keys or invalid values;
    /// the settings are left unchanged.
    pub async fn set_field(&self, key: &str, value: &str) -> Result<(), StoreError> {
        {
            let mut settings = self.settings.write().await;
            let mut updated = settings.clone();
            updated.set_field(key, value)?;
            *settings = updated;
        }
        debug!(key, value, "Setting changed");
        Ok(())
    }

    /// Replaces all settings with defaults.
    pub async fn reset_to_defaults(&self) {
        self.update(|s| *s = Settings::default()).await;
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Returns the settings file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the log level.
    pub async fn log_level(&self) -> LogLevel {
        self.settings.read().await.log_level
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.model, "gemini-3-flash-preview");
        assert_eq!(settings.default_emotion, "生气");
        assert_eq!(settings.max_message_chars, 50);
        assert_eq!(settings.share_url, "https://xiamao233.github.io/peace2.0/");
        assert!(!settings.offline);
    }

    #[test]
    fn test_gemini_config_carries_params() {
        let mut settings = Settings::default();
        settings.temperature = 0.5;
        settings.max_message_chars = 30;

        let config = settings.gemini_config();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert!((config.params.temperature - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.params.max_message_chars, 30);
    }

    #[test]
    fn test_set_field() {
        let mut settings = Settings::default();
        settings.set_field("offline", "true").unwrap();
        settings.set_field("log_level", "DEBUG").unwrap();
        settings.set_field("api_base", "http://localhost:8080/").unwrap();
        settings.set_field("api_key_env", "MY_KEY").unwrap();

        assert!(settings.offline);
        assert_eq!(settings.log_level, LogLevel::Debug);
        assert_eq!(settings.api_base, "http://localhost:8080");
        assert_eq!(settings.api_key_env.as_deref(), Some("MY_KEY"));

        settings.set_field("api_key_env", "").unwrap();
        assert_eq!(settings.api_key_env, None);
    }

    #[test]
    fn test_set_field_rejects() {
        let mut settings = Settings::default();
        assert!(settings.set_field("nope", "1").is_err());
        assert!(settings.set_field("top_p", "1.5").is_err());
        assert!(settings.set_field("max_message_chars", "0").is_err());
        assert!(settings.set_field("model", "  ").is_err());
        assert!(settings.set_field("use_colors", "maybe").is_err());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"offline": true}"#).unwrap();
        assert!(settings.offline);
        assert_eq!(settings.model, DEFAULT_MODEL);
    }

    #[test]
    fn test_log_level_display_round_trip() {
        for level in [LogLevel::Error, LogLevel::Warn, LogLevel::Info, LogLevel::Debug, LogLevel::Trace] {
            assert_eq!(level.to_string().parse::<LogLevel>().unwrap(), level);
        }
    }

    #[tokio::test]
    async fn test_store_set_field_keeps_settings_on_error() {
        let store = SettingsStore::new(PathBuf::from("/nonexistent/settings.json"));

        store.set_field("default_emotion", "委屈").await.unwrap();
        assert_eq!(store.get().await.default_emotion, "委屈");

        assert!(store.set_field("temperature", "hot").await.is_err());
        let settings = store.get().await;
        assert_eq!(settings.default_emotion, "委屈");
        assert!((settings.temperature - DEFAULT_TEMPERATURE).abs() < f32::EPSILON);
        assert!(store.load_warning().is_none());
    }
}
