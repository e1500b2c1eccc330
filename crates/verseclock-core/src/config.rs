//! Configuration loading and typed config structures for the Verse Clock.
//!
//! Configuration lives in `verseclock-config.yaml`. Every field has a
//! default, so a missing file or a partial file is fine. A handful of
//! environment variables override the file afterwards.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

/// Fallback title when a verse has no book name.
pub const DEFAULT_FALLBACK_TITLE: &str = "God is good all the time, and all the time God is good";

/// Body text when the store has no verse at all.
pub const DEFAULT_NO_VERSE_TEXT: &str =
    "No verse available for this time. Please add more verses to the database.";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The configuration parsed but is not usable.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration, mirroring `verseclock-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClockConfig {
    /// Where verse data comes from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Tick, refresh, and display text settings.
    #[serde(default)]
    pub clock: ClockSettings,

    /// Log level and output format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ClockConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override file values:
    /// - `VERSES_URL` overrides `source.url`
    /// - `VERSES_PATH` overrides `source.path`
    /// - `VERSECLOCK_LOG_FORMAT` overrides `logging.format`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if it is not valid YAML, or
    /// [`ConfigError::Invalid`] if validation fails.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides and validate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] or [`ConfigError::Invalid`].
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config: Self = serde_yml::from_str(yaml)?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Defaults plus environment overrides, for when no file exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] if the overridden values fail
    /// validation.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment variable overrides in place.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Apply overrides using `lookup` to read each variable.
    ///
    /// An unrecognized `VERSECLOCK_LOG_FORMAT` is logged and ignored.
    pub fn apply_overrides_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup("VERSES_URL") {
            self.source.url = val;
        }
        if let Some(val) = lookup("VERSES_PATH") {
            self.source.path = Some(val);
        }
        if let Some(val) = lookup("VERSECLOCK_LOG_FORMAT") {
            match val.to_lowercase().as_str() {
                "json" => self.logging.format = LogFormat::Json,
                "pretty" => self.logging.format = LogFormat::Pretty,
                _ => warn!(
                    value = %val,
                    format = ?self.logging.format,
                    "unrecognized VERSECLOCK_LOG_FORMAT, keeping configured format"
                ),
            }
        }
    }

    /// Check values that would otherwise fail at runtime.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for a zero tick interval, a zero
    /// request timeout, or a missing verse source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.clock.tick_interval_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "clock.tick_interval_ms must be at least 1".to_owned(),
            });
        }
        if self.source.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid {
                reason: "source.request_timeout_ms must be at least 1".to_owned(),
            });
        }
        if self.source.path.is_none() && self.source.url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                reason: "either source.url or source.path must be set".to_owned(),
            });
        }
        Ok(())
    }
}

/// Verse data source configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceConfig {
    /// URL of the verse document, used when `path` is unset.
    #[serde(default = "default_source_url")]
    pub url: String,

    /// Local path to the verse document. Takes precedence over `url`.
    #[serde(default)]
    pub path: Option<String>,

    /// HTTP request timeout in milliseconds.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

impl SourceConfig {
    /// The request timeout as a [`Duration`].
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            url: default_source_url(),
            path: None,
            request_timeout_ms: default_request_timeout_ms(),
        }
    }
}

/// Tick, refresh, and display text settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClockSettings {
    /// Milliseconds between ticks.
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Whether to reload everything at each minute boundary.
    #[serde(default = "default_true")]
    pub full_refresh: bool,

    /// Title shown when a verse has a blank book name.
    #[serde(default = "default_fallback_title")]
    pub fallback_title: String,

    /// Body shown when no verse exists.
    #[serde(default = "default_no_verse_text")]
    pub no_verse_text: String,
}

impl ClockSettings {
    /// The tick interval as a [`Duration`], never zero.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }
}

impl Default for ClockSettings {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            full_refresh: true,
            fallback_title: default_fallback_title(),
            no_verse_text: default_no_verse_text(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` wins if set.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

// ---------------------------------------------------------------------------
// Default value functions (serde default requires named functions)
// ---------------------------------------------------------------------------

fn default_source_url() -> String {
    "http://localhost:8080/verses.json".to_owned()
}

const fn default_request_timeout_ms() -> u64 {
    10_000
}

const fn default_tick_interval_ms() -> u64 {
    1_000
}

const fn default_true() -> bool {
    true
}

fn default_fallback_title() -> String {
    DEFAULT_FALLBACK_TITLE.to_owned()
}

fn default_no_verse_text() -> String {
    DEFAULT_NO_VERSE_TEXT.to_owned()
}

fn default_log_level() -> String {
    "info".to_owned()
}
