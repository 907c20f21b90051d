use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::domain::value_objects::metric::Metric;
use crate::domain::value_objects::thresholds::ThresholdSet;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level application configuration loaded from TOML.
///
/// Scalar keys come before the tables so the struct serializes back to valid TOML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Seconds between two monitoring ticks
    #[serde(default = "default_interval")]
    pub interval: u64,
    /// Seconds a metric stays silent after an alert
    #[serde(default = "default_alert_cooldown")]
    pub alert_cooldown: u64,
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default)]
    pub email: EmailConfig,
}

/// Alert thresholds, as percentages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    #[serde(default = "default_threshold")]
    pub cpu: f64,
    #[serde(default = "default_threshold")]
    pub memory: f64,
    #[serde(default = "default_threshold")]
    pub disk: f64,
}

/// SMTP submission settings. The sender doubles as the login user.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailConfig {
    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    #[serde(default = "default_sender")]
    pub sender: String,
    #[serde(default = "default_password")]
    pub password: String,
    #[serde(default = "default_recipient")]
    pub recipient: String,
}

// Manual impl keeps the password out of logs.
impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_server", &self.smtp_server)
            .field("smtp_port", &self.smtp_port)
            .field("sender", &self.sender)
            .field("password", &"***")
            .field("recipient", &self.recipient)
            .finish()
    }
}

// --- Defaults ---

const fn default_interval() -> u64 {
    300
}

const fn default_alert_cooldown() -> u64 {
    3600
}

const fn default_threshold() -> f64 {
    80.0
}

fn default_smtp_server() -> String {
    "smtp.gmail.com".into()
}

const fn default_smtp_port() -> u16 {
    587
}

fn default_sender() -> String {
    "your-email@gmail.com".into()
}

fn default_password() -> String {
    "your-app-password".into()
}

fn default_recipient() -> String {
    "admin@example.com".into()
}

// --- Default impls ---

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            interval: default_interval(),
            alert_cooldown: default_alert_cooldown(),
            thresholds: ThresholdConfig::default(),
            email: EmailConfig::default(),
        }
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            cpu: default_threshold(),
            memory: default_threshold(),
            disk: default_threshold(),
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_server: default_smtp_server(),
            smtp_port: default_smtp_port(),
            sender: default_sender(),
            password: default_password(),
            recipient: default_recipient(),
        }
    }
}

impl EmailConfig {
    /// True while the built-in placeholder credentials are still in place.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.sender == default_sender() || self.password == default_password()
    }
}

// --- AppConfig methods ---

impl AppConfig {
    /// Load from a specific path
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the TOML content is invalid.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// Load from `path`, or from the default location when `None`.
    ///
    /// Any load failure falls back to [`AppConfig::default`] and is logged as a
    /// warning. The returned path is the file that was tried.
    #[must_use]
    pub fn load_or_default(path: Option<&Path>) -> (Self, PathBuf) {
        let path = path.map_or_else(Self::config_path, expand_path);
        match Self::load_from(&path) {
            Ok(config) => {
                tracing::info!("Configuration loaded from {}", path.display());
                (config, path)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load config ({e}); using built-in defaults (thresholds {}/{}/{}%, placeholder email settings)",
                    default_threshold(),
                    default_threshold(),
                    default_threshold()
                );
                (Self::default(), path)
            }
        }
    }

    /// Check invariants the monitor relies on.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if a threshold is not a finite percentage
    /// in [0, 100] or the interval is zero.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let thresholds = ThresholdSet::from(&self.thresholds);
        for metric in Metric::ALL {
            let limit = thresholds.limit(metric);
            if !limit.is_finite() || !(0.0..=100.0).contains(&limit) {
                return Err(ConfigError::Invalid(format!(
                    "thresholds.{metric} must be between 0 and 100, got {limit}"
                )));
            }
        }
        if self.interval == 0 {
            return Err(ConfigError::Invalid(
                "interval must be at least 1 second".into(),
            ));
        }
        Ok(())
    }

    /// Replace the file's `interval` with the command-line value, if any.
    ///
    /// Call before [`AppConfig::validate`] so the value that will actually
    /// drive the loop is the one checked.
    pub fn apply_interval_override(&mut self, interval_override: Option<u64>) {
        if let Some(interval) = interval_override {
            self.interval = interval;
        }
    }

    /// Tick interval, with the command-line override applied when given.
    #[must_use]
    pub fn effective_interval(&self, interval_override: Option<u64>) -> Duration {
        Duration::from_secs(interval_override.unwrap_or(self.interval))
    }

    #[must_use]
    pub const fn cooldown_window(&self) -> Duration {
        Duration::from_secs(self.alert_cooldown)
    }

    fn config_path() -> PathBuf {
        dirs::config_dir().map_or_else(
            || PathBuf::from("config.toml"),
            |dir| dir.join("hostwatch").join("config.toml"),
        )
    }
}

/// Expand a leading `~` in a user-supplied path.
#[must_use]
pub fn expand_path(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(raw.as_ref()).as_ref())
}

impl From<&ThresholdConfig> for ThresholdSet {
    fn from(config: &ThresholdConfig) -> Self {
        Self {
            cpu: config.cpu,
            memory: config.memory,
            disk: config.disk,
        }
    }
}
