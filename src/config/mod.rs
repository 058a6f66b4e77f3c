//! Configuration: the monitor list from `config.yaml` and process settings
//! from the environment.
//!
//! The monitor list is loaded once at startup and never reloaded, so
//! resolution against it is pure.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

pub mod notify;
pub mod repos;
pub mod settings;

pub use notify::{
    ChannelSetting, EffectiveNotify, EmailSetting, NotifyConfig, ParseMode, TelegramOptions,
    TelegramSetting,
};
pub use repos::{
    AppConfig, DefaultsConfig, EffectiveConfig, EventsConfig, EventsOverride, MonitorConfig,
};
pub use settings::{Settings, SmtpSettings, TelegramSettings};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid YAML, or a pattern is not a valid glob.
    #[error("invalid config file {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// An environment variable has an unusable value.
    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },

    /// Strict verification was requested without a webhook secret.
    #[error("GITHUB_WEBHOOK_SECRET is required when WEBHOOK_VERIFY_MODE is strict")]
    MissingSecret,
}

/// Loads the monitor configuration from a YAML file.
///
/// A missing file is not an error: built-in defaults apply and no repository
/// is monitored.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    if !path.exists() {
        warn!(path = %path.display(), "Config file not found, using defaults");
        return Ok(AppConfig::default());
    }

    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let config = parse_config(&content).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    info!(
        path = %path.display(),
        monitors = config.monitors.len(),
        "Loaded config"
    );

    Ok(config)
}

/// Parses YAML config text. An empty document yields the defaults.
pub fn parse_config(content: &str) -> Result<AppConfig, serde_yaml::Error> {
    if content.trim().is_empty() {
        return Ok(AppConfig::default());
    }
    serde_yaml::from_str(content)
}
