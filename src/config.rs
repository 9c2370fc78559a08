//! Configuration types.

use std::path::PathBuf;

use crate::error::ConfigError;
use crate::i18n::Language;
use crate::onboarding::model::settings_keys;

/// Application configuration, built from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the libSQL database file holding the settings table.
    pub db_path: PathBuf,
    /// Settings namespace. Single-user device, so this is almost always "default".
    pub user_id: String,
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_filter: String,
    /// If set, logs are also written to a daily-rotated file in this directory.
    pub log_dir: Option<PathBuf>,
    /// Language used when no preference has been stored yet.
    pub default_language: Language,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/taskone.db"),
            user_id: settings_keys::DEFAULT_USER.to_string(),
            log_filter: "info".to_string(),
            log_dir: None,
            default_language: Language::default(),
        }
    }
}

impl AppConfig {
    /// Build config from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let db_path = std::env::var("TASKONE_DB_PATH")
            .map(PathBuf::from)
            .unwrap_or(defaults.db_path);

        let user_id = std::env::var("TASKONE_USER")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or(defaults.user_id);

        let log_filter = std::env::var("TASKONE_LOG").unwrap_or(defaults.log_filter);
        let log_dir = std::env::var("TASKONE_LOG_DIR").ok().map(PathBuf::from);

        let default_language = match std::env::var("TASKONE_DEFAULT_LANGUAGE") {
            Ok(code) => code.parse::<Language>().map_err(
                |ConfigError::InvalidValue { message, .. }| ConfigError::InvalidValue {
                    key: "TASKONE_DEFAULT_LANGUAGE".to_string(),
                    message,
                },
            )?,
            Err(_) => defaults.default_language,
        };

        Ok(Self {
            db_path,
            user_id,
            log_filter,
            log_dir,
            default_language,
        })
    }
}
