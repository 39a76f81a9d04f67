//! Client configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section. Every field carries a serde default, so an empty source set
//! yields a usable configuration.

pub mod api;
pub mod feed;
pub mod logging;
pub mod realtime;
pub mod session;

use serde::{Deserialize, Serialize};

pub use self::api::ApiConfig;
pub use self::feed::FeedConfig;
pub use self::logging::LoggingConfig;
pub use self::realtime::{BackoffConfig, RealtimeConfig, ReconnectConfig};
pub use self::session::SessionConfig;

use crate::error::AppError;

/// Root client configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (base file + environment overlay + env vars).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote REST API settings.
    #[serde(default)]
    pub api: ApiConfig,
    /// Persisted session settings.
    #[serde(default)]
    pub session: SessionConfig,
    /// Realtime notification channel settings.
    #[serde(default)]
    pub realtime: RealtimeConfig,
    /// In-memory notification feed settings.
    #[serde(default)]
    pub feed: FeedConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges `config_file` with an optional `config/{env}` overlay and
    /// environment variables prefixed with `EVENTHUB_` (nested keys are
    /// separated by `__`, e.g. `EVENTHUB__API__BASE_URL`). Missing files
    /// are not an error.
    pub fn load(config_file: &str, env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name(config_file).required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("EVENTHUB")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml(document: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(document, config::FileFormat::Toml))
            .build()?;
        Ok(config.try_deserialize()?)
    }
}
