//! Configuration management for the `skywatch` dashboard
//!
//! Handles loading configuration from files and environment variables,
//! and provides validation for all configuration settings.

use crate::SkywatchError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure for the `skywatch` application
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SkywatchConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Upstream API configuration
    #[serde(default)]
    pub upstream: UpstreamConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Port to bind the dashboard server on
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory with the static dashboard assets
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Upstream API settings
///
/// Every upstream is unauthenticated HTTPS; base URLs are configurable so
/// tests can point the clients at a local mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    /// Base URL of the Nominatim geocoding service
    #[serde(default = "default_nominatim_base_url")]
    pub nominatim_base_url: String,
    /// Base URL of the National Weather Service API
    #[serde(default = "default_nws_base_url")]
    pub nws_base_url: String,
    /// Base URL of the sunrise/sunset service
    #[serde(default = "default_sun_base_url")]
    pub sun_base_url: String,
    /// User-Agent header sent to all upstreams (Nominatim and NWS require one)
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u32,
    /// Number of retries for failed requests (0 = single attempt)
    #[serde(default)]
    pub max_retries: u32,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_port() -> u16 {
    8430
}

fn default_static_dir() -> String {
    "static".to_string()
}

fn default_nominatim_base_url() -> String {
    "https://nominatim.openstreetmap.org".to_string()
}

fn default_nws_base_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_sun_base_url() -> String {
    "https://api.sunrisesunset.io".to_string()
}

fn default_user_agent() -> String {
    format!("skywatch/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout() -> u32 {
    10
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            nominatim_base_url: default_nominatim_base_url(),
            nws_base_url: default_nws_base_url(),
            sun_base_url: default_sun_base_url(),
            user_agent: default_user_agent(),
            timeout_seconds: default_timeout(),
            max_retries: 0,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl SkywatchConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides with SKYWATCH_ prefix
        builder = builder.add_source(
            Environment::with_prefix("SKYWATCH")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let config: SkywatchConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("skywatch").join("config.toml"))
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        if self.upstream.timeout_seconds == 0 || self.upstream.timeout_seconds > 300 {
            return Err(SkywatchError::config(
                "Upstream timeout must be between 1 and 300 seconds",
            )
            .into());
        }

        if self.upstream.max_retries > 10 {
            return Err(SkywatchError::config("Upstream max retries cannot exceed 10").into());
        }

        for (name, url) in [
            ("nominatim_base_url", &self.upstream.nominatim_base_url),
            ("nws_base_url", &self.upstream.nws_base_url),
            ("sun_base_url", &self.upstream.sun_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(SkywatchError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        if self.upstream.user_agent.is_empty() {
            return Err(SkywatchError::config(
                "User agent cannot be empty; Nominatim rejects anonymous clients",
            )
            .into());
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(SkywatchError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(SkywatchError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        Ok(())
    }
}
