//! Configuration management for the weather builder
//!
//! Handles loading configuration from a TOML file and environment variables,
//! and provides validation for all configuration settings.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::WeatherBuilderError;
use crate::models::Location;

/// Environment variable prefix, e.g. `WEATHER_BUILDER_NWS__USER_AGENT`
pub const ENV_PREFIX: &str = "WEATHER_BUILDER";

/// Longest backoff the retry policy waits between two attempts
pub const MAX_RETRY_BACKOFF: Duration = Duration::from_secs(10);

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeatherBuilderConfig {
    /// api.weather.gov client settings
    #[serde(default)]
    pub nws: NwsConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Places to build datasets for
    #[serde(default)]
    pub locations: Vec<Location>,
}

/// api.weather.gov client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NwsConfig {
    /// Base URL of the API
    #[serde(default = "default_nws_base_url")]
    pub base_url: String,
    /// Contact string (usually an e-mail address) sent as `User-Agent`
    #[serde(default)]
    pub user_agent: String,
    /// Per-call timeout in seconds
    #[serde(default = "default_nws_timeout")]
    pub timeout_seconds: u32,
    /// Maximum number of retries for transient failures
    #[serde(default = "default_nws_max_retries")]
    pub max_retries: u32,
}

/// Logging configuration settings
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
fn default_nws_base_url() -> String {
    "https://api.weather.gov".to_string()
}

fn default_nws_timeout() -> u32 {
    20
}

fn default_nws_max_retries() -> u32 {
    3
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for NwsConfig {
    fn default() -> Self {
        Self {
            base_url: default_nws_base_url(),
            user_agent: String::new(),
            timeout_seconds: default_nws_timeout(),
            max_retries: default_nws_max_retries(),
        }
    }
}

impl NwsConfig {
    /// Per-attempt timeout handed to the HTTP client
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds.into())
    }

    /// Upper bound for one call with every retry and the backoff before it
    #[must_use]
    pub fn call_budget(&self) -> Duration {
        self.request_timeout() * (self.max_retries + 1) + MAX_RETRY_BACKOFF * self.max_retries
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

impl WeatherBuilderConfig {
    /// Load configuration from `config.toml` and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| PathBuf::from("config.toml"));

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // Environment variable overrides with WEATHER_BUILDER_ prefix
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| format!("Failed to build configuration from {}", config_file.display()))?;

        let mut config: WeatherBuilderConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.nws.base_url.is_empty() {
            self.nws.base_url = default_nws_base_url();
        }
        if self.nws.timeout_seconds == 0 {
            self.nws.timeout_seconds = default_nws_timeout();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_user_agent()?;
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        self.validate_locations()?;
        Ok(())
    }

    /// The NWS API rejects anonymous requests
    pub fn validate_user_agent(&self) -> Result<()> {
        if self.nws.user_agent.trim().is_empty() {
            return Err(WeatherBuilderError::config(format!(
                "nws.user_agent must be set to a contact e-mail address (or {ENV_PREFIX}_NWS__USER_AGENT)"
            ))
            .into());
        }
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.nws.timeout_seconds > 120 {
            return Err(WeatherBuilderError::config("NWS timeout cannot exceed 120 seconds").into());
        }

        if self.nws.max_retries > 10 {
            return Err(WeatherBuilderError::config("NWS max retries cannot exceed 10").into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(WeatherBuilderError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(WeatherBuilderError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if !self.nws.base_url.starts_with("http://") && !self.nws.base_url.starts_with("https://") {
            return Err(
                WeatherBuilderError::config("NWS base URL must be a valid HTTP or HTTPS URL").into(),
            );
        }

        Ok(())
    }

    fn validate_locations(&self) -> Result<()> {
        for location in &self.locations {
            location
                .validate()
                .with_context(|| format!("Invalid location '{}'", location.name))?;
        }
        Ok(())
    }
}
