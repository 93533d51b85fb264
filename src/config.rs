//! Configuration management for `LooFinder`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::LooFinderError;
use crate::assistant::ClassifierSettings;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for `LooFinder`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LooFinderConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Assistant radii, thresholds and timing
    #[serde(default)]
    pub assistant: AssistantConfig,
    /// Restroom catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_server_host")]
    pub host: String,
    #[serde(default = "default_server_port")]
    pub port: u16,
    /// Request timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u32,
}

/// Assistant configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantConfig {
    /// Delay before a reply is shown, in milliseconds
    #[serde(default = "default_reply_delay_ms")]
    pub reply_delay_ms: u64,
    /// Radius of the generic nearby search in kilometers
    #[serde(default = "default_nearby_radius")]
    pub nearby_radius_km: f64,
    /// Radius of attribute searches in kilometers
    #[serde(default = "default_attribute_radius")]
    pub attribute_radius_km: f64,
    /// Minimum cleanliness score for the clean filter
    #[serde(default = "default_clean_threshold")]
    pub clean_threshold: u8,
}

/// Catalog configuration settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON catalog file; the built-in catalog is used when unset
    pub path: Option<String>,
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
fn default_server_host() -> String {
    "0.0.0.0".to_string()
}

fn default_server_port() -> u16 {
    8080
}

fn default_request_timeout() -> u32 {
    10
}

fn default_reply_delay_ms() -> u64 {
    1000
}

fn default_nearby_radius() -> f64 {
    crate::geo::NEARBY_DEFAULT_RADIUS_KM
}

fn default_attribute_radius() -> f64 {
    crate::assistant::intent::ATTRIBUTE_RADIUS_KM
}

fn default_clean_threshold() -> u8 {
    crate::assistant::intent::CLEAN_SCORE_THRESHOLD
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
            host: default_server_host(),
            port: default_server_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            reply_delay_ms: default_reply_delay_ms(),
            nearby_radius_km: default_nearby_radius(),
            attribute_radius_km: default_attribute_radius(),
            clean_threshold: default_clean_threshold(),
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

impl Default for LooFinderConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            assistant: AssistantConfig::default(),
            catalog: CatalogConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl AssistantConfig {
    #[must_use]
    pub fn classifier_settings(&self) -> ClassifierSettings {
        ClassifierSettings {
            nearby_radius_km: self.nearby_radius_km,
            attribute_radius_km: self.attribute_radius_km,
            clean_threshold: self.clean_threshold,
        }
    }

    #[must_use]
    pub fn reply_delay(&self) -> Duration {
        Duration::from_millis(self.reply_delay_ms)
    }
}

impl LooFinderConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from file if path is provided or use default location
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

        // Add environment variable overrides with LOOFINDER_ prefix
        builder = builder.add_source(
            Environment::with_prefix("LOOFINDER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: LooFinderConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        // Apply defaults for missing values
        config.apply_defaults();

        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("loofinder").join("config.toml"))
    }

    /// Apply default values to missing configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_server_host();
        }
        if self.server.request_timeout_seconds == 0 {
            self.server.request_timeout_seconds = default_request_timeout();
        }
        if self.assistant.nearby_radius_km <= 0.0 {
            self.assistant.nearby_radius_km = default_nearby_radius();
        }
        if self.assistant.attribute_radius_km <= 0.0 {
            self.assistant.attribute_radius_km = default_attribute_radius();
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
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.request_timeout_seconds > 300 {
            return Err(
                LooFinderError::config("Request timeout cannot exceed 300 seconds").into(),
            );
        }

        if self.assistant.reply_delay_ms > 10_000 {
            return Err(LooFinderError::config("Reply delay cannot exceed 10000 ms").into());
        }

        if !self.assistant.nearby_radius_km.is_finite() || self.assistant.nearby_radius_km > 50.0 {
            return Err(LooFinderError::config("Nearby radius cannot exceed 50 km").into());
        }

        if !self.assistant.attribute_radius_km.is_finite()
            || self.assistant.attribute_radius_km > 50.0
        {
            return Err(LooFinderError::config("Attribute radius cannot exceed 50 km").into());
        }

        if self.assistant.clean_threshold > 100 {
            return Err(LooFinderError::config(
                "Clean threshold must be a score between 0 and 100",
            )
            .into());
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(LooFinderError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(LooFinderError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        if let Some(path) = &self.catalog.path {
            if path.trim().is_empty() {
                return Err(LooFinderError::config(
                    "Catalog path cannot be empty if provided. Either remove it or set a file.",
                )
                .into());
            }
        }

        Ok(())
    }
}
