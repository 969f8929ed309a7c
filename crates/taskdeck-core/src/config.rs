use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Environment variable that overrides `services.api_url`.
pub const API_URL_ENV: &str = "TASKDECK_API_URL";

/// Filter values accepted by `ui.default_filter`.
const KNOWN_FILTERS: &[&str] = &["all", "pending", "in_progress", "completed"];

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application configuration directory
    pub config_dir: PathBuf,

    /// Remote task store settings
    pub services: ServiceConfig,

    /// Task board presentation settings
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the task API server
    pub api_url: String,

    /// Path prefix the task routes are mounted under
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Allow invalid/self-signed certificates (DEVELOPMENT ONLY)
    ///
    /// Only takes effect in debug builds.
    #[serde(default)]
    pub allow_invalid_certs: bool,
}

fn default_api_prefix() -> String {
    "/api".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Total duration of one counter transition, in milliseconds
    #[serde(default = "default_counter_animation_ms")]
    pub counter_animation_ms: u64,

    /// How long a notification stays visible, in milliseconds
    #[serde(default = "default_notification_ms")]
    pub notification_ms: u64,

    /// Filter selected when the board opens
    #[serde(default = "default_filter")]
    pub default_filter: String,
}

fn default_counter_animation_ms() -> u64 {
    500
}

fn default_notification_ms() -> u64 {
    3000
}

fn default_filter() -> String {
    "all".to_string()
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            counter_animation_ms: default_counter_animation_ms(),
            notification_ms: default_notification_ms(),
            default_filter: default_filter(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("taskdeck");

        Self {
            config_dir,
            services: ServiceConfig {
                api_url: "http://localhost:5000".to_string(),
                api_prefix: default_api_prefix(),
                allow_invalid_certs: false,
            },
            ui: UiConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, creating it if missing.
    ///
    /// `TASKDECK_API_URL` overrides the stored API URL.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from `path`, writing defaults there if it doesn't exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let contents = std::fs::read_to_string(path).context("Failed to read config file")?;

        let config: Config = toml::from_str(&contents).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            anyhow::bail!(
                "Configuration validation failed: {}",
                validation.error_summary()
            );
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                tracing::info!("Using task API URL from {}", API_URL_ENV);
                self.services.api_url = url;
            }
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_url(&self.services.api_url, "services.api_url", &mut result);

        if !self.services.api_prefix.is_empty() && !self.services.api_prefix.starts_with('/') {
            result.add_error("services.api_prefix", "Prefix must start with '/'");
        }

        if self.services.allow_invalid_certs {
            result.add_warning(
                "services.allow_invalid_certs",
                "Certificate validation disabled (ignored in release builds)",
            );
        }

        if self.ui.counter_animation_ms == 0 {
            result.add_warning("ui.counter_animation_ms", "Counter animation disabled (0 ms)");
        } else if self.ui.counter_animation_ms > 10_000 {
            result.add_warning(
                "ui.counter_animation_ms",
                "Counter animation is unusually long (>10s)",
            );
        }

        if self.ui.notification_ms == 0 {
            result.add_error(
                "ui.notification_ms",
                "Notification duration must be greater than 0",
            );
        }

        if !KNOWN_FILTERS.contains(&self.ui.default_filter.as_str()) {
            result.add_error(
                "ui.default_filter",
                format!(
                    "Unknown filter '{}', expected one of: {}",
                    self.ui.default_filter,
                    KNOWN_FILTERS.join(", ")
                ),
            );
        }

        result
    }

    /// Validate a URL field
    fn validate_url(url_str: &str, field_name: &str, result: &mut ValidationResult) {
        match Url::parse(url_str) {
            Ok(url) => {
                if url.scheme() != "http" && url.scheme() != "https" {
                    result.add_error(
                        field_name,
                        format!("URL must use http or https scheme, got: {}", url.scheme()),
                    );
                }

                if url.host().is_none() {
                    result.add_error(field_name, "URL must have a host");
                }

                if url.port() == Some(0) {
                    result.add_error(field_name, "Port cannot be 0");
                }
            }
            Err(e) => {
                result.add_error(field_name, format!("Invalid URL: {}", e));
            }
        }
    }

    /// Save configuration to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("taskdeck");

        Ok(config_dir.join("config.toml"))
    }
}
