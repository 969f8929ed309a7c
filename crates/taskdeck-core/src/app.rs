use anyhow::Result;
use std::sync::Arc;

use crate::config::ValidationResult;
use crate::error::{AppError, ConfigError};
use crate::Config;

/// Application configuration holder and lifecycle manager
pub struct App {
    config: Arc<Config>,
    warnings: ValidationResult,
}

impl App {
    /// Create a new application instance from the on-disk configuration
    pub fn new() -> Result<Self, AppError> {
        let (config, warnings) = Config::load_validated()
            .map_err(|e| AppError::Config(ConfigError::Invalid(format!("{:#}", e))))?;

        Ok(Self {
            config: Arc::new(config),
            warnings,
        })
    }

    /// Create an application around an already-built configuration.
    pub fn from_config(config: Config) -> Result<Self, AppError> {
        let validation = config.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        Ok(Self {
            config: Arc::new(config),
            warnings: validation,
        })
    }

    /// Log startup details
    pub fn initialize(&mut self) -> Result<()> {
        tracing::info!(
            api_url = %self.config.services.api_url,
            prefix = %self.config.services.api_prefix,
            "Initializing taskdeck"
        );

        if !self.warnings.warnings.is_empty() {
            tracing::debug!("Started with {} config warnings", self.warnings.warnings.len());
        }

        Ok(())
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down taskdeck");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }
}
