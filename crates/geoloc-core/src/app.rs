use anyhow::Result;
use std::sync::Arc;

use crate::config::ValidationResult;
use crate::error::{AppError, ConfigError};
use crate::Config;

/// Main application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
    validation: ValidationResult,
    running: bool,
}

impl App {
    /// Create a new application instance from the user's configuration
    pub fn new() -> Result<Self, AppError> {
        let (config, validation) = Config::load_validated()?;
        Ok(Self::from_parts(config, validation))
    }

    /// Create an application instance from an already loaded configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        let validation = config.validate();
        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }
        Ok(Self::from_parts(config, validation))
    }

    fn from_parts(config: Config, validation: ValidationResult) -> Self {
        Self {
            config: Arc::new(config),
            validation,
            running: false,
        }
    }

    /// Mark the application as started
    pub fn initialize(&mut self) -> Result<()> {
        if self.running {
            tracing::debug!("Application already initialized");
            return Ok(());
        }

        tracing::info!(
            "Initializing application ({} config warnings)",
            self.validation.warnings.len()
        );
        self.running = true;
        Ok(())
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        self.running = false;
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Shared handle to the configuration for background services
    pub fn shared_config(&self) -> Arc<Config> {
        self.config.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lifecycle() {
        let mut app = App::with_config(Config::default()).unwrap();
        assert!(!app.is_running());
        app.initialize().unwrap();
        assert!(app.is_running());
        app.shutdown().unwrap();
        assert!(!app.is_running());
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = Config::default();
        config.location.timeout_ms = 0;
        let err = App::with_config(config).err().unwrap();
        assert!(matches!(err, AppError::Config(ConfigError::Invalid(_))));
        assert!(err.to_string().contains("location.timeout_ms"));
    }
}
