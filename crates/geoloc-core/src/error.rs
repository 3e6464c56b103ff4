//! Centralized error types for the Geoloc application.
//!
//! This module provides a typed error hierarchy that:
//! - Collapses service failures into the few messages the page shows
//! - Keeps full error context for logging

use thiserror::Error;

/// Message shown when the host has no location capability at all.
pub const MSG_LOCATION_UNSUPPORTED: &str = "Geolocalização não é suportada pelo seu navegador.";

/// Message shown for permission refusal, timeout and device errors alike.
pub const MSG_LOCATION_FAILED: &str = "Permissão negada ou erro ao obter localização.";

/// Top-level application error type.
///
/// Use `user_message()` to get the text the page displays.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Location error: {0}")]
    Location(#[from] LocationFailure),

    #[error("Search error: {0}")]
    Search(#[from] SearchFailure),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Returns a user-facing message suitable for display on the page.
    pub fn user_message(&self) -> &'static str {
        match self {
            AppError::Location(e) => e.user_message(),
            AppError::Search(e) => e.user_message(),
            AppError::Config(e) => e.user_message(),
            AppError::Io(_) => "Falha ao acessar um arquivo. Tente novamente.",
        }
    }

    /// Whether the page should show this error at all.
    ///
    /// Search failures stay local to the search control and only empty its
    /// result list.
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, AppError::Search(_))
    }
}

/// Device location failures, collapsed to the two cases the page tells apart.
#[derive(Debug, Error)]
pub enum LocationFailure {
    #[error("Location capability not available")]
    Unsupported,

    #[error("Location request failed: {0}")]
    Failed(String),
}

impl LocationFailure {
    pub fn user_message(&self) -> &'static str {
        match self {
            LocationFailure::Unsupported => MSG_LOCATION_UNSUPPORTED,
            LocationFailure::Failed(_) => MSG_LOCATION_FAILED,
        }
    }
}

/// Geocoding search failures. Logged, never displayed.
#[derive(Debug, Error)]
pub enum SearchFailure {
    #[error("Search request failed: {0}")]
    Network(String),

    #[error("Search response invalid: {0}")]
    Parse(String),
}

impl SearchFailure {
    pub fn user_message(&self) -> &'static str {
        "Nenhum resultado encontrado."
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Configuration parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    pub fn user_message(&self) -> &'static str {
        match self {
            ConfigError::Invalid(_) => "Configuração inválida. Verifique suas preferências.",
            ConfigError::ParseError(_) => "Arquivo de configuração malformado.",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_and_failed_messages_differ() {
        let unsupported = AppError::from(LocationFailure::Unsupported);
        let failed = AppError::from(LocationFailure::Failed("timeout".into()));
        assert_eq!(unsupported.user_message(), MSG_LOCATION_UNSUPPORTED);
        assert_eq!(failed.user_message(), MSG_LOCATION_FAILED);
    }

    #[test]
    fn test_failed_detail_does_not_leak_into_message() {
        let denied = AppError::from(LocationFailure::Failed("permission denied".into()));
        let timeout = AppError::from(LocationFailure::Failed("timed out".into()));
        assert_eq!(denied.user_message(), timeout.user_message());
        assert!(denied.to_string().contains("permission denied"));
    }

    #[test]
    fn test_search_failures_are_not_user_visible() {
        let err = AppError::from(SearchFailure::Network("connection reset".into()));
        assert!(!err.is_user_visible());
        assert!(AppError::from(LocationFailure::Unsupported).is_user_visible());
    }

    #[test]
    fn test_config_error_conversion() {
        let app_err: AppError = ConfigError::Invalid("zoom".into()).into();
        assert!(matches!(app_err, AppError::Config(ConfigError::Invalid(_))));
    }
}
