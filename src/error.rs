//! Error types for wayfind

use crate::geolocation::GeolocationError;
use thiserror::Error;

/// Main error type for wayfind operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Invalid suggestion: {0}")]
    InvalidSuggestion(String),

    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("{provider} error: {message}")]
    Provider {
        provider: &'static str,
        message: String,
    },

    #[error("{provider} does not support {operation}")]
    Unsupported {
        provider: &'static str,
        operation: &'static str,
    },

    #[error("Geolocation error: {0}")]
    Geolocation(#[from] GeolocationError),
}

impl Error {
    /// Shorthand for a provider-scoped failure
    pub fn provider(provider: &'static str, message: impl Into<String>) -> Self {
        Error::Provider {
            provider,
            message: message.into(),
        }
    }
}

/// Result type alias for wayfind operations
pub type Result<T> = std::result::Result<T, Error>;
