//! Error type definitions for the HLS relay engine

use thiserror::Error;

/// Top-level error type for the relay engine
///
/// Uses `thiserror` for automatic trait implementations and error
/// chaining. Probe-level failures never surface here; they are captured
/// as attempt records so the full diagnostic trail survives a failed
/// failover run.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors (empty endpoint catalog, unparseable config file)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// External service errors
    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AppError {
    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an external service error
    pub fn external_service<S: Into<String>, M: Into<String>>(service: S, message: M) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}
