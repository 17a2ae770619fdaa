//! Error types for Solidafy Pager
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! Every error also maps onto a small [`ErrorKind`] taxonomy that the
//! pagination controller stores as `last_error` and that consumers use to
//! decide what to show.

use serde::Serialize;
use thiserror::Error;

/// The main error type for Solidafy Pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Authentication Errors
    // ============================================================================
    #[error("No access token available")]
    Unauthenticated,

    #[error("Session expired: {message}")]
    AuthExpired { message: String },

    /// The listing endpoint answered 401. Handled by the controller's
    /// refresh path and never surfaced to consumers as-is.
    #[error("Request rejected as unauthorized")]
    Unauthorized,

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    // ============================================================================
    // Data Errors
    // ============================================================================
    #[error("Server error: {message}")]
    Application { message: String },

    #[error("Failed to decode response: {message}")]
    Decode { message: String },

    // ============================================================================
    // Session Errors
    // ============================================================================
    #[error("Response discarded: session was reset or closed")]
    Cancelled,

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },

    #[error("{0}")]
    Other(String),
}

/// Coarse error classification exposed to consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// No token present
    Unauthenticated,
    /// Refresh failed or was not possible
    AuthExpired,
    /// Transport failure, timeout or unexpected status
    NetworkError,
    /// The server returned a message payload instead of data
    ApplicationError,
    /// Response arrived after a reset or teardown
    Cancelled,
}

impl ErrorKind {
    /// Terminal kinds clear credentials and end the session's usefulness
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Unauthenticated | Self::AuthExpired)
    }

    /// Recoverable kinds keep the last good page on screen
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::NetworkError | Self::ApplicationError)
    }
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an auth expired error
    pub fn auth_expired(message: impl Into<String>) -> Self {
        Self::AuthExpired {
            message: message.into(),
        }
    }

    /// Create an HTTP status error
    pub fn http_status(status: u16, body: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            body: body.into(),
        }
    }

    /// Create an application error from a server message
    pub fn application(message: impl Into<String>) -> Self {
        Self::Application {
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Unauthenticated => ErrorKind::Unauthenticated,
            Error::AuthExpired { .. } | Error::Unauthorized => ErrorKind::AuthExpired,
            Error::Application { .. } => ErrorKind::ApplicationError,
            Error::Cancelled => ErrorKind::Cancelled,
            _ => ErrorKind::NetworkError,
        }
    }

    /// Check if this error ends the session's authenticated state
    pub fn is_terminal(&self) -> bool {
        self.kind().is_terminal()
    }
}

/// Result type alias for Solidafy Pager
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}
