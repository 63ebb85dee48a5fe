// src/error.rs

//! Unified error handling for the lookup service.

use std::fmt;

use thiserror::Error;

/// Result type alias for lookup operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Input is neither a mobile number nor a CNIC
    #[error("{0}")]
    InvalidQuery(String),

    /// Network failure, timeout or non-success status from the provider
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Provider answered, but not with a usable document
    #[error("Upstream rejected request: {0}")]
    UpstreamRejected(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client could not be built or used
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// CSS selector parsing failed
    #[error("Invalid selector '{selector}': {message}")]
    Selector { selector: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration validation error
    #[error("Validation error: {0}")]
    Validation(String),
}

impl AppError {
    /// Create an invalid-query error with a caller-facing hint.
    pub fn invalid_query(hint: impl Into<String>) -> Self {
        Self::InvalidQuery(hint.into())
    }

    /// Create an upstream-unavailable error from any displayable cause.
    pub fn unavailable(cause: impl fmt::Display) -> Self {
        Self::UpstreamUnavailable(cause.to_string())
    }

    /// Create an upstream-rejected error.
    pub fn rejected(reason: impl fmt::Display) -> Self {
        Self::UpstreamRejected(reason.to_string())
    }

    /// Create a selector parsing error.
    pub fn selector(selector: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Selector {
            selector: selector.into(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Short category string reported in the `error` field of an error result.
    pub fn category(&self) -> &'static str {
        match self {
            Self::InvalidQuery(_) => "Invalid query",
            Self::UpstreamUnavailable(_) | Self::UpstreamRejected(_) | Self::Http(_) => {
                "Fetch failed"
            }
            _ => "Internal error",
        }
    }

    /// Whether the caller can fix this by changing the input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidQuery(_))
    }

    /// Human-readable detail for an error result.
    pub fn detail(&self) -> String {
        match self {
            Self::InvalidQuery(hint) => hint.clone(),
            Self::UpstreamUnavailable(cause) | Self::UpstreamRejected(cause) => cause.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_query_is_client_error() {
        let err = AppError::invalid_query("bad input");
        assert!(err.is_client_error());
        assert_eq!(err.category(), "Invalid query");
        assert_eq!(err.detail(), "bad input");
    }

    #[test]
    fn upstream_failures_share_category() {
        let unavailable = AppError::unavailable("connection refused");
        let rejected = AppError::rejected("not html");
        assert_eq!(unavailable.category(), rejected.category());
        assert!(!unavailable.is_client_error());
        assert!(!rejected.is_client_error());
        assert_eq!(unavailable.detail(), "connection refused");
    }
}
