// src/error.rs

//! Unified error handling for the recommendation client.

use std::fmt;

use thiserror::Error;

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// Bad local input, never sent to the network
    #[error("Validation error: {0}")]
    Validation(String),

    /// No response received from the API
    #[error("Network error: {0}")]
    Network(String),

    /// The API answered with a non-success status
    #[error("Server error ({status}): {body}")]
    Server { status: u16, body: String },

    /// Failure caught at the top-level boundary
    #[error("Unexpected error: {0}")]
    Unknown(String),

    /// Response body did not match the book contract
    #[error("Decode error: {0}")]
    Decode(String),

    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a network error.
    pub fn network(message: impl fmt::Display) -> Self {
        Self::Network(message.to_string())
    }

    /// Create a server error from a status code and response body.
    pub fn server(status: u16, body: impl Into<String>) -> Self {
        Self::Server {
            status,
            body: body.into(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an error for a failure nothing else classified.
    pub fn unknown(message: impl fmt::Display) -> Self {
        Self::Unknown(message.to_string())
    }

    /// Whether a query may be retried after this error.
    ///
    /// Only transient failures qualify: lost connections, 5xx responses and
    /// rate limiting. Local validation never reaches the network, so it is
    /// never retried.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Server { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return Self::Decode(err.to_string());
        }
        match err.status() {
            Some(status) => Self::server(status.as_u16(), err.to_string()),
            None => Self::network(err),
        }
    }
}
