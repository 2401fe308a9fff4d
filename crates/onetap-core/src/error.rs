//! Core error types for onetap-core.
//!
//! Timer transitions never fail (an invalid transition is a no-op), so these
//! types only cover the ambient parts of the library: configuration files,
//! preset validation and serialization.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// No home directory to place the config under
    #[error("Could not determine a configuration directory")]
    NoDataDir,

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),

    /// Dot-path does not name an existing key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// Two entries share an identifier
    #[error("Duplicate id '{id}' in {collection}")]
    DuplicateId { collection: String, id: String },

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Failures inside the motivation fetcher.
///
/// These never reach the timer: the fetcher turns every one of them into a
/// fallback message.
#[derive(Error, Debug)]
pub enum MotivationError {
    /// No API key configured
    #[error("No API key available")]
    MissingCredentials,

    /// Endpoint or model do not form a valid URL
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// Transport-level failure, including timeouts
    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Provider answered with a non-success status
    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Provider answered without any text candidate
    #[error("Provider returned no text")]
    EmptyResponse,

    /// Candidate text is not the expected JSON shape
    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    /// Candidate parsed but carried a blank message
    #[error("Response message is empty")]
    EmptyMessage,
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::ParseFailed(err.to_string())
    }
}
