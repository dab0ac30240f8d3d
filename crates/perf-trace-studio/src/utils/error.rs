//! Error types for the library.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in commands and main.rs.
//!
//! Per-record and per-event problems (missing timestamps, unknown event kinds)
//! are not errors: they are logged and skipped by the timeline code.

use thiserror::Error;

/// Errors that can occur while reading and decoding an event log
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read event log: {0}")]
    ReadFailed(#[from] std::io::Error),

    #[error("JSON deserialization failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Invalid event log format: {0}")]
    InvalidFormat(String),

    #[error("Malformed event at index {index}: {reason}")]
    MalformedEvent { index: usize, reason: String },
}

/// Errors that can occur during trace output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}

/// Errors that can occur while loading a conversion config file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config TOML parse error: {0}")]
    ParseFailed(#[from] toml::de::Error),
}
