//! Unified error types for sentinel
//!
//! This module defines all error types used throughout the application.
//! Uses thiserror for ergonomic error definitions.
//!
//! Channel and validation failures are rendered with `to_string()` into the
//! error list of a processing result, so their display text is part of the
//! output format.

use thiserror::Error;

/// Top-level application error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from configuration parsing/validation
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Unrecognised severity level (override or config)
    #[error("Severity error: {0}")]
    Severity(#[from] SeverityError),

    /// Error constructing or operating a delivery channel
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Metrics input could not be decoded into a snapshot
    #[error("Invalid metrics input: {0}")]
    InvalidInput(String),

    /// IO error (file operations)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from severity parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeverityError {
    /// The string does not name a known severity level
    #[error("Unknown severity level: {0}")]
    Unknown(String),
}

/// Errors from configuration parsing and validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    /// Failed to parse config file
    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// Invalid config value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// TOML parsing error
    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

/// Delivery failures reported by a single channel
#[derive(Error, Debug)]
pub enum ChannelError {
    /// No channel registered under the requested name
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    /// Appending to the log file failed
    #[error("Failed to write to log: {0}")]
    LogWrite(#[source] std::io::Error),

    /// The OS rejected the log file path itself
    #[error("Invalid log file path: {0}")]
    InvalidLogPath(String),

    /// Bounded queue at capacity
    #[error("Alert queue is full - message dropped")]
    QueueFull,

    /// Queue no longer accepts messages (shutdown in progress or done)
    #[error("Alert queue is closed - message dropped")]
    QueueClosed,

    /// Background writer thread could not be started
    #[error("Failed to start async log writer: {0}")]
    WorkerSpawn(#[source] std::io::Error),

    /// Custom handler rejected its input
    #[error("Custom handler '{name}' failed with argument error: {message}")]
    HandlerArgument { name: String, message: String },

    /// Custom handler hit an I/O failure
    #[error("Custom handler '{name}' failed with I/O error: {source}")]
    HandlerIo {
        name: String,
        #[source]
        source: std::io::Error,
    },

    /// Anything else a custom handler raised, including panics
    #[error("Custom handler '{name}' failed unexpectedly: {message}")]
    HandlerUnexpected { name: String, message: String },
}

/// Failure returned by an externally supplied alert handler
#[derive(Error, Debug)]
pub enum HandlerError {
    /// The handler could not use the alert it was given
    #[error("{0}")]
    InvalidArgument(String),

    /// The handler's own I/O failed
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Any other handler failure
    #[error("{0}")]
    Other(String),
}

impl HandlerError {
    /// Attribute this failure to the handler registered as `name`
    pub fn into_channel_error(self, name: &str) -> ChannelError {
        let name = name.to_string();
        match self {
            Self::InvalidArgument(message) => ChannelError::HandlerArgument { name, message },
            Self::Io(source) => ChannelError::HandlerIo { name, source },
            Self::Other(message) => ChannelError::HandlerUnexpected { name, message },
        }
    }
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;
