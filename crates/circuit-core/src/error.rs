//! Core error types for circuit-core.
//!
//! This module defines the error hierarchy using thiserror. Collaborator
//! failures (audio, speech, wake lock, history writes) are represented here
//! but are logged and swallowed at the service boundary rather than returned
//! from playback operations.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for circuit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog loading and lookup errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Playback contract errors
    #[error("Playback error: {0}")]
    Playback(#[from] PlaybackError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Key-value storage errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,

    /// Value could not be encoded for storage
    #[error("Failed to serialize value for '{key}': {message}")]
    Serialize { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Key does not exist in the configuration tree
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Catalog loading errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// A catalog file or directory could not be read
    #[error("Failed to read {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A catalog file is not valid JSON of the expected shape
    #[error("Failed to parse {path}: {message}")]
    ParseFailed { path: PathBuf, message: String },

    /// Program id not present in the catalog
    #[error("Unknown program: {0}")]
    UnknownProgram(String),
}

/// Playback engine contract errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlaybackError {
    /// The step sequence is empty; there is nothing to play
    #[error("No workout data")]
    NoWorkoutData,

    /// `start` was called on a session that is already playing
    #[error("Session already started")]
    AlreadyStarted,

    /// The session was exited and accepts no further actions
    #[error("Session has been exited")]
    SessionExited,
}

/// Hardware capability errors (audio, speech, wake lock).
///
/// These never cross the service boundary; services log them and degrade.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HardwareError {
    /// Capability is not available in this environment
    #[error("capability not supported")]
    Unsupported,

    /// The host refused the request
    #[error("request denied: {0}")]
    Denied(String),

    /// Backend-specific failure
    #[error("{0}")]
    Backend(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(inner, _msg) => {
                if inner.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
