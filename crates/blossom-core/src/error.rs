//! Core error types for blossom-core.
//!
//! This module defines the error hierarchy using thiserror. Conversation
//! backend failures live in [`crate::chat::LlmError`] because they never
//! escape the conversation engine.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for blossom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Export/import errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// The session has no completed profile yet
    #[error("Onboarding has not been completed")]
    NotOnboarded,

    /// Unknown session id
    #[error("Session not found: {0}")]
    SessionNotFound(uuid::Uuid),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
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

    /// A stored row could not be decoded
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow { table: String, message: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Data directory could not be resolved or created
    #[error("Cannot use data directory {path}: {message}")]
    DataDir { path: PathBuf, message: String },

    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Numeric value outside its allowed range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Required text field left blank
    #[error("{0} must not be empty")]
    Empty(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Export and import errors.
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV header does not match the expected columns
    #[error("Unexpected CSV header: {0}")]
    BadHeader(String),

    /// A record could not be parsed
    #[error("Line {line}: {message}")]
    BadRecord { line: usize, message: String },

    /// Entries could not be serialized
    #[error("Failed to serialize export: {0}")]
    Serialize(String),

    /// Unknown export format name
    #[error("Unknown export format '{0}' (expected csv or json)")]
    UnknownFormat(String),
}

// Helper implementations for converting from other error types

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _msg) if e.code == rusqlite::ErrorCode::DatabaseLocked => {
                DatabaseError::Locked
            }
            _ => DatabaseError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_names_field_and_bounds() {
        let err = ValidationError::OutOfRange {
            field: "intensity".to_string(),
            value: 7,
            min: 1,
            max: 5,
        };
        assert_eq!(err.to_string(), "intensity must be between 1 and 5, got 7");
    }

    #[test]
    fn export_serialize_failure_is_not_a_line_error() {
        let err: CoreError = ExportError::Serialize("key must be a string".to_string()).into();
        assert_eq!(err.to_string(), "Export error: Failed to serialize export: key must be a string");
    }

    #[test]
    fn rusqlite_errors_convert_to_query_failed() {
        let err: CoreError = rusqlite::Error::QueryReturnedNoRows.into();
        assert!(matches!(err, CoreError::Database(DatabaseError::QueryFailed(_))));
    }
}
