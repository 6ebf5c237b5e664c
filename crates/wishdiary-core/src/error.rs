//! Core error types for wishdiary-core.
//!
//! This module defines the error hierarchy using thiserror. Entity
//! construction and the status mappings are pure and never fail; storage,
//! auth, and workflow functions reject with the types below.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for wishdiary-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Authentication errors
    #[error("Auth error: {0}")]
    Auth(#[from] AuthError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Review workflow errors
    #[error("Workflow error: {0}")]
    Workflow(#[from] WorkflowError),

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

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Failed to create or resolve the data directory
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A uniqueness or foreign-key constraint was violated
    #[error("Constraint violated: {0}")]
    ConstraintViolated(String),

    /// Update path expected the wish to exist
    #[error("Wish with id {id} not found")]
    WishNotFound { id: String },

    /// The wish already has a review attached
    #[error("Wish {wish_id} already has a review")]
    ReviewAlreadyExists { wish_id: String },

    /// Stored record could not be decoded
    #[error("Failed to decode stored record: {0}")]
    DecodeFailed(String),

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Authentication errors for the local mock provider.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Registration with an email that already has an account
    #[error("An account already exists for {email}")]
    EmailTaken { email: String },

    /// Sign-in or password reset for an unknown email
    #[error("No account found for {email}")]
    UserNotFound { email: String },

    /// Sign-in with a wrong password
    #[error("Wrong password")]
    WrongPassword,

    /// An operation that requires a signed-in user
    #[error("Not signed in")]
    NotSignedIn,
}

/// Advisory validation failure.
///
/// `WishDraft::validate` returns the raw message list; this type wraps it
/// for callers that refuse to persist invalid data.
#[derive(Error, Debug)]
#[error("invalid wish: {}", errors.join("; "))]
pub struct ValidationError {
    pub errors: Vec<String>,
}

/// Review workflow errors.
#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Submit against an empty or finished queue
    #[error("Review queue already completed")]
    QueueCompleted,
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, msg) => match e.code {
                rusqlite::ErrorCode::DatabaseLocked => StorageError::Locked,
                rusqlite::ErrorCode::ConstraintViolation => StorageError::ConstraintViolated(
                    msg.clone().unwrap_or_else(|| e.to_string()),
                ),
                _ => StorageError::QueryFailed(err.to_string()),
            },
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
