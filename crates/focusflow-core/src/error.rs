//! Core error types for focusflow-core.
//!
//! Every failure in this crate degrades to "no-op, previous state retained,
//! retry possible" -- nothing here is process-fatal. Read errors fall back
//! to defaults at the call site; write errors are surfaced so the caller
//! can retry.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for focusflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Persisted data could not be read or parsed.
    #[error("Failed to read {path}: {message}")]
    ReadFailed { path: PathBuf, message: String },

    /// A write to the underlying storage failed.
    #[error("Failed to write {path}: {message}")]
    WriteFailed { path: PathBuf, message: String },

    /// The data directory could not be resolved or created.
    #[error("Data directory unavailable: {0}")]
    DataDirUnavailable(String),
}

/// Validation errors. Rejected before reaching the store.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Session records must credit at least one minute.
    #[error("Session duration must be positive, got {minutes}")]
    NonPositiveDuration { minutes: u64 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
