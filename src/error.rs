//! Error types for investor-commitments
//!
//! This module defines the error hierarchy for:
//! - Reading and decoding the CSV source
//! - SQLite storage
//! - The HTTP query service
//! - CLI configuration
//!
//! Library code returns these typed errors; the binary wraps them with
//! `anyhow` context. Only `ServerError` knows about HTTP.

use std::path::PathBuf;
use thiserror::Error;

/// Errors reading or decoding the source file
#[derive(Error, Debug)]
pub enum LoadError {
    /// Source file could not be opened or read
    #[error("Cannot read source '{path}': {reason}")]
    SourceUnreadable { path: PathBuf, reason: String },

    /// A required header is absent
    #[error("Source is missing required column '{column}'")]
    MissingColumn { column: String },

    /// A row could not be decoded
    #[error("Malformed row at line {line}: {reason}")]
    Parse { line: u64, reason: String },

    /// A row's investor was not part of the distinct investor set
    #[error("Row at index {row} references an investor that was never inserted: '{name}'")]
    UnresolvedInvestor { row: usize, name: String },

    /// Storage failure while writing
    #[error(transparent)]
    Db(#[from] DbError),
}

impl From<rusqlite::Error> for LoadError {
    fn from(err: rusqlite::Error) -> Self {
        LoadError::Db(DbError::Sqlite(err))
    }
}

/// Database errors
#[derive(Error, Debug)]
pub enum DbError {
    /// SQLite error
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Store file could not be opened
    #[error("Failed to open database at '{path}': {reason}")]
    OpenFailed { path: PathBuf, reason: String },
}

/// Configuration and CLI errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Source file does not exist
    #[error("Source file '{path}' does not exist")]
    SourceNotFound { path: PathBuf },

    /// Output path error
    #[error("Invalid database path '{path}': {reason}")]
    InvalidDbPath { path: PathBuf, reason: String },

    /// Bind address could not be parsed
    #[error("Invalid bind address '{addr}': {reason}")]
    InvalidBindAddress { addr: String, reason: String },
}

/// Query service errors
#[derive(Error, Debug)]
pub enum ServerError {
    /// Backing store could not be opened
    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    /// Query against an opened store failed
    #[error("Query failed: {0}")]
    Query(String),

    /// Invalid request parameter
    #[error("Invalid parameter '{name}': {reason}")]
    InvalidParameter { name: String, reason: String },

    /// Blocking task failed to complete
    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<DbError> for ServerError {
    fn from(err: DbError) -> Self {
        match &err {
            DbError::OpenFailed { .. } => ServerError::StorageUnavailable(err.to_string()),
            DbError::Sqlite(_) => ServerError::Query(err.to_string()),
        }
    }
}

impl axum::response::IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        use axum::http::StatusCode;
        use axum::Json;

        let status = match &self {
            ServerError::InvalidParameter { .. } => StatusCode::BAD_REQUEST,
            ServerError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let body = serde_json::json!({ "error": self.to_string() });
        (status, Json(body)).into_response()
    }
}

/// Result type alias for LoadError
pub type LoadResult<T> = std::result::Result<T, LoadError>;

/// Result type alias for DbError
pub type DbResult<T> = std::result::Result<T, DbError>;

/// Result type alias for ServerError
pub type ServerResult<T> = std::result::Result<T, ServerError>;
