//! Error types for the document search pipeline.
//!
//! Only setup errors (bad configuration, unreadable root, thread pool
//! construction) ever reach the caller of [`crate::search::search`].
//! Extraction, pattern and worker failures are recovered inside the pipeline
//! and are represented here so they can be logged and counted uniformly.
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type for search operations
pub type SearchResult<T> = Result<T, SearchError>;

/// Errors that can occur during search operations
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),
    #[error("Invalid pattern: {0}")]
    InvalidPattern(String),
    #[error("Failed to extract text from {path}: {reason}")]
    ExtractionFailure { path: PathBuf, reason: String },
    #[error("Worker failed on {path}: {reason}")]
    WorkerFailure { path: PathBuf, reason: String },
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Thread pool error: {0}")]
    ThreadPool(String),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl SearchError {
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::FileNotFound(path.into())
    }

    pub fn permission_denied(path: impl Into<PathBuf>) -> Self {
        Self::PermissionDenied(path.into())
    }

    pub fn invalid_pattern(pattern: impl Into<String>) -> Self {
        Self::InvalidPattern(pattern.into())
    }

    pub fn extraction_failure(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::ExtractionFailure {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub fn worker_failure(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::WorkerFailure {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Maps an I/O error on `path` to the most specific variant
    pub fn from_io(path: &Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => Self::file_not_found(path),
            std::io::ErrorKind::PermissionDenied => Self::permission_denied(path),
            _ => Self::IoError(err),
        }
    }
}
