//! Exporter trait and error types
//!
//! An exporter receives the finished dataset as a read-only snapshot and
//! persists it in one format.

use crate::dataset::Dataset;
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Trait for dataset export backends
pub trait DatasetExporter {
    /// Persists the whole dataset
    fn export(&self, dataset: &Dataset) -> OutputResult<()>;

    /// Human-readable destination, used in log lines
    fn destination(&self) -> String;
}
