//! Error types for the scanner module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a scan. No partial listing is returned.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Root directory does not exist.
    #[error("Source directory not found: {path}")]
    RootNotFound { path: PathBuf },

    /// Root exists but is not a directory.
    #[error("Source path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// An entry of the tree could not be read.
    #[error("Failed to read {path}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// The blocking scan task did not complete.
    #[error("Scan task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
