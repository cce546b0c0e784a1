//! Error types for the runner module.

use std::path::PathBuf;
use thiserror::Error;

use crate::scanner::ScanError;

/// Errors that abort a run. Per-file problems never surface here.
#[derive(Debug, Error)]
pub enum RunError {
    /// The source tree could not be scanned.
    #[error("Scan failed: {0}")]
    Scan(#[from] ScanError),

    /// An output or scratch directory could not be prepared.
    #[error("Failed to prepare {path}: {source}")]
    Setup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl RunError {
    pub(crate) fn setup(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Setup {
            path: path.into(),
            source,
        }
    }
}

/// The JSON run report could not be written. Logged, the run still succeeds.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialize run report: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Failed to write run report {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
