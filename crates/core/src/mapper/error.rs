//! Error types for the mapper module.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while mapping a source path.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MappingError {
    /// Source path is not below the source root.
    #[error("Path {path} is not under root {root}")]
    PathOutsideRoot { path: PathBuf, root: PathBuf },

    /// No configured audio suffix occurs in the file name.
    #[error("No audio suffix found in file name {file_name:?}")]
    SuffixNotFound { file_name: String },
}
