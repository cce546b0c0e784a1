//! Types for the placer module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Information about a placed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedFile {
    /// Final destination path.
    pub destination: PathBuf,
    /// File size in bytes.
    pub size_bytes: u64,
    /// SHA-256 checksum if verified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
}

/// Outcome of a copy request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaceOutcome {
    /// The file was written.
    Placed(PlacedFile),
    /// A regular file already sat at the destination and was left alone.
    AlreadyExists,
}
