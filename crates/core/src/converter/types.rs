//! Types for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How the encoder is told to carry tags over from the source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetadataMode {
    /// Write ID3v2.3 tags (`-id3v2_version 3`).
    #[default]
    Id3v2,
    /// Copy global metadata from the first input (`-map_metadata 0`).
    MapMetadata,
}

impl MetadataMode {
    /// Returns the ffmpeg arguments for this mode.
    pub fn ffmpeg_args(&self) -> [&'static str; 2] {
        match self {
            Self::Id3v2 => ["-id3v2_version", "3"],
            Self::MapMetadata => ["-map_metadata", "0"],
        }
    }
}

/// A single encoder invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeJob {
    /// Source audio file.
    pub input_path: PathBuf,
    /// Where the encoder writes its output.
    pub output_path: PathBuf,
}

/// Result of a successful encoder invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncodeResult {
    /// Path of the produced file.
    pub output_path: PathBuf,
    /// Size of the produced file in bytes.
    pub output_size_bytes: u64,
    /// Wall time of the invocation in milliseconds.
    pub duration_ms: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_mode_args() {
        assert_eq!(MetadataMode::Id3v2.ffmpeg_args(), ["-id3v2_version", "3"]);
        assert_eq!(MetadataMode::MapMetadata.ffmpeg_args(), ["-map_metadata", "0"]);
    }

    #[test]
    fn test_metadata_mode_serialization() {
        let json = serde_json::to_string(&MetadataMode::MapMetadata).unwrap();
        assert_eq!(json, "\"map_metadata\"");
    }
}
