//! Configuration for the converter module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::types::MetadataMode;

/// Configuration for the FFmpeg-based converter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConverterConfig {
    /// Path to ffmpeg binary.
    #[serde(default = "default_ffmpeg_path")]
    pub ffmpeg_path: PathBuf,

    /// Audio bitrate passed to `-ab`.
    #[serde(default = "default_bitrate")]
    pub bitrate: String,

    /// Extension of transcoded files, including the dot.
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// How tags are carried over.
    #[serde(default)]
    pub metadata_mode: MetadataMode,

    /// Timeout for a single conversion in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[serde(default = "default_log_level")]
    pub ffmpeg_log_level: String,

    /// Additional ffmpeg arguments, inserted before the output path.
    #[serde(default)]
    pub extra_ffmpeg_args: Vec<String>,
}

fn default_ffmpeg_path() -> PathBuf {
    PathBuf::from("ffmpeg")
}

fn default_bitrate() -> String {
    "320k".to_string()
}

fn default_output_extension() -> String {
    ".mp3".to_string()
}

fn default_timeout() -> u64 {
    3600 // 1 hour
}

fn default_log_level() -> String {
    "error".to_string()
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            ffmpeg_path: default_ffmpeg_path(),
            bitrate: default_bitrate(),
            output_extension: default_output_extension(),
            metadata_mode: MetadataMode::default(),
            timeout_secs: default_timeout(),
            ffmpeg_log_level: default_log_level(),
            extra_ffmpeg_args: Vec::new(),
        }
    }
}

impl ConverterConfig {
    /// Creates a new config with a custom ffmpeg path.
    pub fn with_ffmpeg_path(ffmpeg_path: PathBuf) -> Self {
        Self {
            ffmpeg_path,
            ..Default::default()
        }
    }

    /// Sets the bitrate.
    pub fn with_bitrate(mut self, bitrate: impl Into<String>) -> Self {
        self.bitrate = bitrate.into();
        self
    }

    /// Sets the metadata mode.
    pub fn with_metadata_mode(mut self, mode: MetadataMode) -> Self {
        self.metadata_mode = mode;
        self
    }

    /// Sets the timeout in seconds.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ConverterConfig::default();
        assert_eq!(config.ffmpeg_path, PathBuf::from("ffmpeg"));
        assert_eq!(config.bitrate, "320k");
        assert_eq!(config.output_extension, ".mp3");
        assert_eq!(config.metadata_mode, MetadataMode::Id3v2);
        assert_eq!(config.timeout_secs, 3600);
    }

    #[test]
    fn test_config_builder() {
        let config = ConverterConfig::with_ffmpeg_path(PathBuf::from("./bin/ffmpeg"))
            .with_bitrate("256k")
            .with_metadata_mode(MetadataMode::MapMetadata)
            .with_timeout(60);

        assert_eq!(config.ffmpeg_path, PathBuf::from("./bin/ffmpeg"));
        assert_eq!(config.bitrate, "256k");
        assert_eq!(config.metadata_mode, MetadataMode::MapMetadata);
        assert_eq!(config.timeout_secs, 60);
    }

    #[test]
    fn test_config_serialization() {
        let config = ConverterConfig::default();
        let json = serde_json::to_string(&config).unwrap();
        let parsed: ConverterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.bitrate, config.bitrate);
        assert_eq!(parsed.metadata_mode, config.metadata_mode);
    }
}
