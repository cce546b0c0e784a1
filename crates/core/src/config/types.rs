use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::classifier::{ExtensionSets, MatchMode};
use crate::converter::ConverterConfig;
use crate::placer::PlacerConfig;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub converter: ConverterConfig,
    #[serde(default)]
    pub formats: FormatsConfig,
    #[serde(default)]
    pub placer: PlacerConfig,
    /// Report planned actions without touching the filesystem or spawning the encoder.
    #[serde(default)]
    pub dry_run: bool,
    /// Where to write the JSON run report, if anywhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub report_path: Option<PathBuf>,
}

impl Config {
    /// Suffixes configured in both the audio and the copy set.
    ///
    /// Files matching one of these are copied verbatim and transcoded.
    pub fn overlapping_suffixes(&self) -> Vec<String> {
        self.formats
            .audio
            .iter()
            .filter(|s| self.formats.copy.contains(s))
            .cloned()
            .collect()
    }
}

/// Directory layout of a run
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Root of the library to mirror.
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,
    /// Root of the mirrored tree.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// Root of the tree receiving copies of files that failed.
    #[serde(default = "default_error_dir")]
    pub error_dir: PathBuf,
    /// Directory holding the encoder's in-progress output.
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            source_dir: default_source_dir(),
            output_dir: default_output_dir(),
            error_dir: default_error_dir(),
            scratch_dir: default_scratch_dir(),
        }
    }
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("../")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("~/Music/Converted")
}

fn default_error_dir() -> PathBuf {
    PathBuf::from("~/Music/Errors")
}

fn default_scratch_dir() -> PathBuf {
    PathBuf::from("./tmp")
}

/// Suffix sets driving classification
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FormatsConfig {
    /// Suffixes of files to transcode, in lookup order.
    #[serde(default = "default_audio_suffixes")]
    pub audio: Vec<String>,
    /// Suffixes of files to copy verbatim.
    #[serde(default = "default_copy_suffixes")]
    pub copy: Vec<String>,
    #[serde(default)]
    pub match_mode: MatchMode,
}

impl Default for FormatsConfig {
    fn default() -> Self {
        Self {
            audio: default_audio_suffixes(),
            copy: default_copy_suffixes(),
            match_mode: MatchMode::default(),
        }
    }
}

impl FormatsConfig {
    pub fn extension_sets(&self) -> ExtensionSets {
        ExtensionSets::new(self.audio.clone(), self.copy.clone())
    }
}

fn default_audio_suffixes() -> Vec<String> {
    [".m4a", ".m4p", ".wav", ".m4r", ".wma", ".aif"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_copy_suffixes() -> Vec<String> {
    // Already-encoded audio plus album art.
    [".mp3", ".jpg", ".png", ".tiff"]
        .into_iter()
        .map(String::from)
        .collect()
}
