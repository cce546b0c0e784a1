//! Types for the classifier module.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How suffixes are matched against discovered paths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Suffix may occur anywhere in the path.
    #[default]
    Substring,
    /// Suffix must end the file name.
    Extension,
}

/// The two ordered suffix lists driving classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSets {
    /// Suffixes of files to transcode. Order matters for output naming.
    pub audio: Vec<String>,
    /// Suffixes of files to copy verbatim.
    pub copy: Vec<String>,
}

impl ExtensionSets {
    pub fn new(audio: Vec<String>, copy: Vec<String>) -> Self {
        Self { audio, copy }
    }
}

/// Result of classifying a list of paths. Input order is preserved in every set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classification {
    pub to_convert: Vec<PathBuf>,
    pub to_copy: Vec<PathBuf>,
    pub unrecognized: Vec<PathBuf>,
}
