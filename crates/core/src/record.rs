//! Per-file lifecycle records.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which stage a classified file is routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disposition {
    Convert,
    Copy,
    Unrecognized,
}

/// Result of processing one file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum FileOutcome {
    /// Transcoded into the output tree.
    Converted,
    /// Copied verbatim into the output tree.
    Copied,
    /// The destination already existed.
    Skipped,
    /// Mapping, copying or encoding failed.
    Failed { reason: String },
}

impl FileOutcome {
    pub fn failed(reason: impl Into<String>) -> Self {
        Self::Failed {
            reason: reason.into(),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Where a file is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum FileState {
    Discovered,
    Classified { disposition: Disposition },
    Processed { outcome: FileOutcome },
}

/// A source path plus its lifecycle state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: PathBuf,
    #[serde(flatten)]
    pub state: FileState,
}

impl FileRecord {
    pub fn discovered(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: FileState::Discovered,
        }
    }

    /// Moves the record to `Classified`.
    pub fn classify(self, disposition: Disposition) -> Self {
        Self {
            path: self.path,
            state: FileState::Classified { disposition },
        }
    }

    /// Moves the record to `Processed`.
    pub fn process(self, outcome: FileOutcome) -> Self {
        Self {
            path: self.path,
            state: FileState::Processed { outcome },
        }
    }

    pub fn outcome(&self) -> Option<&FileOutcome> {
        match &self.state {
            FileState::Processed { outcome } => Some(outcome),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_lifecycle() {
        let record = FileRecord::discovered("/music/a.wav");
        assert_eq!(record.state, FileState::Discovered);
        assert!(record.outcome().is_none());

        let record = record.classify(Disposition::Convert);
        assert_eq!(
            record.state,
            FileState::Classified {
                disposition: Disposition::Convert
            }
        );

        let record = record.process(FileOutcome::Converted);
        assert_eq!(record.outcome(), Some(&FileOutcome::Converted));
        assert_eq!(record.path, PathBuf::from("/music/a.wav"));
    }

    #[test]
    fn test_failed_outcome() {
        let outcome = FileOutcome::failed("encoder exited with status 1");
        assert!(outcome.is_failed());
        assert!(!FileOutcome::Skipped.is_failed());
    }

    #[test]
    fn test_record_serialization() {
        let record = FileRecord::discovered("/music/a.wav")
            .process(FileOutcome::failed("boom"));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["path"], "/music/a.wav");
        assert_eq!(json["state"], "processed");
        assert_eq!(json["outcome"]["outcome"], "failed");
        assert_eq!(json["outcome"]["reason"], "boom");
    }
}
