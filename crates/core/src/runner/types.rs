//! Types for the runner module.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::record::{FileOutcome, FileRecord};

/// Phases of a run, entered strictly in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunPhase {
    Init,
    Scanning,
    Copying,
    Converting,
    ErrorRecovery,
    Summarized,
}

impl std::fmt::Display for RunPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Init => "init",
            Self::Scanning => "scanning",
            Self::Copying => "copying",
            Self::Converting => "converting",
            Self::ErrorRecovery => "error recovery",
            Self::Summarized => "summarized",
        };
        f.write_str(name)
    }
}

/// Stage in which a file failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    Copy,
    Convert,
}

/// A failed file and why it failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    pub path: PathBuf,
    pub stage: FailureStage,
    pub reason: String,
}

/// Insertion-ordered set of paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<PathBuf>", into = "Vec<PathBuf>")]
pub struct PathSet {
    order: Vec<PathBuf>,
    index: HashSet<PathBuf>,
}

impl PathSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `path` unless already present. Returns whether it was added.
    pub fn insert(&mut self, path: &Path) -> bool {
        if self.index.contains(path) {
            return false;
        }
        self.index.insert(path.to_path_buf());
        self.order.push(path.to_path_buf());
        true
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.index.contains(path)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Paths in insertion order.
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.order
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.order.iter()
    }
}

impl From<Vec<PathBuf>> for PathSet {
    fn from(paths: Vec<PathBuf>) -> Self {
        let mut set = Self::new();
        for path in &paths {
            set.insert(path);
        }
        set
    }
}

impl From<PathSet> for Vec<PathBuf> {
    fn from(set: PathSet) -> Self {
        set.order
    }
}

/// Per-outcome path sets of a run or of a single stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunCounters {
    pub converted: PathSet,
    pub copied: PathSet,
    pub skipped: PathSet,
    pub failed: PathSet,
    /// Reasons for the entries of `failed`, one per failing stage.
    pub failures: Vec<FailureRecord>,
}

impl RunCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the outcome of processing `path` in `stage`.
    pub fn record(&mut self, stage: FailureStage, path: &Path, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Converted => {
                self.converted.insert(path);
            }
            FileOutcome::Copied => {
                self.copied.insert(path);
            }
            FileOutcome::Skipped => {
                self.skipped.insert(path);
            }
            FileOutcome::Failed { reason } => {
                self.failed.insert(path);
                self.failures.push(FailureRecord {
                    path: path.to_path_buf(),
                    stage,
                    reason: reason.clone(),
                });
            }
        }
    }

    /// Folds `other` into `self`.
    pub fn merge(&mut self, other: RunCounters) {
        for (set, paths) in [
            (&mut self.converted, other.converted),
            (&mut self.copied, other.copied),
            (&mut self.skipped, other.skipped),
            (&mut self.failed, other.failed),
        ] {
            for path in paths.iter() {
                set.insert(path);
            }
        }
        self.failures.extend(other.failures);
    }

    pub fn counts(&self) -> OutcomeCounts {
        OutcomeCounts {
            converted: self.converted.len(),
            copied: self.copied.len(),
            skipped: self.skipped.len(),
            failed: self.failed.len(),
        }
    }
}

/// The four totals printed at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeCounts {
    pub converted: usize,
    pub copied: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl std::fmt::Display for OutcomeCounts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Converted: {}", self.converted)?;
        writeln!(f, "Copied: {}", self.copied)?;
        writeln!(f, "Skipped: {}", self.skipped)?;
        write!(f, "Failed: {}", self.failed)
    }
}

/// Report of a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// Outcomes were planned, not performed.
    pub dry_run: bool,
    /// Files found by the scan.
    pub discovered: usize,
    /// Files matching neither suffix set.
    pub unrecognized: usize,
    #[serde(flatten)]
    pub counts: OutcomeCounts,
    pub failures: Vec<FailureRecord>,
    /// Failed files copied into the error tree.
    pub diverted: usize,
    /// Failed files that could not be copied into the error tree.
    pub diversion_failures: usize,
    /// Final state of every discovered file.
    pub files: Vec<FileRecord>,
}
