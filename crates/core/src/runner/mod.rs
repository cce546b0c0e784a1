//! Batch runner module.
//!
//! `BatchRunner` strings the other modules together: it scans the source tree
//! once, classifies what it found, copies and converts file by file, and
//! finally diverts every failed source into the error tree.
//!
//! A run is resumable. Destinations that already exist are reported as
//! skipped, so re-running over an unchanged tree performs no work.

mod error;
mod runner;
mod types;

pub use error::{ReportError, RunError};
pub use runner::BatchRunner;
pub use types::{
    FailureRecord, FailureStage, OutcomeCounts, PathSet, RunCounters, RunPhase, RunSummary,
};
