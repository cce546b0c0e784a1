//! Batch runner implementation.
//!
//! Drives one run through its phases:
//! - Init: ensure the output root and scratch slot exist
//! - Scanning: walk the source tree once and classify the result
//! - Copying, then Converting: one file at a time
//! - ErrorRecovery: copy every failed source into the error tree

use chrono::Utc;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::config::Config;
use crate::converter::{Converter, ScratchSlot, Transcoder};
use crate::mapper::{expand_root, PathMapper};
use crate::placer::{FsPlacer, PlaceOutcome};
use crate::record::{Disposition, FileOutcome, FileRecord};
use crate::scanner;

use super::error::{ReportError, RunError};
use super::types::{FailureStage, RunCounters, RunPhase, RunSummary};

/// Mirrors a source tree into the output tree, one file at a time.
pub struct BatchRunner<C: Converter> {
    config: Config,
    source_root: PathBuf,
    output_root: PathBuf,
    error_root: PathBuf,
    mapper: PathMapper,
    classifier: Classifier,
    placer: FsPlacer,
    transcoder: Transcoder<C>,
    phase: RunPhase,
}

impl<C: Converter> BatchRunner<C> {
    /// Create a runner for `config`, encoding with `converter`.
    pub fn new(config: Config, converter: C) -> Self {
        let source_root = expand_root(&config.paths.source_dir);
        let output_root = expand_root(&config.paths.output_dir);
        let error_root = expand_root(&config.paths.error_dir);

        let mapper = PathMapper::new(
            source_root.clone(),
            config.formats.audio.clone(),
            config.converter.output_extension.clone(),
        );
        let classifier = Classifier::new(config.formats.extension_sets(), config.formats.match_mode);
        let placer = FsPlacer::new(config.placer.clone());
        let scratch = ScratchSlot::new(
            expand_root(&config.paths.scratch_dir),
            &config.converter.output_extension,
        );
        let transcoder = Transcoder::new(converter, scratch, placer.clone());

        Self {
            config,
            source_root,
            output_root,
            error_root,
            mapper,
            classifier,
            placer,
            transcoder,
            phase: RunPhase::Init,
        }
    }

    /// The phase the last run reached.
    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn converter(&self) -> &C {
        self.transcoder.converter()
    }

    /// Executes a full run.
    ///
    /// Per-file failures are part of the summary. Only scan and setup
    /// problems return an error.
    pub async fn run(&mut self) -> Result<RunSummary, RunError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("run", %run_id, dry_run = self.config.dry_run);
        self.execute(run_id).instrument(span).await
    }

    async fn execute(&mut self, run_id: Uuid) -> Result<RunSummary, RunError> {
        let started_at = Utc::now();

        self.enter(RunPhase::Init);
        self.init().await?;

        self.enter(RunPhase::Scanning);
        info!("Scanning {}", self.source_root.display());
        let paths = match scanner::scan(&self.source_root).await {
            Ok(paths) => paths,
            Err(e) => {
                error!("Scan of {} failed: {}", self.source_root.display(), e);
                self.teardown().await;
                return Err(e.into());
            }
        };
        let classification = self.classifier.classify(&paths);

        let mut records = Vec::with_capacity(paths.len());
        for path in &classification.unrecognized {
            debug!("Ignoring {}", path.display());
            records.push(FileRecord::discovered(path).classify(Disposition::Unrecognized));
        }

        let mut counters = RunCounters::new();

        self.enter(RunPhase::Copying);
        counters.merge(self.copy_stage(&classification.to_copy, &mut records).await);

        self.enter(RunPhase::Converting);
        counters.merge(
            self.convert_stage(&classification.to_convert, &mut records)
                .await,
        );

        self.enter(RunPhase::ErrorRecovery);
        let (diverted, diversion_failures) = self.divert_failures(counters.failed.as_slice()).await;

        self.enter(RunPhase::Summarized);
        self.teardown().await;

        let summary = RunSummary {
            run_id,
            started_at,
            finished_at: Utc::now(),
            dry_run: self.config.dry_run,
            discovered: paths.len(),
            unrecognized: classification.unrecognized.len(),
            counts: counters.counts(),
            failures: counters.failures,
            diverted,
            diversion_failures,
            files: records,
        };

        info!(
            converted = summary.counts.converted,
            copied = summary.counts.copied,
            skipped = summary.counts.skipped,
            failed = summary.counts.failed,
            "Run complete"
        );

        if let Some(report_path) = &self.config.report_path {
            if let Err(e) = write_report(report_path, &summary).await {
                error!("{}", e);
            }
        }

        Ok(summary)
    }

    fn enter(&mut self, phase: RunPhase) {
        debug!("Entering {} phase", phase);
        self.phase = phase;
    }

    async fn init(&self) -> Result<(), RunError> {
        for suffix in self.config.overlapping_suffixes() {
            warn!(
                "Suffix {} is configured for both copying and converting, matching files will be processed twice",
                suffix
            );
        }

        if self.config.dry_run {
            info!("Dry run: no files will be written and the encoder will not be started");
            return Ok(());
        }

        tokio::fs::create_dir_all(&self.output_root)
            .await
            .map_err(|e| RunError::setup(&self.output_root, e))?;

        self.transcoder
            .prepare()
            .await
            .map_err(|e| RunError::setup(self.transcoder.scratch().dir(), e))?;

        Ok(())
    }

    async fn teardown(&self) {
        if self.config.dry_run {
            return;
        }
        if let Err(e) = self.transcoder.release().await {
            warn!(
                "Failed to clean up scratch directory {}: {}",
                self.transcoder.scratch().dir().display(),
                e
            );
        }
    }

    async fn copy_stage(&self, paths: &[PathBuf], records: &mut Vec<FileRecord>) -> RunCounters {
        let mut counters = RunCounters::new();
        let total = paths.len();

        info!("Copying {} files to {}", total, self.output_root.display());

        for (index, source) in paths.iter().enumerate() {
            let record = FileRecord::discovered(source).classify(Disposition::Copy);
            let outcome = self.copy_one(source, index, total).await;

            if let FileOutcome::Failed { reason } = &outcome {
                warn!("Failed to copy {}: {}", source.display(), reason);
            }

            counters.record(FailureStage::Copy, source, &outcome);
            records.push(record.process(outcome));
        }

        counters
    }

    async fn copy_one(&self, source: &Path, index: usize, total: usize) -> FileOutcome {
        let mapping = match self.mapper.map(source, &self.output_root) {
            Ok(mapping) => mapping,
            Err(e) => return FileOutcome::failed(e.to_string()),
        };
        let destination = mapping.destination();

        info!("[ {} / {} ] : {}", index + 1, total, destination.display());

        if self.config.dry_run {
            return planned(&destination, FileOutcome::Copied);
        }

        match self.placer.place(source, &destination, false).await {
            Ok(PlaceOutcome::Placed(_)) => FileOutcome::Copied,
            Ok(PlaceOutcome::AlreadyExists) => FileOutcome::Skipped,
            Err(e) => FileOutcome::failed(e.to_string()),
        }
    }

    async fn convert_stage(
        &mut self,
        paths: &[PathBuf],
        records: &mut Vec<FileRecord>,
    ) -> RunCounters {
        let mut counters = RunCounters::new();
        let total = paths.len();

        info!(
            "Converting {} files to {} with {}",
            total,
            self.output_root.display(),
            self.transcoder.converter().name()
        );

        for (index, source) in paths.iter().enumerate() {
            let record = FileRecord::discovered(source).classify(Disposition::Convert);

            let outcome = match self.mapper.map_converted(source, &self.output_root) {
                Ok(mapping) => {
                    let destination = mapping.destination();
                    info!("[ {} / {} ] : {}", index + 1, total, destination.display());

                    if self.config.dry_run {
                        planned(&destination, FileOutcome::Converted)
                    } else {
                        self.transcoder.convert_one(source, &mapping).await
                    }
                }
                Err(e) => FileOutcome::failed(e.to_string()),
            };

            if let FileOutcome::Failed { reason } = &outcome {
                warn!("Failed to convert {}: {}", source.display(), reason);
            }

            counters.record(FailureStage::Convert, source, &outcome);
            records.push(record.process(outcome));
        }

        counters
    }

    /// Copies failed sources into the error tree, best effort.
    ///
    /// Returns the number of diverted files and the number that could not be
    /// diverted.
    async fn divert_failures(&self, failed: &[PathBuf]) -> (usize, usize) {
        if failed.is_empty() {
            return (0, 0);
        }

        let total = failed.len();
        let mut diverted = 0;
        let mut diversion_failures = 0;

        info!(
            "Copying {} failed files to {}",
            total,
            self.error_root.display()
        );

        for (index, source) in failed.iter().enumerate() {
            let mapping = match self.mapper.map(source, &self.error_root) {
                Ok(mapping) => mapping,
                Err(e) => {
                    warn!("Cannot divert {}: {}", source.display(), e);
                    diversion_failures += 1;
                    continue;
                }
            };
            let destination = mapping.destination();

            info!("[ {} / {} ] : {}", index + 1, total, destination.display());

            if self.config.dry_run {
                diverted += 1;
                continue;
            }

            match self.placer.place(source, &destination, true).await {
                Ok(_) => diverted += 1,
                Err(e) => {
                    warn!("Failed to divert {}: {}", source.display(), e);
                    diversion_failures += 1;
                }
            }
        }

        (diverted, diversion_failures)
    }
}

/// Outcome a dry run reports for a file that would be written to `destination`.
fn planned(destination: &Path, action: FileOutcome) -> FileOutcome {
    if destination.is_file() {
        FileOutcome::Skipped
    } else {
        action
    }
}

async fn write_report(path: &Path, summary: &RunSummary) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(summary)?;
    tokio::fs::write(path, json)
        .await
        .map_err(|e| ReportError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;

    info!("Wrote run report to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockConverter;
    use std::fs;
    use tempfile::TempDir;

    struct Layout {
        temp: TempDir,
    }

    impl Layout {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            fs::create_dir_all(temp.path().join("src")).unwrap();
            Self { temp }
        }

        fn src(&self) -> PathBuf {
            self.temp.path().join("src")
        }

        fn out(&self) -> PathBuf {
            self.temp.path().join("out")
        }

        fn err(&self) -> PathBuf {
            self.temp.path().join("err")
        }

        fn write_source(&self, relative: &str, content: &[u8]) {
            let path = self.src().join(relative);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn config(&self) -> Config {
            let mut config = Config::default();
            config.paths.source_dir = self.src();
            config.paths.output_dir = self.out();
            config.paths.error_dir = self.err();
            config.paths.scratch_dir = self.temp.path().join("scratch");
            config
        }
    }

    #[tokio::test]
    async fn test_run_reaches_summarized() {
        let layout = Layout::new();
        layout.write_source("album/01 track.wav", b"RIFF");
        layout.write_source("album/cover.jpg", b"JPEG");
        layout.write_source("album/notes.txt", b"text");

        let mut runner = BatchRunner::new(layout.config(), MockConverter::new());
        let summary = runner.run().await.unwrap();

        assert_eq!(runner.phase(), RunPhase::Summarized);
        assert_eq!(summary.discovered, 3);
        assert_eq!(summary.unrecognized, 1);
        assert_eq!(summary.counts.converted, 1);
        assert_eq!(summary.counts.copied, 1);
        assert_eq!(summary.files.len(), 3);
        assert!(layout.out().join("album/01 track.mp3").is_file());
        assert!(!layout.out().join("album/notes.txt").exists());
    }

    #[tokio::test]
    async fn test_missing_source_root_is_fatal() {
        let layout = Layout::new();
        let mut config = layout.config();
        config.paths.source_dir = layout.temp.path().join("missing");

        let mut runner = BatchRunner::new(config, MockConverter::new());
        let result = runner.run().await;

        assert!(matches!(result, Err(RunError::Scan(_))));
        assert_eq!(runner.phase(), RunPhase::Scanning);
        // Scratch directory is torn down again.
        assert!(!layout.temp.path().join("scratch").exists());
    }

    #[tokio::test]
    async fn test_unwritable_output_root_is_fatal() {
        let layout = Layout::new();
        fs::write(layout.out(), b"a file, not a directory").unwrap();

        let mut runner = BatchRunner::new(layout.config(), MockConverter::new());
        let result = runner.run().await;

        assert!(matches!(result, Err(RunError::Setup { .. })));
        assert_eq!(runner.phase(), RunPhase::Init);
    }

    #[tokio::test]
    async fn test_stale_scratch_file_is_removed() {
        let layout = Layout::new();
        let scratch = layout.temp.path().join("scratch");
        fs::create_dir_all(&scratch).unwrap();
        fs::write(scratch.join("tmp.mp3"), b"half-written").unwrap();

        let mut runner = BatchRunner::new(layout.config(), MockConverter::new());
        runner.run().await.unwrap();

        assert!(!scratch.exists());
    }

    #[tokio::test]
    async fn test_copy_failure_is_diverted() {
        let layout = Layout::new();
        layout.write_source("album/cover.jpg", b"JPEG");
        // Occupy the destination directory with a file.
        fs::create_dir_all(layout.out()).unwrap();
        fs::write(layout.out().join("album"), b"blocker").unwrap();

        let mut runner = BatchRunner::new(layout.config(), MockConverter::new());
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.counts.failed, 1);
        assert_eq!(summary.failures[0].stage, FailureStage::Copy);
        assert_eq!(summary.diverted, 1);
        assert_eq!(
            fs::read(layout.err().join("album/cover.jpg")).unwrap(),
            b"JPEG"
        );
    }

    #[tokio::test]
    async fn test_blocked_error_root_counts_diversion_failures() {
        let layout = Layout::new();
        layout.write_source("album/broken.wav", b"RIFF");
        layout.write_source("album/cover.jpg", b"JPEG");
        fs::write(layout.err(), b"a file, not a directory").unwrap();

        let converter = MockConverter::new();
        converter.fail_on("broken").await;
        let mut runner = BatchRunner::new(layout.config(), converter);
        let summary = runner.run().await.unwrap();

        assert_eq!(runner.phase(), RunPhase::Summarized);
        assert_eq!(summary.counts.failed, 1);
        assert_eq!(summary.counts.copied, 1);
        assert_eq!(summary.diverted, 0);
        assert_eq!(summary.diversion_failures, 1);
        assert!(layout.err().is_file());
    }

    #[tokio::test]
    async fn test_unmappable_name_fails_and_is_diverted() {
        let layout = Layout::new();
        // Matches ".wav" anywhere in the path, but the name itself has no audio suffix.
        layout.write_source("live.wav.d/readme", b"text");

        let mut runner = BatchRunner::new(layout.config(), MockConverter::new());
        let summary = runner.run().await.unwrap();

        assert_eq!(summary.counts.failed, 1);
        assert!(summary.failures[0].reason.contains("readme"));
        assert_eq!(runner.converter().invocation_count().await, 0);
        assert!(layout.err().join("live.wav.d/readme").is_file());
    }

    #[tokio::test]
    async fn test_report_is_written() {
        let layout = Layout::new();
        layout.write_source("a.wav", b"RIFF");
        let report_path = layout.temp.path().join("report.json");
        let mut config = layout.config();
        config.report_path = Some(report_path.clone());

        let mut runner = BatchRunner::new(config, MockConverter::new());
        let summary = runner.run().await.unwrap();

        let report: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
        assert_eq!(report["run_id"], summary.run_id.to_string());
        assert_eq!(report["converted"], 1);
        assert_eq!(report["dry_run"], false);
    }

    #[tokio::test]
    async fn test_unwritable_report_does_not_fail_the_run() {
        let layout = Layout::new();
        layout.write_source("album/cover.jpg", b"JPEG");
        let mut config = layout.config();
        config.report_path = Some(layout.temp.path().join("no/such/dir/report.json"));

        let mut runner = BatchRunner::new(config, MockConverter::new());
        let summary = runner.run().await.unwrap();

        assert_eq!(runner.phase(), RunPhase::Summarized);
        assert_eq!(summary.counts.copied, 1);
        assert!(!layout.temp.path().join("no").exists());
    }

    #[tokio::test]
    async fn test_write_report_error() {
        let temp = TempDir::new().unwrap();
        let summary = RunSummary {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            finished_at: Utc::now(),
            dry_run: false,
            discovered: 0,
            unrecognized: 0,
            counts: Default::default(),
            failures: Vec::new(),
            diverted: 0,
            diversion_failures: 0,
            files: Vec::new(),
        };

        let result = write_report(&temp.path().join("missing/report.json"), &summary).await;
        assert!(matches!(result, Err(ReportError::Write { .. })));
    }

    #[test]
    fn test_planned_outcome() {
        let temp = TempDir::new().unwrap();
        let existing = temp.path().join("cover.jpg");
        fs::write(&existing, b"JPEG").unwrap();

        assert_eq!(planned(&existing, FileOutcome::Copied), FileOutcome::Skipped);
        assert_eq!(
            planned(&temp.path().join("new.mp3"), FileOutcome::Converted),
            FileOutcome::Converted
        );
    }
}
