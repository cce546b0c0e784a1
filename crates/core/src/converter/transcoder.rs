//! Single-file transcoding with destination checks.

use std::path::Path;
use tracing::{debug, warn};

use super::scratch::ScratchSlot;
use super::traits::Converter;
use super::types::EncodeJob;
use crate::mapper::PathMapping;
use crate::placer::FsPlacer;
use crate::record::FileOutcome;

/// Converts files one at a time through the run's scratch slot.
pub struct Transcoder<C: Converter> {
    converter: C,
    scratch: ScratchSlot,
    placer: FsPlacer,
}

impl<C: Converter> Transcoder<C> {
    pub fn new(converter: C, scratch: ScratchSlot, placer: FsPlacer) -> Self {
        Self {
            converter,
            scratch,
            placer,
        }
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn scratch(&self) -> &ScratchSlot {
        &self.scratch
    }

    /// Readies the scratch slot for a run.
    pub async fn prepare(&self) -> std::io::Result<()> {
        self.scratch.prepare().await
    }

    /// Tears the scratch slot down after a run.
    pub async fn release(&self) -> std::io::Result<()> {
        self.scratch.release().await
    }

    /// Converts `source` to `mapping`'s destination.
    ///
    /// Returns `Skipped` without invoking the encoder when the destination is
    /// already a regular file. On failure the destination is left untouched and
    /// the scratch file is removed.
    pub async fn convert_one(&mut self, source: &Path, mapping: &PathMapping) -> FileOutcome {
        let destination = mapping.destination();

        if destination.is_file() {
            debug!("{} already exists, skipping", destination.display());
            return FileOutcome::Skipped;
        }

        match self.encode_into(source, mapping, &destination).await {
            Ok(()) => FileOutcome::Converted,
            Err(reason) => {
                if let Err(e) = self.scratch.clear().await {
                    warn!("Failed to remove scratch file {}: {}", self.scratch.path().display(), e);
                }
                FileOutcome::failed(reason)
            }
        }
    }

    async fn encode_into(
        &mut self,
        source: &Path,
        mapping: &PathMapping,
        destination: &Path,
    ) -> Result<(), String> {
        tokio::fs::create_dir_all(&mapping.directory)
            .await
            .map_err(|e| format!("cannot create {}: {}", mapping.directory.display(), e))?;

        let job = EncodeJob {
            input_path: source.to_path_buf(),
            output_path: self.scratch.path(),
        };

        let result = self
            .converter
            .encode(&job)
            .await
            .map_err(|e| e.summary())?;

        debug!(
            "{} encoded {} bytes in {} ms",
            self.converter.name(),
            result.output_size_bytes,
            result.duration_ms
        );

        self.placer
            .move_file(&job.output_path, destination)
            .await
            .map_err(|e| e.to_string())?;

        Ok(())
    }
}
