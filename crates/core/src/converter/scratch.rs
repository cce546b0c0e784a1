//! The run's scratch slot.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// A single, fixed scratch file that receives encoder output before it is
/// moved to its destination.
///
/// There is one slot per run and every conversion reuses it, so only one
/// conversion may be in flight at a time. [`Transcoder`] enforces this by
/// requiring `&mut self` to convert.
///
/// [`Transcoder`]: super::Transcoder
#[derive(Debug, Clone)]
pub struct ScratchSlot {
    dir: PathBuf,
    file_name: String,
}

impl ScratchSlot {
    /// Creates a slot named `tmp<output_extension>` inside `dir`.
    ///
    /// The extension matters: ffmpeg picks the output container from it.
    pub fn new(dir: impl Into<PathBuf>, output_extension: &str) -> Self {
        Self {
            dir: dir.into(),
            file_name: format!("tmp{}", output_extension),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path of the scratch file.
    pub fn path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Creates the scratch directory and removes a stale scratch file left by
    /// an interrupted run.
    pub async fn prepare(&self) -> std::io::Result<()> {
        fs::create_dir_all(&self.dir).await?;
        self.clear().await
    }

    /// Removes the scratch file if present.
    pub async fn clear(&self) -> std::io::Result<()> {
        match fs::remove_file(self.path()).await {
            Ok(()) => {
                debug!("Removed scratch file {}", self.path().display());
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e),
        }
    }

    /// Clears the slot and removes the scratch directory if it is empty.
    pub async fn release(&self) -> std::io::Result<()> {
        self.clear().await?;
        match fs::remove_dir(&self.dir).await {
            Ok(()) => Ok(()),
            // Directory shared with other files, or already gone.
            Err(e) if e.kind() == ErrorKind::NotFound || e.kind() == ErrorKind::DirectoryNotEmpty => {
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}
