//! File system placer implementation.

use sha2::{Digest, Sha256};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncWriteExt, BufReader, BufWriter};
use tracing::{debug, warn};

use super::config::PlacerConfig;
use super::error::PlacerError;
use super::types::{PlaceOutcome, PlacedFile};

/// File system based placer implementation.
#[derive(Debug, Clone)]
pub struct FsPlacer {
    config: PlacerConfig,
}

impl FsPlacer {
    /// Creates a new file system placer with the given configuration.
    pub fn new(config: PlacerConfig) -> Self {
        Self { config }
    }

    /// Creates a placer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(PlacerConfig::default())
    }

    /// Copies `source` to `destination`, creating parent directories.
    ///
    /// An existing regular file at `destination` is left alone unless
    /// `overwrite` is set.
    pub async fn place(
        &self,
        source: &Path,
        destination: &Path,
        overwrite: bool,
    ) -> Result<PlaceOutcome, PlacerError> {
        if destination.is_file() && !overwrite {
            return Ok(PlaceOutcome::AlreadyExists);
        }

        if !source.is_file() {
            return Err(PlacerError::SourceNotFound {
                path: source.to_path_buf(),
            });
        }

        self.ensure_parent_dirs(destination).await?;

        let (size_bytes, checksum) = self
            .copy_staged(source, destination, self.config.verify_checksums)
            .await?;

        Ok(PlaceOutcome::Placed(PlacedFile {
            destination: destination.to_path_buf(),
            size_bytes,
            checksum,
        }))
    }

    /// Moves `source` to `destination`, replacing it.
    ///
    /// Uses a rename when both paths are on the same filesystem, otherwise
    /// copies and removes the source. Returns the number of bytes moved.
    pub async fn move_file(&self, source: &Path, destination: &Path) -> Result<u64, PlacerError> {
        self.ensure_parent_dirs(destination).await?;

        let moved = Self::try_atomic_move(source, destination)
            .await
            .map_err(|e| {
                PlacerError::move_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

        if moved {
            return Ok(fs::metadata(destination).await?.len());
        }

        debug!(
            "{} and {} are on different filesystems, copying",
            source.display(),
            destination.display()
        );
        self.copy_then_remove(source, destination).await
    }

    async fn copy_then_remove(
        &self,
        source: &Path,
        destination: &Path,
    ) -> Result<u64, PlacerError> {
        let (size, _) = self.copy_staged(source, destination, false).await?;
        fs::remove_file(source).await.map_err(|e| {
            PlacerError::move_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;
        Ok(size)
    }

    /// Copies `source` next to `destination` under a hidden `.partial` name
    /// and renames it into place once complete.
    ///
    /// `destination` never holds a truncated file, even if the process dies
    /// mid-copy.
    async fn copy_staged(
        &self,
        source: &Path,
        destination: &Path,
        verify: bool,
    ) -> Result<(u64, Option<String>), PlacerError> {
        let partial = partial_path(destination);

        let staged = async {
            let (size, source_checksum) = self.copy_file(source, &partial, verify).await?;

            let checksum = match source_checksum {
                Some(expected) => Some(
                    self.verify_checksum(&partial, destination, expected)
                        .await?,
                ),
                None => None,
            };

            fs::rename(&partial, destination).await.map_err(|e| {
                PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            Ok::<_, PlacerError>((size, checksum))
        }
        .await;

        if staged.is_err() {
            Self::remove_partial(&partial).await;
        }
        staged
    }

    /// Hashes the written file and compares it with the hash of the bytes
    /// read from the source.
    async fn verify_checksum(
        &self,
        written: &Path,
        destination: &Path,
        expected: String,
    ) -> Result<String, PlacerError> {
        let actual = self.calculate_checksum(written).await?;
        if actual != expected {
            return Err(PlacerError::ChecksumMismatch {
                path: destination.to_path_buf(),
                expected,
                actual,
            });
        }
        Ok(actual)
    }

    /// Attempts to move a file atomically (rename).
    async fn try_atomic_move(source: &Path, destination: &Path) -> Result<bool, std::io::Error> {
        match fs::rename(source, destination).await {
            Ok(()) => Ok(true),
            Err(e) => {
                // Cross-filesystem moves fail with EXDEV (18 on Linux)
                if e.kind() == ErrorKind::CrossesDevices || e.raw_os_error() == Some(18) {
                    Ok(false)
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Copies a file with optional checksum calculation.
    async fn copy_file(
        &self,
        source: &Path,
        destination: &Path,
        calculate_checksum: bool,
    ) -> Result<(u64, Option<String>), PlacerError> {
        let source_file = File::open(source).await.map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                PlacerError::SourceNotFound {
                    path: source.to_path_buf(),
                }
            } else {
                PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            }
        })?;

        let dest_file = File::create(destination).await.map_err(|e| {
            PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        let mut reader = BufReader::with_capacity(self.config.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.config.buffer_size, dest_file);

        let mut hasher = if calculate_checksum {
            Some(Sha256::new())
        } else {
            None
        };

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; self.config.buffer_size];

        loop {
            let bytes_read = reader.read(&mut buffer).await.map_err(|e| {
                PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            if bytes_read == 0 {
                break;
            }

            if let Some(ref mut h) = hasher {
                h.update(&buffer[..bytes_read]);
            }

            writer.write_all(&buffer[..bytes_read]).await.map_err(|e| {
                PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
            })?;

            total_bytes += bytes_read as u64;
        }

        writer.flush().await.map_err(|e| {
            PlacerError::copy_failed(source.to_path_buf(), destination.to_path_buf(), e)
        })?;

        let checksum = hasher.map(|h| format!("{:x}", h.finalize()));

        Ok((total_bytes, checksum))
    }

    /// Calculates the SHA-256 checksum of a file.
    async fn calculate_checksum(&self, path: &Path) -> Result<String, PlacerError> {
        let file = File::open(path).await?;
        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut buffer = vec![0u8; self.config.buffer_size];
        let mut hasher = Sha256::new();

        loop {
            let bytes_read = reader.read(&mut buffer).await?;
            if bytes_read == 0 {
                break;
            }
            hasher.update(&buffer[..bytes_read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Creates parent directories for a path.
    async fn ensure_parent_dirs(&self, path: &Path) -> Result<(), PlacerError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| PlacerError::DirectoryCreationFailed {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
        }
        Ok(())
    }

    async fn remove_partial(path: &Path) {
        if let Err(e) = fs::remove_file(path).await {
            if e.kind() != ErrorKind::NotFound {
                warn!("Failed to remove partial file {}: {}", path.display(), e);
            }
        }
    }
}

/// Sibling of `destination` receiving an in-progress copy.
fn partial_path(destination: &Path) -> PathBuf {
    let name = destination
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    destination.with_file_name(format!(".{}.partial", name))
}
