//! Directory walking.

use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::error::ScanError;

/// Lists every regular file below `root`, dotfiles included.
///
/// Entries come back in filesystem enumeration order. Any unreadable entry
/// fails the whole scan.
pub async fn scan(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let root = root.to_path_buf();
    tokio::task::spawn_blocking(move || scan_blocking(&root)).await?
}

/// Synchronous variant of [`scan`].
pub fn scan_blocking(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    if !root.exists() {
        return Err(ScanError::RootNotFound {
            path: root.to_path_buf(),
        });
    }
    if !root.is_dir() {
        return Err(ScanError::NotADirectory {
            path: root.to_path_buf(),
        });
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|e| ScanError::Walk {
            path: e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf()),
            source: e,
        })?;

        // Symlinks to files count, symlinked directories are not descended.
        if entry.path().is_file() {
            debug!("Discovered: {}", entry.path().display());
            files.push(entry.into_path());
        }
    }

    info!("Discovered {} files under {}", files.len(), root.display());

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_scan_lists_nested_files_and_dotfiles() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("a/b")).unwrap();
        fs::create_dir_all(root.join(".hidden_dir")).unwrap();
        fs::write(root.join("top.jpg"), b"1").unwrap();
        fs::write(root.join("a/track.wav"), b"2").unwrap();
        fs::write(root.join("a/b/.DS_Store"), b"3").unwrap();
        fs::write(root.join(".hidden_dir/x.m4a"), b"4").unwrap();

        let mut files = scan(root).await.unwrap();
        files.sort();

        let mut expected = vec![
            root.join("top.jpg"),
            root.join("a/track.wav"),
            root.join("a/b/.DS_Store"),
            root.join(".hidden_dir/x.m4a"),
        ];
        expected.sort();
        assert_eq!(files, expected);
    }

    #[tokio::test]
    async fn test_scan_excludes_directories() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("empty/deeper")).unwrap();

        let files = scan(temp.path()).await.unwrap();
        assert!(files.is_empty());
    }

    #[tokio::test]
    async fn test_scan_paths_keep_root_prefix() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("a.wav"), b"x").unwrap();

        let files = scan(temp.path()).await.unwrap();
        assert!(files.iter().all(|f| f.starts_with(temp.path())));
    }

    #[tokio::test]
    async fn test_scan_missing_root_fails() {
        let temp = TempDir::new().unwrap();
        let result = scan(&temp.path().join("missing")).await;
        assert!(matches!(result, Err(ScanError::RootNotFound { .. })));
    }

    #[test]
    fn test_scan_file_root_fails() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("file.wav");
        fs::write(&file, b"x").unwrap();

        let result = scan_blocking(&file);
        assert!(matches!(result, Err(ScanError::NotADirectory { .. })));
    }
}
