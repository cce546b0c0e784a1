//! Path mapping implementation.

use std::path::{Component, Path, PathBuf};

use super::error::MappingError;

/// Destination of one source file under a chosen output root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathMapping {
    /// Absolute, normalized destination directory.
    pub directory: PathBuf,
    /// Destination file name, never starting with a dot.
    pub file_name: String,
}

impl PathMapping {
    /// Full destination path.
    pub fn destination(&self) -> PathBuf {
        self.directory.join(&self.file_name)
    }
}

/// Maps `source` (below `source_root`) to its place under `destination_root`.
///
/// A leading dot in the file name is rewritten to an underscore.
pub fn map_destination(
    source: &Path,
    source_root: &Path,
    destination_root: &Path,
) -> Result<PathMapping, MappingError> {
    let outside = || MappingError::PathOutsideRoot {
        path: source.to_path_buf(),
        root: source_root.to_path_buf(),
    };

    let source_norm = normalize_lexically(source);
    let root_norm = normalize_lexically(source_root);
    let relative = source_norm.strip_prefix(&root_norm).map_err(|_| outside())?;

    let file_name = relative.file_name().ok_or_else(outside)?;
    let relative_dir = relative.parent().unwrap_or_else(|| Path::new(""));

    let directory = normalize_lexically(&expand_root(destination_root).join(relative_dir));

    Ok(PathMapping {
        directory,
        file_name: undot(&file_name.to_string_lossy()),
    })
}

/// Replaces the audio suffix of `file_name` with `output_extension`.
///
/// Suffixes are tried in order; the first one found wins and the name is cut at
/// its last occurrence, so `a.wav.m4a` with suffixes `[".m4a", ".wav"]` becomes
/// `a.wav` + extension.
pub fn converted_file_name(
    file_name: &str,
    audio_suffixes: &[String],
    output_extension: &str,
) -> Result<String, MappingError> {
    audio_suffixes
        .iter()
        .find_map(|suffix| file_name.rfind(suffix.as_str()))
        .map(|idx| format!("{}{}", &file_name[..idx], output_extension))
        .ok_or_else(|| MappingError::SuffixNotFound {
            file_name: file_name.to_string(),
        })
}

/// Expands a leading `~` and makes the path absolute.
pub fn expand_root(path: &Path) -> PathBuf {
    let expanded = match path.strip_prefix("~") {
        Ok(rest) => match dirs::home_dir() {
            Some(home) => home.join(rest),
            None => path.to_path_buf(),
        },
        Err(_) => path.to_path_buf(),
    };

    std::path::absolute(&expanded).unwrap_or(expanded)
}

/// Resolves `.` and `..` components without touching the filesystem.
///
/// `..` directly below the root is dropped; leading `..` of a relative path is
/// kept.
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.components().next_back() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(".."),
            },
            other => out.push(other.as_os_str()),
        }
    }

    out
}

fn undot(file_name: &str) -> String {
    match file_name.strip_prefix('.') {
        Some(rest) => format!("_{}", rest),
        None => file_name.to_string(),
    }
}

/// Maps files of one source tree onto output and error trees.
#[derive(Debug, Clone)]
pub struct PathMapper {
    source_root: PathBuf,
    audio_suffixes: Vec<String>,
    output_extension: String,
}

impl PathMapper {
    pub fn new(
        source_root: impl Into<PathBuf>,
        audio_suffixes: Vec<String>,
        output_extension: impl Into<String>,
    ) -> Self {
        Self {
            source_root: source_root.into(),
            audio_suffixes,
            output_extension: output_extension.into(),
        }
    }

    /// Mapping for a file kept under its own name.
    pub fn map(&self, source: &Path, destination_root: &Path) -> Result<PathMapping, MappingError> {
        map_destination(source, &self.source_root, destination_root)
    }

    /// Mapping for a file that will be transcoded.
    pub fn map_converted(
        &self,
        source: &Path,
        destination_root: &Path,
    ) -> Result<PathMapping, MappingError> {
        let mapping = self.map(source, destination_root)?;
        let file_name = converted_file_name(
            &mapping.file_name,
            &self.audio_suffixes,
            &self.output_extension,
        )?;
        Ok(PathMapping {
            directory: mapping.directory,
            file_name,
        })
    }
}
