//! Suffix matching strategies.

use std::path::Path;

use super::traits::SuffixMatcher;

/// Matches when a suffix occurs anywhere in the path.
///
/// `/music/old.wav.files/readme.txt` matches `.wav` even though the file is a
/// text file. Directories are part of the haystack.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstringMatcher;

impl SuffixMatcher for SubstringMatcher {
    fn name(&self) -> &str {
        "substring"
    }

    fn matches(&self, path: &Path, suffixes: &[String]) -> bool {
        let haystack = path.to_string_lossy();
        suffixes.iter().any(|s| haystack.contains(s.as_str()))
    }
}

/// Matches when the file name ends with a suffix.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExtensionMatcher;

impl SuffixMatcher for ExtensionMatcher {
    fn name(&self) -> &str {
        "extension"
    }

    fn matches(&self, path: &Path, suffixes: &[String]) -> bool {
        let Some(name) = path.file_name() else {
            return false;
        };
        let name = name.to_string_lossy();
        suffixes.iter().any(|s| name.ends_with(s.as_str()))
    }
}
