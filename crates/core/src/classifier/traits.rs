//! Trait definitions for the classifier module.

use std::path::Path;

/// Decides whether a path carries one of a set of suffixes.
pub trait SuffixMatcher: Send + Sync {
    /// Returns the name of this matching strategy.
    fn name(&self) -> &str;

    /// Returns true if `path` matches any of `suffixes`.
    fn matches(&self, path: &Path, suffixes: &[String]) -> bool;
}
