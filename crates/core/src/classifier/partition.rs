//! Partitioning of discovered paths.

use std::path::PathBuf;
use tracing::{debug, warn};

use super::matchers::{ExtensionMatcher, SubstringMatcher};
use super::traits::SuffixMatcher;
use super::types::{Classification, ExtensionSets, MatchMode};

/// Sorts paths into convert / copy / unrecognized sets.
pub struct Classifier {
    sets: ExtensionSets,
    matcher: Box<dyn SuffixMatcher>,
}

impl Classifier {
    /// Creates a classifier using the given matching mode.
    pub fn new(sets: ExtensionSets, mode: MatchMode) -> Self {
        let matcher: Box<dyn SuffixMatcher> = match mode {
            MatchMode::Substring => Box::new(SubstringMatcher),
            MatchMode::Extension => Box::new(ExtensionMatcher),
        };
        Self::with_matcher(sets, matcher)
    }

    /// Creates a classifier with a custom matching strategy.
    pub fn with_matcher(sets: ExtensionSets, matcher: Box<dyn SuffixMatcher>) -> Self {
        Self { sets, matcher }
    }

    /// Classifies `paths`, preserving input order within each set.
    pub fn classify(&self, paths: &[PathBuf]) -> Classification {
        let mut classification = Classification::default();

        for path in paths {
            let convert = self.matcher.matches(path, &self.sets.audio);
            let copy = self.matcher.matches(path, &self.sets.copy);

            if convert {
                classification.to_convert.push(path.clone());
            }
            if copy {
                classification.to_copy.push(path.clone());
            }
            if convert && copy {
                warn!(
                    "{} matches both audio and copy suffixes, it will be copied and converted",
                    path.display()
                );
            }
            if !convert && !copy {
                classification.unrecognized.push(path.clone());
            }
        }

        debug!(
            matcher = self.matcher.name(),
            convert = classification.to_convert.len(),
            copy = classification.to_copy.len(),
            unrecognized = classification.unrecognized.len(),
            "Classified {} files",
            paths.len()
        );

        classification
    }
}
