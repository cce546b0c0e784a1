//! Classifier module for partitioning discovered files.
//!
//! Files are sorted into three ordered sets by suffix membership:
//! - convert: any audio suffix matches
//! - copy: any copy suffix matches
//! - unrecognized: neither matches
//!
//! Membership in the convert and copy sets is tested independently, so a path
//! matching both lands in both and is processed twice. [`Config::overlapping_suffixes`]
//! surfaces the configurations that make this likely.
//!
//! [`Config::overlapping_suffixes`]: crate::config::Config::overlapping_suffixes

mod matchers;
mod partition;
mod traits;
mod types;

pub use matchers::{ExtensionMatcher, SubstringMatcher};
pub use partition::Classifier;
pub use traits::SuffixMatcher;
pub use types::{Classification, ExtensionSets, MatchMode};
