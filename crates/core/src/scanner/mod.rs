//! Recursive discovery of source files.

mod error;
mod walk;

pub use error::ScanError;
pub use walk::{scan, scan_blocking};
