//! Placer module for materializing files in destination trees.
//!
//! `FsPlacer` handles the two filesystem writes of a run:
//! - Copying: verbatim copies into the output and error trees
//! - Moving: relocating finished encoder output out of the scratch slot
//!
//! Copies never leave a truncated destination behind; a failed copy removes
//! whatever it wrote so the next run does not mistake it for finished output.

mod config;
mod error;
mod fs_placer;
mod types;

pub use config::PlacerConfig;
pub use error::PlacerError;
pub use fs_placer::FsPlacer;
pub use types::{PlaceOutcome, PlacedFile};
