//! Converter module for transcoding audio files.
//!
//! This module provides the `Converter` trait, its FFmpeg implementation and
//! the `Transcoder`, which wraps a converter with destination checks and the
//! run's scratch slot.
//!
//! The encoder never writes to the final destination directly. Output goes to
//! a single scratch file and is moved into place only after the encoder exits
//! successfully, so a destination that exists is always complete.
//!
//! # Example
//!
//! ```ignore
//! use audiomirror_core::converter::{ConverterConfig, FfmpegConverter, ScratchSlot, Transcoder};
//! use audiomirror_core::placer::FsPlacer;
//!
//! let config = ConverterConfig::default();
//! let scratch = ScratchSlot::new("./tmp", &config.output_extension);
//! let mut transcoder = Transcoder::new(FfmpegConverter::new(config), scratch, FsPlacer::with_defaults());
//!
//! transcoder.prepare().await?;
//! let outcome = transcoder.convert_one(Path::new("/music/a.wav"), &mapping).await;
//! ```

mod config;
mod error;
mod ffmpeg;
mod scratch;
mod traits;
mod transcoder;
mod types;

pub use config::ConverterConfig;
pub use error::ConverterError;
pub use ffmpeg::FfmpegConverter;
pub use scratch::ScratchSlot;
pub use traits::Converter;
pub use transcoder::Transcoder;
pub use types::{EncodeJob, EncodeResult, MetadataMode};
