//! Command line arguments.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

use audiomirror_core::Config;

/// Source root used by the bundled-binary layout, where the tool ships three
/// levels below the library it converts.
const PACKAGED_SOURCE_DIR: &str = "../../../";

/// Config file picked up from the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "audiomirror.toml";

/// audiomirror - mirror a music library into a transcoded copy
///
/// Walks the source tree, transcodes audio files with ffmpeg, copies artwork
/// and already-encoded files verbatim, and copies anything that fails into a
/// separate error tree. Files already present in the output are skipped, so
/// an interrupted run can simply be restarted.
#[derive(Parser, Debug)]
#[command(name = "audiomirror")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to ./audiomirror.toml if present)
    #[arg(short, long, value_name = "FILE", env = "AUDIOMIRROR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Root of the library to mirror
    #[arg(short, long, value_name = "DIR", conflicts_with = "packaged")]
    pub source: Option<PathBuf>,

    /// Root of the mirrored tree
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Root of the tree receiving copies of failed files
    #[arg(short, long, value_name = "DIR")]
    pub errors: Option<PathBuf>,

    /// Use the bundled-binary layout (source root three levels up)
    #[arg(long)]
    pub packaged: bool,

    /// Report planned actions without writing files or running the encoder
    #[arg(long)]
    pub dry_run: bool,

    /// Write a JSON run report to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Verbose output (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Cli {
    /// Log filter used when `RUST_LOG` is not set.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }

    /// Applies command line overrides on top of a loaded configuration.
    pub fn apply(&self, config: &mut Config) {
        if self.packaged {
            config.paths.source_dir = PathBuf::from(PACKAGED_SOURCE_DIR);
        }
        if let Some(source) = &self.source {
            config.paths.source_dir = source.clone();
        }
        if let Some(output) = &self.output {
            config.paths.output_dir = output.clone();
        }
        if let Some(errors) = &self.errors {
            config.paths.error_dir = errors.clone();
        }
        if self.dry_run {
            config.dry_run = true;
        }
        if let Some(report) = &self.report {
            config.report_path = Some(report.clone());
        }
    }
}
