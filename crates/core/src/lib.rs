pub mod classifier;
pub mod config;
pub mod converter;
pub mod mapper;
pub mod placer;
pub mod record;
pub mod runner;
pub mod scanner;
pub mod testing;

pub use classifier::{Classification, Classifier, ExtensionSets, MatchMode};
pub use config::{
    load_config, load_config_from_str, load_default_config, validate_config, Config, ConfigError,
};
pub use converter::{Converter, ConverterError, FfmpegConverter};
pub use mapper::{MappingError, PathMapper, PathMapping};
pub use record::{Disposition, FileOutcome, FileRecord, FileState};
pub use runner::{BatchRunner, RunCounters, RunError, RunPhase, RunSummary};
pub use scanner::{scan, ScanError};
