use super::{types::Config, ConfigError};
use crate::mapper::{expand_root, normalize_lexically};
use std::path::{Path, PathBuf};

/// Validate configuration
/// Currently validates:
/// - Bitrate is set
/// - Output extension starts with a dot
/// - At least one audio suffix, no empty suffixes
/// - Output and error roots differ
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.converter.bitrate.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "converter.bitrate cannot be empty".to_string(),
        ));
    }

    let ext = &config.converter.output_extension;
    if !ext.starts_with('.') || ext.len() < 2 {
        return Err(ConfigError::ValidationError(format!(
            "converter.output_extension must look like \".mp3\", got {:?}",
            ext
        )));
    }

    if config.formats.audio.is_empty() {
        return Err(ConfigError::ValidationError(
            "formats.audio must list at least one suffix".to_string(),
        ));
    }

    if config
        .formats
        .audio
        .iter()
        .chain(config.formats.copy.iter())
        .any(|s| s.is_empty())
    {
        return Err(ConfigError::ValidationError(
            "formats cannot contain empty suffixes".to_string(),
        ));
    }

    if resolved_root(&config.paths.output_dir) == resolved_root(&config.paths.error_dir) {
        return Err(ConfigError::ValidationError(
            "paths.output_dir and paths.error_dir must differ".to_string(),
        ));
    }

    Ok(())
}

fn resolved_root(path: &Path) -> PathBuf {
    normalize_lexically(&expand_root(path))
}
