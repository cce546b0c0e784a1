use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use std::path::Path;

use super::{types::Config, ConfigError};

/// Prefix of environment variables overriding configuration values.
///
/// Nested keys are separated by a double underscore, e.g.
/// `AUDIOMIRROR_PATHS__OUTPUT_DIR`.
const ENV_PREFIX: &str = "AUDIOMIRROR_";

/// Load configuration from file with environment variable overrides
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.display().to_string()));
    }

    base_figment()
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load built-in defaults with environment variable overrides
pub fn load_default_config() -> Result<Config, ConfigError> {
    base_figment()
        .merge(env_provider())
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn base_figment() -> Figment {
    Figment::from(Serialized::defaults(Config::default()))
}

fn env_provider() -> Env {
    Env::prefixed(ENV_PREFIX)
        .ignore(&["CONFIG"])
        .split("__")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_config_from_str_valid() {
        let toml = r#"
[paths]
source_dir = "/library"

[converter]
bitrate = "256k"
"#;
        let config = load_config_from_str(toml).unwrap();
        assert_eq!(config.paths.source_dir, PathBuf::from("/library"));
        assert_eq!(config.converter.bitrate, "256k");
    }

    #[test]
    fn test_load_config_from_str_bad_type() {
        let toml = r#"
[converter]
timeout_secs = "soon"
"#;
        let result = load_config_from_str(toml);
        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/audiomirror.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }

    #[test]
    fn test_load_config_from_file_keeps_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[paths]
output_dir = "/srv/converted"

[formats]
copy = [".jpg", ".pdf"]
"#
        )
        .unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.paths.output_dir, PathBuf::from("/srv/converted"));
        assert_eq!(config.paths.error_dir, PathBuf::from("~/Music/Errors"));
        assert_eq!(config.formats.copy, vec![".jpg".to_string(), ".pdf".to_string()]);
        assert_eq!(config.converter.output_extension, ".mp3");
    }
}
