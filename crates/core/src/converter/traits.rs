//! Trait definitions for the converter module.

use async_trait::async_trait;

use super::error::ConverterError;
use super::types::{EncodeJob, EncodeResult};

/// An external encoder that transcodes one file at a time.
#[async_trait]
pub trait Converter: Send + Sync {
    /// Returns the name of this converter implementation.
    fn name(&self) -> &str;

    /// Encodes `job.input_path` into `job.output_path`.
    ///
    /// The output path may be overwritten. On error its content is unspecified.
    async fn encode(&self, job: &EncodeJob) -> Result<EncodeResult, ConverterError>;

    /// Validates that the converter is properly configured and ready.
    async fn validate(&self) -> Result<(), ConverterError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct EchoConverter;

    #[async_trait]
    impl Converter for EchoConverter {
        fn name(&self) -> &str {
            "echo"
        }

        async fn encode(&self, job: &EncodeJob) -> Result<EncodeResult, ConverterError> {
            Ok(EncodeResult {
                output_path: job.output_path.clone(),
                output_size_bytes: 0,
                duration_ms: 0,
            })
        }

        async fn validate(&self) -> Result<(), ConverterError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_converter_trait_object() {
        let converter: Box<dyn Converter> = Box::new(EchoConverter);
        let job = EncodeJob {
            input_path: PathBuf::from("/in.wav"),
            output_path: PathBuf::from("/tmp/tmp.mp3"),
        };
        let result = converter.encode(&job).await.unwrap();
        assert_eq!(result.output_path, PathBuf::from("/tmp/tmp.mp3"));
        assert_eq!(converter.name(), "echo");
        assert!(converter.validate().await.is_ok());
    }
}
