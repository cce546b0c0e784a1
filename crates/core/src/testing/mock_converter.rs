//! Mock converter for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::converter::{Converter, ConverterError, EncodeJob, EncodeResult};

/// Bytes written to the output of every successful mock encode.
pub const MOCK_PAYLOAD: &[u8] = b"ID3\x03\x00mock-encoded-audio";

/// A recorded encode for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedEncode {
    /// The job that was submitted.
    pub job: EncodeJob,
    /// Whether the encode succeeded.
    pub success: bool,
}

/// Mock implementation of the Converter trait.
///
/// Provides controllable behavior for testing:
/// - Track encode jobs for assertions
/// - Fail inputs whose path contains a configured pattern
/// - Fail validation
///
/// Clones share state, so a test can keep one handle while the runner owns
/// another.
#[derive(Debug, Clone, Default)]
pub struct MockConverter {
    encodes: Arc<RwLock<Vec<RecordedEncode>>>,
    fail_patterns: Arc<RwLock<Vec<String>>>,
    validation_error: Arc<RwLock<Option<String>>>,
}

impl MockConverter {
    /// Create a new mock converter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all recorded encodes, successful or not.
    pub async fn recorded(&self) -> Vec<RecordedEncode> {
        self.encodes.read().await.clone()
    }

    /// Get the jobs of all recorded encodes.
    pub async fn recorded_jobs(&self) -> Vec<EncodeJob> {
        self.encodes
            .read()
            .await
            .iter()
            .map(|r| r.job.clone())
            .collect()
    }

    /// Get the number of encoder invocations.
    pub async fn invocation_count(&self) -> usize {
        self.encodes.read().await.len()
    }

    /// Clear recorded encodes.
    pub async fn clear_recorded(&self) {
        self.encodes.write().await.clear();
    }

    /// Fail every encode whose input path contains `pattern`.
    pub async fn fail_on(&self, pattern: impl Into<String>) {
        self.fail_patterns.write().await.push(pattern.into());
    }

    /// Make `validate` fail with the given message.
    pub async fn fail_validation(&self, message: impl Into<String>) {
        *self.validation_error.write().await = Some(message.into());
    }

    async fn should_fail(&self, job: &EncodeJob) -> bool {
        let input = job.input_path.to_string_lossy();
        self.fail_patterns
            .read()
            .await
            .iter()
            .any(|p| input.contains(p.as_str()))
    }
}

#[async_trait]
impl Converter for MockConverter {
    fn name(&self) -> &str {
        "mock"
    }

    async fn encode(&self, job: &EncodeJob) -> Result<EncodeResult, ConverterError> {
        if self.should_fail(job).await {
            self.encodes.write().await.push(RecordedEncode {
                job: job.clone(),
                success: false,
            });
            return Err(ConverterError::conversion_failed(
                "FFmpeg exited with status 1",
                Some("Invalid data found when processing input".to_string()),
            ));
        }

        if !job.input_path.exists() {
            return Err(ConverterError::InputNotFound {
                path: job.input_path.clone(),
            });
        }

        tokio::fs::write(&job.output_path, MOCK_PAYLOAD).await?;

        self.encodes.write().await.push(RecordedEncode {
            job: job.clone(),
            success: true,
        });

        Ok(EncodeResult {
            output_path: job.output_path.clone(),
            output_size_bytes: MOCK_PAYLOAD.len() as u64,
            duration_ms: 0,
        })
    }

    async fn validate(&self) -> Result<(), ConverterError> {
        match self.validation_error.read().await.as_ref() {
            Some(message) => Err(ConverterError::conversion_failed(message.clone(), None)),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn job(temp: &TempDir, name: &str) -> EncodeJob {
        let input_path = temp.path().join(name);
        std::fs::write(&input_path, b"RIFF").unwrap();
        EncodeJob {
            input_path,
            output_path: temp.path().join("tmp.mp3"),
        }
    }

    #[tokio::test]
    async fn test_encode_writes_payload() {
        let temp = TempDir::new().unwrap();
        let converter = MockConverter::new();

        let result = converter.encode(&job(&temp, "a.wav")).await.unwrap();

        assert_eq!(result.output_size_bytes, MOCK_PAYLOAD.len() as u64);
        assert_eq!(std::fs::read(temp.path().join("tmp.mp3")).unwrap(), MOCK_PAYLOAD);
        assert_eq!(converter.invocation_count().await, 1);
    }

    #[tokio::test]
    async fn test_fail_on_pattern() {
        let temp = TempDir::new().unwrap();
        let converter = MockConverter::new();
        converter.fail_on("broken").await;

        let result = converter.encode(&job(&temp, "broken.wav")).await;
        assert!(matches!(result, Err(ConverterError::ConversionFailed { .. })));
        assert!(converter.encode(&job(&temp, "fine.wav")).await.is_ok());

        let recorded = converter.recorded().await;
        assert_eq!(recorded.len(), 2);
        assert!(!recorded[0].success);
        assert!(recorded[1].success);
    }

    #[tokio::test]
    async fn test_missing_input() {
        let converter = MockConverter::new();
        let result = converter
            .encode(&EncodeJob {
                input_path: PathBuf::from("/nonexistent/a.wav"),
                output_path: PathBuf::from("/nonexistent/tmp.mp3"),
            })
            .await;
        assert!(matches!(result, Err(ConverterError::InputNotFound { .. })));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let temp = TempDir::new().unwrap();
        let converter = MockConverter::new();
        let handle = converter.clone();

        converter.encode(&job(&temp, "a.wav")).await.unwrap();
        assert_eq!(handle.invocation_count().await, 1);

        handle.clear_recorded().await;
        assert_eq!(converter.invocation_count().await, 0);
    }

    #[tokio::test]
    async fn test_validation_failure() {
        let converter = MockConverter::new();
        assert!(converter.validate().await.is_ok());

        converter.fail_validation("ffmpeg not found").await;
        assert!(converter.validate().await.is_err());
    }
}
