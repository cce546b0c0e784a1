//! Testing utilities and mock implementations.
//!
//! `MockConverter` stands in for the ffmpeg converter so whole runs can be
//! exercised without an encoder installed.
//!
//! # Example
//!
//! ```rust,ignore
//! use audiomirror_core::testing::MockConverter;
//!
//! let converter = MockConverter::new();
//! converter.fail_on("broken").await;
//!
//! // Run a BatchRunner with converter.clone()...
//!
//! assert_eq!(converter.invocation_count().await, 3);
//! ```

mod mock_converter;

pub use mock_converter::{MockConverter, RecordedEncode, MOCK_PAYLOAD};
