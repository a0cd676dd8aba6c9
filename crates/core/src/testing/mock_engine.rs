//! Mock imaging engine for testing.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::engine::{EngineError, ImageEngine};

/// One recorded transcode call for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedTranscode {
    pub input_len: usize,
    pub target: String,
    pub success: bool,
}

/// Mock implementation of the [`ImageEngine`] trait.
///
/// Provides controllable behavior for testing:
/// - Restrict the supported source/target format sets
/// - Record every transcode call for assertions
/// - Inject a failure into the next transcode
/// - Control the produced output bytes
pub struct MockEngine {
    supported_sources: Vec<String>,
    supported_targets: Vec<String>,
    output: Vec<u8>,
    transcodes: Mutex<Vec<RecordedTranscode>>,
    next_error: Mutex<Option<EngineError>>,
}

impl MockEngine {
    /// An engine claiming support for every format on both sides.
    pub fn supporting_all() -> Self {
        Self {
            supported_sources: Vec::new(),
            supported_targets: Vec::new(),
            output: b"mock-output".to_vec(),
            transcodes: Mutex::new(Vec::new()),
            next_error: Mutex::new(None),
        }
    }

    /// An engine supporting exactly these formats as both source and target.
    pub fn supporting(formats: &[&str]) -> Self {
        let formats: Vec<String> = formats.iter().map(|f| f.to_string()).collect();
        Self {
            supported_sources: formats.clone(),
            supported_targets: formats,
            output: b"mock-output".to_vec(),
            transcodes: Mutex::new(Vec::new()),
            next_error: Mutex::new(None),
        }
    }

    /// Sets the bytes every successful transcode returns.
    pub fn with_output(mut self, output: impl Into<Vec<u8>>) -> Self {
        self.output = output.into();
        self
    }

    /// Configure the next transcode to fail with the given error.
    pub fn set_next_error(&self, error: EngineError) {
        *self.next_error.lock().unwrap() = Some(error);
    }

    /// Get all recorded transcode calls.
    pub fn recorded_transcodes(&self) -> Vec<RecordedTranscode> {
        self.transcodes.lock().unwrap().clone()
    }

    /// Number of transcode calls performed.
    pub fn transcode_count(&self) -> usize {
        self.transcodes.lock().unwrap().len()
    }
}

#[async_trait]
impl ImageEngine for MockEngine {
    fn name(&self) -> &str {
        "mock"
    }

    fn supports_source(&self, format: &str) -> bool {
        self.supported_sources.is_empty() || self.supported_sources.iter().any(|f| f == format)
    }

    fn supports_target(&self, format: &str) -> bool {
        self.supported_targets.is_empty() || self.supported_targets.iter().any(|f| f == format)
    }

    async fn transcode(&self, input: Vec<u8>, target: &str) -> Result<Vec<u8>, EngineError> {
        let injected = self.next_error.lock().unwrap().take();
        let success = injected.is_none();

        self.transcodes.lock().unwrap().push(RecordedTranscode {
            input_len: input.len(),
            target: target.to_string(),
            success,
        });

        match injected {
            Some(error) => Err(error),
            None => Ok(self.output.clone()),
        }
    }
}
