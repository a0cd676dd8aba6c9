//! Error types for the imaging engine boundary.

use thiserror::Error;

/// Errors produced by an imaging engine during transcoding.
///
/// Callers must not assume a stable machine-readable code beyond the variant
/// itself; the orchestrator collapses every engine failure into one outcome.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine cannot encode the requested target format.
    #[error("unsupported target format: {format}")]
    UnsupportedTarget { format: String },

    /// The input bytes could not be decoded as an image.
    #[error("failed to decode input image: {reason}")]
    Decode { reason: String },

    /// The decoded image could not be encoded to the target format.
    #[error("failed to encode {format} output: {reason}")]
    Encode { format: String, reason: String },

    /// The worker running the conversion was torn down mid-flight.
    #[error("conversion worker failed: {reason}")]
    Worker { reason: String },
}

impl EngineError {
    pub fn decode(reason: impl Into<String>) -> Self {
        Self::Decode {
            reason: reason.into(),
        }
    }

    pub fn encode(format: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Encode {
            format: format.into(),
            reason: reason.into(),
        }
    }
}
