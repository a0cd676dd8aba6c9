//! Terminal outcome kinds for the conversion orchestrator.

use thiserror::Error;

use crate::engine::EngineError;

/// Every way a conversion can fail.
///
/// All variants are expected, caller-recoverable outcomes; none is retried
/// internally. `Busy` is kept distinct from `ConversionFailed` so callers
/// can apply backoff-and-retry to saturation only.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// A required request field is missing or blank.
    #[error("from, to, fileName, and contentBase64 are required")]
    InvalidRequest,

    /// The content is not valid base64.
    #[error("contentBase64 must be valid base64")]
    InvalidEncoding,

    /// No capability is registered for the normalized pair.
    #[error("conversion from {from} to {to} is not supported")]
    UnsupportedPair { from: String, to: String },

    /// The payload exceeds the decoded-size ceiling.
    #[error("decoded input file exceeds {limit} bytes")]
    PayloadTooLarge { limit: usize },

    /// Every conversion slot is in use; retry later.
    #[error("all conversion slots are busy, retry later")]
    Busy,

    /// The imaging engine failed; the native error carries no stable code.
    #[error("failed to convert file")]
    ConversionFailed(#[source] EngineError),
}

impl ConversionError {
    /// Stable wire code for this outcome.
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::InvalidEncoding => "invalid_base64",
            Self::UnsupportedPair { .. } => "unsupported_conversion_pair",
            Self::PayloadTooLarge { .. } => "payload_too_large",
            Self::Busy => "converter_busy",
            Self::ConversionFailed(_) => "conversion_failed",
        }
    }
}
