//! Trait definition for the imaging engine boundary.

use async_trait::async_trait;

use super::error::EngineError;

/// An imaging engine that can transcode raster images between formats.
///
/// The capability predicates are queried once at registry build time; a pair
/// is only registered when the engine claims both sides. `transcode` is the
/// actual conversion: the source format is not independently validated
/// against the bytes, the engine sniffs the real content itself.
#[async_trait]
pub trait ImageEngine: Send + Sync {
    /// Returns the name of this engine implementation.
    fn name(&self) -> &str;

    /// Whether this engine can load images of the given canonical format.
    fn supports_source(&self, format: &str) -> bool;

    /// Whether this engine can save images of the given canonical format.
    fn supports_target(&self, format: &str) -> bool;

    /// Transcodes the input bytes to the given canonical target format.
    async fn transcode(&self, input: Vec<u8>, target: &str) -> Result<Vec<u8>, EngineError>;
}
