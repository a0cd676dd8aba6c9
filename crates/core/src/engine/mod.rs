//! Imaging engine boundary.
//!
//! The actual pixel/format transcoding is delegated to a native imaging
//! backend behind the [`ImageEngine`] trait. The registry queries the
//! engine's capability predicates once at build time; the orchestrator calls
//! `transcode` for admitted requests.

mod error;
mod image_rs;
mod traits;

pub use error::EngineError;
pub use image_rs::ImageRsEngine;
pub use traits::ImageEngine;
