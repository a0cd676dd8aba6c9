//! Imaging engine backed by the pure-Rust `image` crate.

use async_trait::async_trait;
use image::{DynamicImage, ImageFormat};
use std::io::Cursor;
use tracing::debug;

use super::error::EngineError;
use super::traits::ImageEngine;

/// Canonical formats this build of the `image` crate can both load and save.
const SUPPORTED_SOURCE_FORMATS: &[&str] = &["gif", "jpeg", "png", "tiff", "webp"];
const SUPPORTED_TARGET_FORMATS: &[&str] = &["gif", "jpeg", "png", "tiff", "webp"];

/// Production [`ImageEngine`] over the `image` crate codecs.
///
/// Decoding sniffs the actual byte content rather than trusting the declared
/// source format. The CPU-bound transcode runs on the blocking pool so the
/// async runtime is never stalled by pixel work.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageRsEngine;

impl ImageRsEngine {
    pub fn new() -> Self {
        Self
    }

    fn target_format(format: &str) -> Option<ImageFormat> {
        match format {
            "gif" => Some(ImageFormat::Gif),
            "jpeg" => Some(ImageFormat::Jpeg),
            "png" => Some(ImageFormat::Png),
            "tiff" => Some(ImageFormat::Tiff),
            "webp" => Some(ImageFormat::WebP),
            _ => None,
        }
    }

    fn transcode_blocking(input: &[u8], target: &str) -> Result<Vec<u8>, EngineError> {
        let format = Self::target_format(target).ok_or_else(|| EngineError::UnsupportedTarget {
            format: target.to_string(),
        })?;

        let decoded =
            image::load_from_memory(input).map_err(|e| EngineError::decode(e.to_string()))?;

        // JFIF has no alpha channel; flatten before handing to the encoder.
        let decoded = if format == ImageFormat::Jpeg {
            DynamicImage::ImageRgb8(decoded.to_rgb8())
        } else {
            decoded
        };

        let mut output = Cursor::new(Vec::new());
        decoded
            .write_to(&mut output, format)
            .map_err(|e| EngineError::encode(target, e.to_string()))?;

        Ok(output.into_inner())
    }
}

#[async_trait]
impl ImageEngine for ImageRsEngine {
    fn name(&self) -> &str {
        "image-rs"
    }

    fn supports_source(&self, format: &str) -> bool {
        SUPPORTED_SOURCE_FORMATS.contains(&format)
    }

    fn supports_target(&self, format: &str) -> bool {
        SUPPORTED_TARGET_FORMATS.contains(&format)
    }

    async fn transcode(&self, input: Vec<u8>, target: &str) -> Result<Vec<u8>, EngineError> {
        let target = target.to_string();
        let result = tokio::task::spawn_blocking(move || {
            Self::transcode_blocking(&input, &target)
        })
        .await
        .map_err(|e| EngineError::Worker {
            reason: e.to_string(),
        })?;

        if let Ok(ref bytes) = result {
            debug!(output_bytes = bytes.len(), "transcode finished");
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn test_png() -> Vec<u8> {
        let mut img = RgbaImage::new(2, 2);
        img.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        img.put_pixel(1, 0, Rgba([0, 255, 0, 255]));
        img.put_pixel(0, 1, Rgba([0, 0, 255, 255]));
        img.put_pixel(1, 1, Rgba([255, 255, 255, 255]));

        let mut buf = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img)
            .write_to(&mut buf, ImageFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[test]
    fn test_supports_known_formats() {
        let engine = ImageRsEngine::new();
        assert!(engine.supports_source("png"));
        assert!(engine.supports_target("jpeg"));
        assert!(!engine.supports_source("pdf"));
        assert!(!engine.supports_target("heif"));
    }

    #[tokio::test]
    async fn test_transcode_png_to_jpeg() {
        let engine = ImageRsEngine::new();
        let output = engine.transcode(test_png(), "jpeg").await.unwrap();

        let decoded = image::load_from_memory(&output).unwrap();
        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::Jpeg);
        assert_eq!(decoded.width(), 2);
        assert_eq!(decoded.height(), 2);
    }

    #[tokio::test]
    async fn test_transcode_png_to_webp() {
        let engine = ImageRsEngine::new();
        let output = engine.transcode(test_png(), "webp").await.unwrap();
        assert_eq!(image::guess_format(&output).unwrap(), ImageFormat::WebP);
    }

    #[tokio::test]
    async fn test_transcode_rejects_unknown_target() {
        let engine = ImageRsEngine::new();
        let err = engine.transcode(test_png(), "pdf").await.unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedTarget { .. }));
    }

    #[tokio::test]
    async fn test_transcode_rejects_garbage_input() {
        let engine = ImageRsEngine::new();
        let err = engine
            .transcode(b"definitely not an image".to_vec(), "png")
            .await
            .unwrap_err();
        assert!(matches!(err, EngineError::Decode { .. }));
    }
}
