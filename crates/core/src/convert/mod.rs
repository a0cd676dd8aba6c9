//! Conversion orchestrator.
//!
//! Validates one conversion request end to end: normalization, capability
//! lookup, payload-size policy, transport decoding, admission, and the call
//! into the imaging engine. Every step is a potential terminal outcome; the
//! service either returns one complete output or one failure kind, never a
//! partial result, and never retries.

mod error;

pub use error::ConversionError;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::{base64_encoded_len, EffectiveLimits};
use crate::engine::ImageEngine;
use crate::format;
use crate::gate::AdmissionGate;
use crate::registry::ConversionRegistry;

/// One conversion request, scoped to a single HTTP exchange.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    pub from: String,
    pub to: String,
    pub file_name: String,
    pub content_base64: String,
}

/// A completed conversion: resolved canonical pair, derived output name and
/// MIME type, and the converted bytes.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub from: String,
    pub to: String,
    pub file_name: String,
    pub mime_type: &'static str,
    pub content: Vec<u8>,
}

/// Orchestrates conversions against an immutable registry, a bounded
/// admission gate, and the imaging engine. Safe under arbitrary concurrent
/// invocation; the gate's counter is the only shared mutable state.
pub struct ConversionService {
    registry: ConversionRegistry,
    gate: AdmissionGate,
    engine: Arc<dyn ImageEngine>,
    limits: EffectiveLimits,
}

impl ConversionService {
    pub fn new(
        registry: ConversionRegistry,
        engine: Arc<dyn ImageEngine>,
        limits: EffectiveLimits,
    ) -> Self {
        Self {
            registry,
            gate: AdmissionGate::new(limits.max_concurrent_conversions),
            engine,
            limits,
        }
    }

    pub fn registry(&self) -> &ConversionRegistry {
        &self.registry
    }

    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    pub fn limits(&self) -> &EffectiveLimits {
        &self.limits
    }

    /// Runs one conversion to completion.
    ///
    /// Outcomes map one-to-one onto [`ConversionError`] variants; see the
    /// variant docs for the boundary semantics of each.
    pub async fn convert(
        &self,
        request: ConversionRequest,
    ) -> Result<ConversionOutput, ConversionError> {
        let from = format::canonical_format(&request.from);
        let to = format::canonical_format(&request.to);
        let file_name = request.file_name.trim().to_string();
        let content_base64 = request.content_base64.trim();

        if from.is_empty() || to.is_empty() || file_name.is_empty() || content_base64.is_empty() {
            return Err(ConversionError::InvalidRequest);
        }

        if self.registry.find(&from, &to).is_none() {
            return Err(ConversionError::UnsupportedPair {
                from: from.clone(),
                to: to.clone(),
            });
        }

        // Cheap precheck on the encoded representation, so oversized payloads
        // are rejected before the decode allocates anything.
        let max_decoded = self.limits.max_decoded_file_size_bytes;
        if content_base64.len() > base64_encoded_len(max_decoded) {
            return Err(ConversionError::PayloadTooLarge { limit: max_decoded });
        }

        let input = BASE64
            .decode(content_base64)
            .map_err(|_| ConversionError::InvalidEncoding)?;

        if input.len() > max_decoded {
            return Err(ConversionError::PayloadTooLarge { limit: max_decoded });
        }

        let _permit = self.gate.try_acquire().ok_or(ConversionError::Busy)?;

        debug!(%from, %to, input_bytes = input.len(), "starting conversion");
        let content = self.engine.transcode(input, &to).await.map_err(|e| {
            warn!(%from, %to, error = %e, "engine conversion failed");
            ConversionError::ConversionFailed(e)
        })?;

        Ok(ConversionOutput {
            file_name: format::output_file_name(&file_name, &to),
            mime_type: format::mime_type(&to),
            from,
            to,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LimitsConfig;
    use crate::engine::EngineError;
    use crate::registry::declared_pairs;
    use crate::testing::MockEngine;

    fn service_with(engine: MockEngine, limits: LimitsConfig) -> (ConversionService, Arc<MockEngine>) {
        let engine = Arc::new(engine);
        let registry = ConversionRegistry::build(&declared_pairs(), engine.as_ref());
        let service = ConversionService::new(registry, engine.clone(), limits.effective());
        (service, engine)
    }

    fn request(from: &str, to: &str) -> ConversionRequest {
        ConversionRequest {
            from: from.to_string(),
            to: to.to_string(),
            file_name: "input.png".to_string(),
            content_base64: BASE64.encode(b"pixels"),
        }
    }

    #[tokio::test]
    async fn test_successful_conversion() {
        let engine = MockEngine::supporting(&["png", "jpeg"]).with_output(b"converted".to_vec());
        let (service, engine) = service_with(engine, LimitsConfig::default());

        let output = service.convert(request("png", "jpeg")).await.unwrap();
        assert_eq!(output.from, "png");
        assert_eq!(output.to, "jpeg");
        assert_eq!(output.file_name, "input.jpeg");
        assert_eq!(output.mime_type, "image/jpeg");
        assert_eq!(output.content, b"converted");
        assert_eq!(engine.transcode_count(), 1);
    }

    #[tokio::test]
    async fn test_aliases_resolve_before_lookup() {
        let engine = MockEngine::supporting(&["png", "jpeg"]);
        let (service, _) = service_with(engine, LimitsConfig::default());

        let output = service.convert(request("png", "jpg")).await.unwrap();
        assert_eq!(output.to, "jpeg");
        assert_eq!(output.file_name, "input.jpeg");
    }

    #[tokio::test]
    async fn test_blank_fields_are_invalid() {
        let engine = MockEngine::supporting(&["png", "jpeg"]);
        let (service, engine) = service_with(engine, LimitsConfig::default());

        for broken in [
            ConversionRequest {
                from: "  ".into(),
                ..request("png", "jpeg")
            },
            ConversionRequest {
                to: String::new(),
                ..request("png", "jpeg")
            },
            ConversionRequest {
                file_name: " ".into(),
                ..request("png", "jpeg")
            },
            ConversionRequest {
                content_base64: String::new(),
                ..request("png", "jpeg")
            },
        ] {
            let err = service.convert(broken).await.unwrap_err();
            assert!(matches!(err, ConversionError::InvalidRequest));
        }

        assert_eq!(engine.transcode_count(), 0);
    }

    #[tokio::test]
    async fn test_unsupported_pair_does_not_reach_engine() {
        let engine = MockEngine::supporting(&["png", "jpeg"]);
        let (service, engine) = service_with(engine, LimitsConfig::default());

        let err = service.convert(request("png", "pdf")).await.unwrap_err();
        match err {
            ConversionError::UnsupportedPair { from, to } => {
                assert_eq!(from, "png");
                assert_eq!(to, "pdf");
            }
            other => panic!("expected UnsupportedPair, got {other:?}"),
        }
        assert_eq!(engine.transcode_count(), 0);
    }

    #[tokio::test]
    async fn test_invalid_base64_does_not_reach_engine() {
        let engine = MockEngine::supporting(&["png", "jpeg"]);
        let (service, engine) = service_with(engine, LimitsConfig::default());

        let mut req = request("png", "jpeg");
        req.content_base64 = "%%%".to_string();

        let err = service.convert(req).await.unwrap_err();
        assert!(matches!(err, ConversionError::InvalidEncoding));
        assert_eq!(engine.transcode_count(), 0);
    }

    #[tokio::test]
    async fn test_oversized_payload_rejected_before_gate() {
        let engine = MockEngine::supporting(&["png", "jpeg"]);
        let limits = LimitsConfig {
            max_decoded_file_size_bytes: 4,
            ..LimitsConfig::default()
        };
        let (service, engine) = service_with(engine, limits);

        let mut req = request("png", "jpeg");
        req.content_base64 = BASE64.encode([1u8, 2, 3, 4, 5]);

        let err = service.convert(req).await.unwrap_err();
        assert!(matches!(err, ConversionError::PayloadTooLarge { limit: 4 }));
        assert_eq!(engine.transcode_count(), 0);
        assert_eq!(service.gate().in_flight(), 0);
    }

    #[tokio::test]
    async fn test_oversized_encoded_payload_rejected_without_decoding() {
        let engine = MockEngine::supporting(&["png", "jpeg"]);
        let limits = LimitsConfig {
            max_decoded_file_size_bytes: 3,
            ..LimitsConfig::default()
        };
        let (service, _) = service_with(engine, limits);

        let mut req = request("png", "jpeg");
        // Longer than the encoded length of any 3-byte payload, and not
        // valid base64 either: the size check must win.
        req.content_base64 = "!!!!!!!!".to_string();

        let err = service.convert(req).await.unwrap_err();
        assert!(matches!(err, ConversionError::PayloadTooLarge { .. }));
    }

    #[tokio::test]
    async fn test_saturated_gate_yields_busy() {
        let engine = MockEngine::supporting(&["png", "jpeg"]);
        let (service, engine) = service_with(engine, LimitsConfig::default());
        let _permits: Vec<_> = (0..4)
            .map(|_| service.gate().try_acquire().unwrap())
            .collect();

        let err = service.convert(request("png", "jpeg")).await.unwrap_err();
        assert!(matches!(err, ConversionError::Busy));
        assert_eq!(engine.transcode_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_slot_gate_rejects_valid_requests() {
        let engine = Arc::new(MockEngine::supporting(&["png", "jpeg"]));
        let registry = ConversionRegistry::build(&declared_pairs(), engine.as_ref());
        // Built below the config layer, which would substitute the default.
        let limits = crate::config::EffectiveLimits {
            max_decoded_file_size_bytes: 1024,
            max_request_body_bytes: 4096,
            max_concurrent_conversions: 0,
        };
        let service = ConversionService::new(registry, engine.clone(), limits);

        let err = service.convert(request("png", "jpeg")).await.unwrap_err();
        assert!(matches!(err, ConversionError::Busy));
        assert_eq!(engine.transcode_count(), 0);
    }

    #[tokio::test]
    async fn test_gate_released_after_success_and_failure() {
        let engine = MockEngine::supporting(&["png", "jpeg"]);
        let (service, engine) = service_with(engine, LimitsConfig::default());

        service.convert(request("png", "jpeg")).await.unwrap();
        assert_eq!(service.gate().in_flight(), 0);

        engine.set_next_error(EngineError::decode("truncated"));
        let err = service.convert(request("png", "jpeg")).await.unwrap_err();
        assert!(matches!(err, ConversionError::ConversionFailed(_)));
        assert_eq!(service.gate().in_flight(), 0);

        // The slot freed by the failure is usable again.
        service.convert(request("png", "jpeg")).await.unwrap();
    }
}
