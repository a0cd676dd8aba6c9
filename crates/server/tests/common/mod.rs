//! Common test utilities for E2E testing with mocks.
//!
//! Provides a test fixture that builds the router in process, with either
//! the real image engine or a controllable mock injected, so the full HTTP
//! surface can be exercised without binding a socket.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use picmorph_core::testing::MockEngine;
use picmorph_core::{
    declared_pairs, Config, ConversionRegistry, ConversionService, EffectiveLimits, ImageEngine,
    ImageRsEngine, LimitsConfig,
};
use picmorph_server::api::create_router;
use picmorph_server::state::AppState;

/// Test fixture driving the HTTP surface in process.
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// The injected mock engine, when the fixture was built with one
    pub engine: Option<Arc<MockEngine>>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
    pub request_id: Option<String>,
}

impl TestFixture {
    /// Fixture backed by a mock engine claiming support for everything.
    #[allow(dead_code)]
    pub fn with_mock_engine() -> Self {
        Self::build_mock(MockEngine::supporting_all(), default_limits())
    }

    /// Fixture backed by a specific mock engine and explicit limits.
    #[allow(dead_code)]
    pub fn with_engine_and_limits(engine: MockEngine, limits: EffectiveLimits) -> Self {
        Self::build_mock(engine, limits)
    }

    /// Fixture backed by the real image engine.
    #[allow(dead_code)]
    pub fn with_real_engine() -> Self {
        let engine: Arc<dyn ImageEngine> = Arc::new(ImageRsEngine::new());
        let registry = ConversionRegistry::build(&declared_pairs(), engine.as_ref());
        let service = Arc::new(ConversionService::new(registry, engine, default_limits()));
        let state = Arc::new(AppState::new(Config::default(), service));

        Self {
            router: create_router(state),
            engine: None,
        }
    }

    fn build_mock(engine: MockEngine, limits: EffectiveLimits) -> Self {
        let engine = Arc::new(engine);
        let registry = ConversionRegistry::build(&declared_pairs(), engine.as_ref());
        let service = Arc::new(ConversionService::new(
            registry,
            Arc::clone(&engine) as Arc<dyn ImageEngine>,
            limits,
        ));
        let state = Arc::new(AppState::new(Config::default(), service));

        Self {
            router: create_router(state),
            engine: Some(engine),
        }
    }

    /// Send a GET request to the test server.
    #[allow(dead_code)]
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Send a GET request and return the raw body text.
    #[allow(dead_code)]
    pub async fn get_text(&self, path: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        (status, String::from_utf8_lossy(&body_bytes).into_owned())
    }

    /// Send a POST request with JSON body.
    #[allow(dead_code)]
    pub async fn post(&self, path: &str, body: Value) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with raw string body (for testing malformed JSON).
    #[allow(dead_code)]
    pub async fn post_raw(&self, path: &str, body: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Send a POST request with an explicit X-Request-Id header.
    #[allow(dead_code)]
    pub async fn post_with_request_id(
        &self,
        path: &str,
        body: Value,
        request_id: &str,
    ) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .header("X-Request-Id", request_id)
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string());
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes).unwrap_or(Value::Null)
        };

        TestResponse {
            status,
            body,
            request_id,
        }
    }
}

/// Default resolved limits, identical to an empty config file.
pub fn default_limits() -> EffectiveLimits {
    LimitsConfig::default().effective()
}

/// A valid 2x2 RGBA PNG, base64 encoded.
#[allow(dead_code)]
pub fn sample_png_base64() -> String {
    use base64::engine::general_purpose::STANDARD as BASE64;
    use base64::Engine as _;

    let mut img = image::RgbaImage::new(2, 2);
    img.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    img.put_pixel(1, 0, image::Rgba([0, 255, 0, 255]));
    img.put_pixel(0, 1, image::Rgba([0, 0, 255, 255]));
    img.put_pixel(1, 1, image::Rgba([255, 255, 255, 255]));

    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(
            &mut std::io::Cursor::new(&mut bytes),
            image::ImageFormat::Png,
        )
        .unwrap();
    BASE64.encode(&bytes)
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
