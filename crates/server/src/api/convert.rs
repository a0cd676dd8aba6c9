//! Conversion API handler.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use picmorph_core::{format, ConversionError, ConversionRequest};

use super::middleware::RequestId;
use crate::metrics::CONVERSIONS_TOTAL;
use crate::state::AppState;

/// Request body for a conversion
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertBody {
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub content_base64: String,
}

/// Response for a successful conversion
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvertResponse {
    pub from: String,
    pub to: String,
    pub file_name: String,
    pub mime_type: String,
    pub content_base64: String,
}

/// Error response envelope
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
    pub request_id: String,
}

impl ErrorResponse {
    fn new(code: &str, message: impl Into<String>, request_id: &str) -> Self {
        Self {
            error: ErrorBody {
                code: code.to_string(),
                message: message.into(),
                request_id: request_id.to_string(),
            },
        }
    }
}

fn status_for(error: &ConversionError) -> StatusCode {
    match error {
        ConversionError::InvalidRequest | ConversionError::InvalidEncoding => {
            StatusCode::BAD_REQUEST
        }
        ConversionError::UnsupportedPair { .. } => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ConversionError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        ConversionError::Busy => StatusCode::SERVICE_UNAVAILABLE,
        ConversionError::ConversionFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Convert one base64-encoded image to the requested target format
pub async fn convert(
    State(state): State<Arc<AppState>>,
    Extension(RequestId(request_id)): Extension<RequestId>,
    body: Result<Json<ConvertBody>, JsonRejection>,
) -> Result<Json<ConvertResponse>, impl IntoResponse> {
    let Json(body) = match body {
        Ok(body) => body,
        Err(rejection) => {
            CONVERSIONS_TOTAL
                .with_label_values(&["unknown", "unknown", "invalid_request"])
                .inc();
            tracing::debug!(request_id = %request_id, reason = %rejection, "rejected malformed body");
            return Err((
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse::new(
                    "invalid_request",
                    "request body must be valid JSON",
                    &request_id,
                )),
            ));
        }
    };

    let from = format::canonical_format(&body.from);
    let to = format::canonical_format(&body.to);

    let request = ConversionRequest {
        from: body.from,
        to: body.to,
        file_name: body.file_name,
        content_base64: body.content_base64,
    };

    match state.service().convert(request).await {
        Ok(output) => {
            CONVERSIONS_TOTAL
                .with_label_values(&[&output.from, &output.to, "ok"])
                .inc();
            Ok(Json(ConvertResponse {
                from: output.from,
                to: output.to,
                file_name: output.file_name,
                mime_type: output.mime_type.to_string(),
                content_base64: BASE64.encode(&output.content),
            }))
        }
        Err(error) => {
            let code = error.code();
            CONVERSIONS_TOTAL
                .with_label_values(&[label_or_unknown(&from), label_or_unknown(&to), code])
                .inc();
            tracing::info!(
                request_id = %request_id,
                %from,
                %to,
                code,
                "conversion rejected: {error}"
            );
            Err((
                status_for(&error),
                Json(ErrorResponse::new(code, error.to_string(), &request_id)),
            ))
        }
    }
}

fn label_or_unknown(format: &str) -> &str {
    if format.is_empty() {
        "unknown"
    } else {
        format
    }
}
