//! Conversion discovery endpoint.

use axum::{extract::State, Json};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::state::AppState;

/// Supported conversions, alias-expanded, keyed by source format
#[derive(Debug, Serialize)]
pub struct ConversionsResponse {
    pub formats: BTreeMap<String, Vec<String>>,
}

pub async fn list_conversions(State(state): State<Arc<AppState>>) -> Json<ConversionsResponse> {
    Json(ConversionsResponse {
        formats: state.service().registry().aliased_targets_by_source(),
    })
}
