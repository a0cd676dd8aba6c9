use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{convert, conversions, handlers};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let max_body = state.service().limits().max_request_body_bytes;

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/v1/conversions", get(conversions::list_conversions))
        .route("/v1/convert", post(convert::convert))
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(super::middleware::metrics_middleware))
        .layer(middleware::from_fn(super::middleware::request_id_middleware))
        .with_state(state)
}
