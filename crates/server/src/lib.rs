//! HTTP layer of the picmorph conversion service.
//!
//! Exposed as a library so integration tests can build the router in
//! process and drive it with `tower::ServiceExt::oneshot`.

pub mod api;
pub mod metrics;
pub mod state;
