//! Test utilities and mock implementations.
//!
//! Exposed as a regular module so the server crate's integration tests can
//! build an in-process service around a controllable engine.

mod mock_engine;

pub use mock_engine::{MockEngine, RecordedTranscode};
