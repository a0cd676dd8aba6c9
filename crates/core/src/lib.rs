//! Core of the picmorph conversion service.
//!
//! The HTTP layer in `picmorph-server` is thin plumbing around this crate:
//! a capability registry built once at startup, a pure format normalizer, a
//! bounded admission gate around the imaging engine, and the orchestrator
//! tying them together.

pub mod config;
pub mod convert;
pub mod engine;
pub mod format;
pub mod gate;
pub mod registry;
pub mod testing;

pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, EffectiveLimits,
    LimitsConfig, ServerConfig,
};
pub use convert::{ConversionError, ConversionOutput, ConversionRequest, ConversionService};
pub use engine::{EngineError, ImageEngine, ImageRsEngine};
pub use gate::{AdmissionGate, GatePermit};
pub use registry::{declared_pairs, Capability, ConversionRegistry};
