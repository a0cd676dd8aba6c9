use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use tracing::warn;

/// Default ceiling on decoded payload size: 50 MiB.
pub const DEFAULT_MAX_DECODED_FILE_SIZE_BYTES: i64 = 50 * 1024 * 1024;

/// Default maximum concurrent native conversions.
pub const DEFAULT_MAX_CONCURRENT_CONVERSIONS: i64 = 4;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    "0.0.0.0".parse().unwrap()
}

fn default_port() -> u16 {
    8081
}

/// Payload-size and concurrency limits.
///
/// Values are kept as raw signed integers so that non-positive settings can
/// fall back to defaults at resolution time instead of failing startup.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LimitsConfig {
    /// Maximum decoded input file size in bytes (default 50 MiB).
    #[serde(default = "default_max_decoded_file_size_bytes")]
    pub max_decoded_file_size_bytes: i64,
    /// Maximum HTTP request body size in bytes. Zero or negative derives
    /// the default from the decoded ceiling plus JSON envelope slack.
    #[serde(default)]
    pub max_request_body_bytes: i64,
    /// Maximum concurrent native conversions (default 4).
    #[serde(default = "default_max_concurrent_conversions")]
    pub max_concurrent_conversions: i64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_decoded_file_size_bytes: default_max_decoded_file_size_bytes(),
            max_request_body_bytes: 0,
            max_concurrent_conversions: default_max_concurrent_conversions(),
        }
    }
}

fn default_max_decoded_file_size_bytes() -> i64 {
    DEFAULT_MAX_DECODED_FILE_SIZE_BYTES
}

fn default_max_concurrent_conversions() -> i64 {
    DEFAULT_MAX_CONCURRENT_CONVERSIONS
}

/// Resolved, always-positive limits derived from [`LimitsConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EffectiveLimits {
    pub max_decoded_file_size_bytes: usize,
    pub max_request_body_bytes: usize,
    pub max_concurrent_conversions: i64,
}

impl LimitsConfig {
    /// Resolves the configured limits, replacing non-positive values with
    /// defaults. Misconfiguration is logged, never fatal.
    pub fn effective(&self) -> EffectiveLimits {
        let max_decoded = if self.max_decoded_file_size_bytes > 0 {
            self.max_decoded_file_size_bytes as usize
        } else {
            warn!(
                configured = self.max_decoded_file_size_bytes,
                fallback = DEFAULT_MAX_DECODED_FILE_SIZE_BYTES,
                "non-positive max_decoded_file_size_bytes, using default"
            );
            DEFAULT_MAX_DECODED_FILE_SIZE_BYTES as usize
        };

        let max_body = if self.max_request_body_bytes > 0 {
            self.max_request_body_bytes as usize
        } else {
            default_max_request_body_bytes(max_decoded)
        };

        let max_concurrent = if self.max_concurrent_conversions > 0 {
            self.max_concurrent_conversions
        } else {
            warn!(
                configured = self.max_concurrent_conversions,
                fallback = DEFAULT_MAX_CONCURRENT_CONVERSIONS,
                "non-positive max_concurrent_conversions, using default"
            );
            DEFAULT_MAX_CONCURRENT_CONVERSIONS
        };

        EffectiveLimits {
            max_decoded_file_size_bytes: max_decoded,
            max_request_body_bytes: max_body,
            max_concurrent_conversions: max_concurrent,
        }
    }
}

/// Default request body ceiling: the base64-encoded size of the decoded
/// ceiling, plus 2 MiB of slack for the JSON envelope.
pub fn default_max_request_body_bytes(max_decoded_file_size_bytes: usize) -> usize {
    base64_encoded_len(max_decoded_file_size_bytes) + 2 * 1024 * 1024
}

/// Length of the standard (padded) base64 encoding of `len` input bytes.
///
/// Saturates to `usize::MAX` when the encoded length would overflow, so an
/// absurd ceiling still rejects every payload instead of panicking.
pub fn base64_encoded_len(len: usize) -> usize {
    base64::encoded_len(len, true).unwrap_or(usize::MAX)
}
