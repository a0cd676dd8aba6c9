use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use std::path::Path;
use tracing::{info, warn};

use super::{types::Config, ConfigError};

/// Environment variables that override the conversion limits directly.
///
/// These mirror the knobs the deployment surface has always exposed; they are
/// parsed leniently so a bad value degrades to the default instead of
/// failing startup.
const ENV_MAX_DECODED_FILE_SIZE_BYTES: &str = "PICMORPH_MAX_DECODED_FILE_SIZE_BYTES";
const ENV_MAX_REQUEST_BODY_BYTES: &str = "PICMORPH_MAX_REQUEST_BODY_BYTES";
const ENV_MAX_CONCURRENT_CONVERSIONS: &str = "PICMORPH_MAX_CONCURRENT_CONVERSIONS";

/// Load configuration from file with environment variable overrides.
///
/// A missing file is not an error: the service runs on defaults plus
/// whatever the environment provides.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let mut figment = Figment::new();
    if path.exists() {
        figment = figment.merge(Toml::file(path));
    } else {
        info!(path = %path.display(), "config file not found, using defaults");
    }

    let mut config: Config = figment
        .merge(Env::prefixed("PICMORPH_").split("__"))
        .extract()
        .map_err(|e| ConfigError::ParseError(e.to_string()))?;

    apply_limit_env_overrides(&mut config);

    Ok(config)
}

/// Load configuration from TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<Config, ConfigError> {
    toml::from_str(toml_str).map_err(|e| ConfigError::ParseError(e.to_string()))
}

fn apply_limit_env_overrides(config: &mut Config) {
    if let Some(value) = read_env_limit(ENV_MAX_DECODED_FILE_SIZE_BYTES) {
        config.limits.max_decoded_file_size_bytes = value;
    }
    if let Some(value) = read_env_limit(ENV_MAX_REQUEST_BODY_BYTES) {
        config.limits.max_request_body_bytes = value;
    }
    if let Some(value) = read_env_limit(ENV_MAX_CONCURRENT_CONVERSIONS) {
        config.limits.max_concurrent_conversions = value;
    }
}

/// Reads one limit override; unparsable or non-positive values are dropped
/// with a warning so the configured or default value stays in effect.
fn read_env_limit(name: &str) -> Option<i64> {
    let raw = std::env::var(name).ok()?;
    if raw.is_empty() {
        return None;
    }

    match raw.parse::<i64>() {
        Ok(value) if value > 0 => Some(value),
        _ => {
            warn!(%name, %raw, "invalid limit override, keeping configured value");
            None
        }
    }
}
