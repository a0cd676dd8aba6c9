use super::{types::Config, ConfigError};

/// Validate configuration
///
/// Limits are deliberately not validated here: non-positive or missing limit
/// values resolve to defaults (see `LimitsConfig::effective`), matching the
/// rule that bad tuning never prevents startup.
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    Ok(())
}
