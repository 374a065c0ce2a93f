//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{RunConfig, MAX_FLOP_GROUP_SIZE};
use std::path::{Path, PathBuf};

/// File name looked up when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "levsim.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<RunConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Returns `<dir>/levsim.toml` if it exists.
pub fn find_config(dir: &Path) -> Option<PathBuf> {
    let candidate = dir.join(CONFIG_FILE_NAME);
    candidate.is_file().then_some(candidate)
}

/// Parses and validates a configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<RunConfig, ConfigError> {
    let config: RunConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks value ranges that the type system does not.
pub fn validate_config(config: &RunConfig) -> Result<(), ConfigError> {
    let size = config.coverage.flop_group_size;
    if !(1..=MAX_FLOP_GROUP_SIZE).contains(&size) {
        return Err(ConfigError::ValidationError {
            field: "coverage.flop_group_size",
            reason: format!("must be between 1 and {MAX_FLOP_GROUP_SIZE}, found {size}"),
        });
    }
    Ok(())
}
