//! Parsing and validation of `levsim.toml` run configuration files.
//!
//! A run configuration selects the simulator, the coverage metrics to collect
//! and what to print. Every field has a default, so an absent or empty file
//! is a valid configuration.

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod types;

pub use error::ConfigError;
pub use loader::{find_config, load_config, load_config_from_str, validate_config, CONFIG_FILE_NAME};
pub use types::*;
