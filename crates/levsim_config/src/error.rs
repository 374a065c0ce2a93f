//! Error types for `levsim.toml` loading.

/// Errors that can occur when loading or validating a `levsim.toml` file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read configuration: {0}")]
    IoError(#[from] std::io::Error),

    /// The TOML content could not be parsed.
    #[error("failed to parse configuration: {0}")]
    ParseError(String),

    /// A value parsed but lies outside the range the simulator accepts.
    #[error("invalid `{field}`: {reason}")]
    ValidationError {
        /// Dotted key of the offending value, e.g. `coverage.flop_group_size`.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}
