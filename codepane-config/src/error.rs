//! Typed error variants for the codepane-config crate.
//!
//! These are used internally and exposed for library consumers who want to
//! match on specific failure modes instead of opaque `anyhow` strings.

use thiserror::Error;

/// Errors that can occur when loading or saving configuration.
///
/// `Config::load` and `Config::save` return `anyhow::Result` for caller
/// convenience; `ConfigError` values are coerced automatically and can be
/// recovered with `Error::downcast_ref`.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An I/O error occurred reading or writing the config file.
    #[error("I/O error reading config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file contained invalid TOML that could not be parsed.
    #[error("TOML parse error in config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field value failed semantic validation.
    ///
    /// The inner string describes which field is invalid and why.
    #[error("invalid config value: {0}")]
    Validation(String),
}
