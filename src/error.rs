//! Error types for config loading and classification runs.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or validating a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("could not read config `{0}`")]
    Read(PathBuf, #[source] std::io::Error),

    /// The file's contents did not deserialize into [`Config`].
    ///
    /// [`Config`]: crate::config::Config
    #[error("could not parse config `{0}`")]
    Parse(PathBuf, #[source] toml::de::Error),

    /// A cross-field rule that deserialization alone cannot check.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Errors that abort a classification run.
#[derive(Debug, Error)]
pub enum RunError {
    /// Every classified item needs a title for path substitution. The
    /// payload is the loader-side identifier of the offending item.
    #[error(
        "item `{0}` is missing a title. If it has one, make sure the front matter is formatted correctly"
    )]
    MissingTitle(String),

    /// Permalinks derive from the named group's path pattern, so the run
    /// cannot proceed without it.
    #[error("permalink_group `{0}` does not match any configured group")]
    UnknownPermalinkGroup(String),
}
