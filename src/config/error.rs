//! Errors raised while loading and validating configuration.

use thiserror::Error;

/// Failure to assemble the configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("configuration could not be read: {0}")]
    Load(#[from] config::ConfigError),

    #[error("configuration rejected: {0}")]
    Invalid(#[from] ValidationError),
}

/// A configuration value that fails semantic validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("missing required setting: {0}")]
    MissingRequired(&'static str),

    #[error("request timeout must be greater than zero")]
    InvalidTimeout,

    #[error("base url must start with http:// or https://")]
    InvalidBaseUrl,
}
