//! Error types for the Aurelia storefront core.
//!
//! Configuration and catalog errors are surfaced to the caller. Errors from the
//! model service ([`LlmError`]) never cross the public appraisal or curator
//! boundary; those components collapse them into fallback text.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Aurelia operations.
#[derive(Error, Debug)]
pub enum AureliaError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Catalog loading errors
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// The selected provider has no API key
    #[error("{provider} API key not set. {hint}")]
    MissingCredential {
        provider: &'static str,
        hint: String,
    },
}

/// Failures talking to the external model service.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Transport, HTTP status, or response decoding failure
    #[error("{message}")]
    Request {
        message: String,
        status_code: Option<u16>,
    },

    /// The service answered but produced no text
    #[error("{provider} returned an empty response")]
    EmptyResponse { provider: &'static str },
}

impl LlmError {
    /// Shorthand for a request failure without an HTTP status.
    pub fn request(message: impl Into<String>) -> Self {
        Self::Request {
            message: message.into(),
            status_code: None,
        }
    }
}

/// Catalog file errors.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be read
    #[error("Failed to read catalog {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Catalog file is not valid TOML
    #[error("Failed to parse catalog {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// Catalog contents break an invariant
    #[error("Invalid catalog: {0}")]
    Invalid(String),
}

/// Convenience type alias for Aurelia results.
pub type Result<T> = std::result::Result<T, AureliaError>;
