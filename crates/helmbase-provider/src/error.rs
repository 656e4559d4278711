//! Error types for the helmbase provider

use helmbase_core::{ConstructError, TokenError};
use std::path::PathBuf;

/// Provider dispatch errors
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No chart is registered under the requested token
    #[error("unknown resource type {0}")]
    UnknownResourceType(String),

    /// A chart is already registered under this token
    #[error("chart {0} registered twice")]
    DuplicateChart(String),

    /// Token could not be parsed
    #[error(transparent)]
    InvalidToken(#[from] TokenError),

    /// Construction failed
    #[error(transparent)]
    Construct(#[from] ConstructError),
}

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config is not valid TOML for [`crate::ProviderConfig`]
    #[error("parsing config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config parsed but is not usable
    #[error("invalid config: {0}")]
    Invalid(String),
}
