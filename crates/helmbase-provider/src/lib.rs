//! helmbase provider - serves config-defined chart components
//!
//! - [`ChartRegistry`]: type token to chart lookup, normalized by module map
//! - [`GenericChart`]: a chart component built from a registry entry
//! - [`Provider`]: dispatches construct requests to the orchestrator
//! - [`ProviderConfig`]: TOML configuration

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod config;
pub mod error;
pub mod generic;
pub mod logging;
pub mod provider;
pub mod registry;

pub use config::{ProviderConfig, DEFAULT_PROVIDER_NAME, DEFAULT_PROVIDER_VERSION};
pub use error::{ConfigError, ProviderError};
pub use generic::{GenericChart, GenericChartArgs};
pub use logging::{setup_logging, LogFormat};
pub use provider::{Constructed, Provider};
pub use registry::{ChartDefinition, ChartRegistry};
