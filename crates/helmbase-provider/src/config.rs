//! Provider configuration
//!
//! Loaded from TOML:
//!
//! ```toml
//! name = "helmBase"
//! create_timeout_secs = 300
//!
//! [module_map]
//! helmBase = "index"
//!
//! [[charts]]
//! token = "helmBase:index:Redis"
//! chart = "redis"
//! repo = "https://charts.bitnami.com/bitnami"
//! ```

use crate::error::ConfigError;
use crate::registry::ChartDefinition;
use helmbase_core::config::DEFAULT_CHILD_NAME_SUFFIX;
use helmbase_core::{ConstructConfig, ModuleMap};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Provider name reported to the engine
pub const DEFAULT_PROVIDER_NAME: &str = "helmBase";

/// Provider version reported to the engine
pub const DEFAULT_PROVIDER_VERSION: &str = "0.1.0";

/// Provider configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Provider name
    pub name: String,
    /// Provider version
    pub version: String,
    /// Module renames applied to type tokens
    pub module_map: ModuleMap,
    /// Suffix of child release names
    pub child_name_suffix: String,
    /// Upper bound on child release creation, in seconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_timeout_secs: Option<u64>,
    /// Charts served by this provider
    pub charts: Vec<ChartDefinition>,
}

impl ProviderConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With chart definition
    #[inline]
    #[must_use]
    pub fn with_chart(mut self, chart: ChartDefinition) -> Self {
        self.charts.push(chart);
        self
    }

    /// With module map
    #[inline]
    #[must_use]
    pub fn with_module_map(mut self, module_map: ModuleMap) -> Self {
        self.module_map = module_map;
        self
    }

    /// With child release creation timeout
    #[inline]
    #[must_use]
    pub fn with_create_timeout(mut self, timeout: Duration) -> Self {
        self.create_timeout_secs = Some(timeout.as_secs());
        self
    }

    /// Settings handed to every construct call
    #[must_use]
    pub fn construct_config(&self) -> ConstructConfig {
        let config = ConstructConfig::new().with_child_name_suffix(self.child_name_suffix.clone());
        match self.create_timeout_secs {
            Some(secs) => config.with_create_timeout(Duration::from_secs(secs)),
            None => config,
        }
    }

    /// Parse and validate TOML
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed TOML, [`ConfigError::Invalid`] when
    /// validation fails.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a TOML file
    ///
    /// # Errors
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`Self::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded provider config");
        Self::from_toml_str(&raw)
    }

    /// Check that the configuration is usable
    ///
    /// # Errors
    /// [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.name.is_empty() {
            return Err(ConfigError::Invalid("provider name is empty".to_string()));
        }
        if self.create_timeout_secs == Some(0) {
            return Err(ConfigError::Invalid(
                "create_timeout_secs must be positive".to_string(),
            ));
        }
        for chart in &self.charts {
            if chart.chart.is_empty() {
                return Err(ConfigError::Invalid(format!(
                    "chart {} has no chart name",
                    chart.token
                )));
            }
        }
        Ok(())
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_PROVIDER_NAME.to_string(),
            version: DEFAULT_PROVIDER_VERSION.to_string(),
            module_map: ModuleMap::default(),
            child_name_suffix: DEFAULT_CHILD_NAME_SUFFIX.to_string(),
            create_timeout_secs: None,
            charts: Vec::new(),
        }
    }
}
