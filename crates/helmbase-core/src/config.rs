//! Construction configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Suffix appended to a component name to name its child release
pub const DEFAULT_CHILD_NAME_SUFFIX: &str = "-helm";

/// Settings shared by every construct call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstructConfig {
    /// Suffix of the child release name
    pub child_name_suffix: String,
    /// Upper bound on child release creation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_timeout: Option<Duration>,
}

impl ConstructConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With child release name suffix
    #[inline]
    #[must_use]
    pub fn with_child_name_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.child_name_suffix = suffix.into();
        self
    }

    /// With child release creation timeout
    #[inline]
    #[must_use]
    pub fn with_create_timeout(mut self, timeout: Duration) -> Self {
        self.create_timeout = Some(timeout);
        self
    }

    /// Child release creation timeout
    #[inline]
    #[must_use]
    pub fn create_timeout(&self) -> Option<Duration> {
        self.create_timeout
    }

    /// Name of the child release of component `name`
    #[inline]
    #[must_use]
    pub fn child_name(&self, name: &str) -> String {
        format!("{name}{}", self.child_name_suffix)
    }
}

impl Default for ConstructConfig {
    fn default() -> Self {
        Self {
            child_name_suffix: DEFAULT_CHILD_NAME_SUFFIX.to_owned(),
            create_timeout: None,
        }
    }
}
