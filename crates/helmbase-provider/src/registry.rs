//! Chart registry
//!
//! Maps normalized type tokens to the chart each one deploys.

use crate::error::ProviderError;
use helmbase_core::{ModuleMap, TypeToken};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A chart served under a type token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartDefinition {
    /// Type token, e.g. `helmBase:index:Redis`
    pub token: String,
    /// Default chart name
    pub chart: String,
    /// Default chart repository URL
    #[serde(default)]
    pub repo: String,
}

impl ChartDefinition {
    #[must_use]
    pub fn new(token: impl Into<String>, chart: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            chart: chart.into(),
            repo: repo.into(),
        }
    }
}

/// Registry of charts keyed by normalized type token
#[derive(Debug, Default, Clone)]
pub struct ChartRegistry {
    module_map: ModuleMap,
    charts: BTreeMap<TypeToken, ChartDefinition>,
}

impl ChartRegistry {
    /// Create empty registry normalizing tokens with `module_map`
    #[inline]
    #[must_use]
    pub fn new(module_map: ModuleMap) -> Self {
        Self {
            module_map,
            charts: BTreeMap::new(),
        }
    }

    /// Create registry holding `charts`
    ///
    /// # Errors
    /// As [`Self::register`], for the first chart that fails.
    pub fn with_charts(
        module_map: ModuleMap,
        charts: impl IntoIterator<Item = ChartDefinition>,
    ) -> Result<Self, ProviderError> {
        let mut registry = Self::new(module_map);
        for chart in charts {
            registry.register(chart)?;
        }
        Ok(registry)
    }

    /// Register a chart
    ///
    /// The stored definition carries the normalized token.
    ///
    /// # Errors
    /// [`ProviderError::InvalidToken`] for a malformed token,
    /// [`ProviderError::DuplicateChart`] if the normalized token is taken.
    pub fn register(&mut self, mut chart: ChartDefinition) -> Result<(), ProviderError> {
        let token = self.module_map.normalize_str(&chart.token)?;
        if self.charts.contains_key(&token) {
            return Err(ProviderError::DuplicateChart(token.to_string()));
        }
        chart.token = token.to_string();
        tracing::debug!(token = %token, chart = %chart.chart, "Registered chart");
        self.charts.insert(token, chart);
        Ok(())
    }

    /// Look up the chart served under `raw`
    ///
    /// # Errors
    /// [`ProviderError::InvalidToken`] for a malformed token,
    /// [`ProviderError::UnknownResourceType`] if nothing is registered.
    pub fn resolve(&self, raw: &str) -> Result<&ChartDefinition, ProviderError> {
        let token = self.module_map.normalize_str(raw)?;
        self.charts
            .get(&token)
            .ok_or_else(|| ProviderError::UnknownResourceType(raw.to_string()))
    }

    /// Check if a chart is registered under `raw`
    #[inline]
    #[must_use]
    pub fn contains(&self, raw: &str) -> bool {
        self.resolve(raw).is_ok()
    }

    /// Registered charts in token order
    pub fn definitions(&self) -> impl Iterator<Item = &ChartDefinition> {
        self.charts.values()
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }
}
