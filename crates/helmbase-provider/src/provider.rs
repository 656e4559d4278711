//! Provider dispatch
//!
//! Routes construct requests by type token to the registered chart and runs
//! the construction pipeline for it.

use crate::config::ProviderConfig;
use crate::error::ProviderError;
use crate::generic::{GenericChart, GenericChartArgs};
use crate::registry::ChartRegistry;
use helmbase_core::{
    construct, ConstructInputs, ConstructResult, Context, ResourceHost, ResourceOptions,
};
use std::sync::Arc;

/// A constructed chart component
#[derive(Debug)]
pub struct Constructed {
    /// Registered component and its outputs
    pub result: ConstructResult,
    /// Chart handle holding the release status
    pub chart: GenericChart,
    /// Args after hydration and defaulting
    pub args: GenericChartArgs,
}

/// Chart component provider
#[derive(Debug)]
pub struct Provider {
    config: ProviderConfig,
    registry: ChartRegistry,
    ctx: Context,
}

impl Provider {
    /// Create provider serving the charts in `config`
    ///
    /// # Errors
    /// [`ProviderError`] if a chart token is malformed or registered twice.
    pub fn new(config: ProviderConfig, host: Arc<dyn ResourceHost>) -> Result<Self, ProviderError> {
        let registry = ChartRegistry::with_charts(config.module_map.clone(), config.charts.clone())?;
        let ctx = Context::new(host, config.construct_config());
        tracing::info!(
            name = %config.name,
            version = %config.version,
            charts = registry.len(),
            "Provider ready"
        );
        Ok(Self {
            config,
            registry,
            ctx,
        })
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.config.name
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> &str {
        &self.config.version
    }

    #[inline]
    #[must_use]
    pub fn registry(&self) -> &ChartRegistry {
        &self.registry
    }

    /// Construct the chart registered under `type_token`
    ///
    /// # Errors
    /// [`ProviderError::UnknownResourceType`] if no chart serves the token,
    /// [`ProviderError::Construct`] if the pipeline fails.
    pub async fn construct(
        &self,
        type_token: &str,
        name: &str,
        inputs: &ConstructInputs,
        opts: ResourceOptions,
    ) -> Result<Constructed, ProviderError> {
        let definition = self.registry.resolve(type_token)?;
        let token = definition.token.clone();
        let mut chart = GenericChart::new(definition.clone());
        let mut args = GenericChartArgs::default();

        let result = construct(&self.ctx, &mut chart, &token, name, &mut args, inputs, opts).await?;
        Ok(Constructed {
            result,
            chart,
            args,
        })
    }
}
