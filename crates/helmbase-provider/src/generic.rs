//! Config-driven chart component
//!
//! [`GenericChart`] serves any [`ChartDefinition`]. Its args keep the
//! release options under `helmOptions` and every other input key as a typed
//! value.

use crate::registry::ChartDefinition;
use helmbase_core::{Chart, ChartArgs, PropertyMap, ReleaseStatusOutput, ReleaseTypeArgs};
use serde::{Deserialize, Serialize};

/// Chart component built from a definition
#[derive(Debug, Clone)]
pub struct GenericChart {
    definition: ChartDefinition,
    status: Option<ReleaseStatusOutput>,
}

impl GenericChart {
    #[inline]
    #[must_use]
    pub fn new(definition: ChartDefinition) -> Self {
        Self {
            definition,
            status: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn definition(&self) -> &ChartDefinition {
        &self.definition
    }

    /// Release status, once construction has attached it
    #[inline]
    #[must_use]
    pub fn status(&self) -> Option<&ReleaseStatusOutput> {
        self.status.as_ref()
    }
}

impl Chart for GenericChart {
    fn type_token(&self) -> &str {
        &self.definition.token
    }

    fn set_outputs(&mut self, status: ReleaseStatusOutput) {
        self.status = Some(status);
    }

    fn default_chart_name(&self) -> &str {
        &self.definition.chart
    }

    fn default_repo_url(&self) -> &str {
        &self.definition.repo
    }
}

/// Args of a [`GenericChart`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenericChartArgs {
    /// Release options
    #[serde(rename = "helmOptions", default, skip_serializing_if = "Option::is_none")]
    pub helm_options: Option<ReleaseTypeArgs>,
    /// Every other input key
    #[serde(flatten)]
    pub values: PropertyMap,
}

impl ChartArgs for GenericChartArgs {
    fn release_args_mut(&mut self) -> &mut Option<ReleaseTypeArgs> {
        &mut self.helm_options
    }
}
