//! Chart component capabilities
//!
//! A chart component is a concrete, caller supplied type that wraps one Helm
//! chart. The orchestrator only ever talks to it through [`Chart`]; its typed
//! arguments go through [`ChartArgs`].

use crate::release::ReleaseStatusOutput;
use crate::types::ReleaseTypeArgs;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// A strongly typed Helm chart component
pub trait Chart: Send {
    /// Fully qualified type token of this component
    fn type_token(&self) -> &str;

    /// Receive the status of the child release once it has been created
    fn set_outputs(&mut self, status: ReleaseStatusOutput);

    /// Chart name used when the caller does not set one
    fn default_chart_name(&self) -> &str;

    /// Repository URL used when the caller does not set one
    fn default_repo_url(&self) -> &str;
}

/// Strongly typed arguments of a chart component
///
/// The serde names of the implementing type are its canonical property
/// names. All fields other than the nested release options end up in the
/// release `values`, so the nested options must be named
/// [`FIELD_HELM_OPTIONS_INPUT`](crate::FIELD_HELM_OPTIONS_INPUT).
pub trait ChartArgs: Serialize + DeserializeOwned + Send {
    /// Nested release options, if any were given
    fn release_args_mut(&mut self) -> &mut Option<ReleaseTypeArgs>;
}
