//! Typed Helm release arguments
//!
//! [`ReleaseTypeArgs`] is the strongly typed side of a chart component. The
//! serde names declared here are the canonical external property names; they
//! drive hydration from the raw input bag as well as the flattening performed
//! by the defaulting engine.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Weakly typed, single-level property map
pub type PropertyMap = BTreeMap<String, Value>;

/// Strongly typed Helm release arguments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseTypeArgs {
    /// Purge the chart on a failed install. Disables `skipAwait`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atomic: Option<bool>,
    /// Chart name or path to install
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
    /// Delete resources created by a failed upgrade
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_on_fail: Option<bool>,
    /// Create the release namespace when missing
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_namespace: Option<bool>,
    /// Run `helm dependency update` first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency_update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Accept development chart versions (`>0.0.0-0`) when no version is pinned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devel: Option<bool>,
    #[serde(rename = "disableCRDHooks", skip_serializing_if = "Option::is_none")]
    pub disable_crd_hooks: Option<bool>,
    /// Skip OpenAPI validation of rendered templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_openapi_validation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_webhooks: Option<bool>,
    /// Delete and recreate resources when an update needs it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_update: Option<bool>,
    /// Public keys used when `verify` is set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lint: Option<bool>,
    /// Rendered manifests
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PropertyMap>,
    /// Revisions kept per release, 0 for unlimited
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_history: Option<i64>,
    /// Release name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Post-render command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postrender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recreate_pods: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_subchart_notes: Option<bool>,
    /// Reuse a release name that is already taken
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<bool>,
    /// Repository the chart is pulled from
    pub repository_opts: RepositoryOpts,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_values: Option<bool>,
    /// Resources created by the release, keyed by `kind/version`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_names: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reuse_values: Option<bool>,
    /// Do not wait for resources to become ready
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_await: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_crds: Option<bool>,
    /// Status of the deployed release. Output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ReleaseStatus>,
    /// Seconds to wait for any individual Kubernetes operation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    /// Raw YAML values files merged into `values` by the release
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub value_yaml_files: Vec<AssetOrArchive>,
    /// Weakly typed chart values
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values: Option<PropertyMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify: Option<bool>,
    /// Exact chart version. Latest when unset.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    /// Wait for Jobs to complete. Ignored with `skipAwait`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_jobs: Option<bool>,
}

impl ReleaseTypeArgs {
    /// Create empty args
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With chart name
    #[inline]
    #[must_use]
    pub fn with_chart(mut self, chart: impl Into<String>) -> Self {
        self.chart = Some(chart.into());
        self
    }

    /// With repository URL
    #[inline]
    #[must_use]
    pub fn with_repo(mut self, repo: impl Into<String>) -> Self {
        self.repository_opts.repo = Some(repo.into());
        self
    }

    /// With namespace
    #[inline]
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// With weakly typed values
    #[inline]
    #[must_use]
    pub fn with_values(mut self, values: PropertyMap) -> Self {
        self.values = Some(values);
        self
    }
}

/// Helm chart repository options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RepositoryOpts {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ca_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cert_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Repository URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
}

/// Status reported by a deployed Helm release
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chart: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<i64>,
    /// Release phase, e.g. `deployed`
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

/// File-like blob handed to the release (values files)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AssetOrArchive {
    /// Inline text
    StringAsset(String),
    /// Local file path
    FileAsset(String),
    /// Remote URI
    RemoteAsset(String),
    /// Local archive path
    FileArchive(String),
    /// Remote archive URI
    RemoteArchive(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn release_args_canonical_names() {
        let args = ReleaseTypeArgs {
            disable_crd_hooks: Some(true),
            cleanup_on_fail: Some(false),
            ..ReleaseTypeArgs::new().with_repo("https://charts.example.org")
        };

        let value = serde_json::to_value(&args).unwrap();
        assert_eq!(
            value,
            json!({
                "disableCRDHooks": true,
                "cleanupOnFail": false,
                "repositoryOpts": { "repo": "https://charts.example.org" },
            })
        );
    }

    #[test]
    fn release_args_unknown_keys_ignored() {
        let args: ReleaseTypeArgs =
            serde_json::from_value(json!({ "chart": "redis", "bogus": 1 })).unwrap();
        assert_eq!(args.chart.as_deref(), Some("redis"));
        assert!(args.values.is_none());
    }

    #[test]
    fn asset_or_archive_wire_shape() {
        let asset = AssetOrArchive::FileAsset("values.yaml".to_string());
        assert_eq!(
            serde_json::to_value(&asset).unwrap(),
            json!({ "fileAsset": "values.yaml" })
        );
    }

    #[test]
    fn builder_methods() {
        let args = ReleaseTypeArgs::new()
            .with_chart("redis")
            .with_namespace("cache");
        assert_eq!(args.chart.as_deref(), Some("redis"));
        assert_eq!(args.namespace.as_deref(), Some("cache"));
    }
}
