//! Child release shapes
//!
//! [`ReleaseArgs`] is the argument shape of the downstream Helm Release
//! resource. It is deliberately a separate type from
//! [`ReleaseTypeArgs`](crate::ReleaseTypeArgs): the two are kept in sync by the
//! explicit projection in [`crate::projection`].

use crate::types::{AssetOrArchive, PropertyMap, ReleaseStatus, RepositoryOpts};
use futures::future::{BoxFuture, FutureExt, Shared};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;

/// Arguments of the downstream Helm Release resource
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReleaseArgs {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atomic: Option<bool>,
    pub chart: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleanup_on_fail: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_namespace: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dependency_update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub devel: Option<bool>,
    #[serde(rename = "disableCRDHooks", skip_serializing_if = "Option::is_none")]
    pub disable_crd_hooks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_openapi_validation: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disable_webhooks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub force_update: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyring: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lint: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<PropertyMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_history: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub postrender: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recreate_pods: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub render_subchart_notes: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replace: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repository_opts: Option<RepositoryOpts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_names: Option<BTreeMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reuse_values: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_await: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_crds: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub value_yaml_files: Vec<AssetOrArchive>,
    pub values: PropertyMap,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verify: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wait_for_jobs: Option<bool>,
}

/// Release status that may not be known yet
///
/// The host hands this out when the child release is created; it resolves
/// once the release is deployed. Cloning is cheap and every clone observes the
/// same result. `None` means the status is unknown (e.g. during a preview).
#[derive(Clone)]
pub struct ReleaseStatusOutput {
    inner: Shared<BoxFuture<'static, Option<ReleaseStatus>>>,
}

impl ReleaseStatusOutput {
    /// Output that resolves when `future` does
    #[must_use]
    pub fn pending<F>(future: F) -> Self
    where
        F: Future<Output = Option<ReleaseStatus>> + Send + 'static,
    {
        Self {
            inner: future.boxed().shared(),
        }
    }

    /// Output that is already known
    #[must_use]
    pub fn resolved(status: ReleaseStatus) -> Self {
        Self::pending(futures::future::ready(Some(status)))
    }

    /// Output whose value will never be known
    #[must_use]
    pub fn unknown() -> Self {
        Self::pending(futures::future::ready(None))
    }

    /// Wait for the status
    pub async fn get(&self) -> Option<ReleaseStatus> {
        self.inner.clone().await
    }

    /// Status if already resolved, without waiting
    #[must_use]
    pub fn peek(&self) -> Option<&ReleaseStatus> {
        self.inner.peek().and_then(Option::as_ref)
    }
}

impl fmt::Debug for ReleaseStatusOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.peek() {
            Some(status) => f.debug_tuple("ReleaseStatusOutput").field(status).finish(),
            None => f.write_str("ReleaseStatusOutput(<pending>)"),
        }
    }
}
