//! Resource host
//!
//! The host is the resource-orchestration engine chart components are built
//! on. It registers the parent component, creates the child Helm release and
//! records the parent's outputs. [`InMemoryHost`] is a recording
//! implementation used for dry runs and tests.

use crate::error::HostError;
use crate::release::{ReleaseArgs, ReleaseStatusOutput};
use crate::types::ReleaseStatus;
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Type token of the child Helm release
pub const RELEASE_TYPE_TOKEN: &str = "kubernetes:helm.sh/v3:Release";

/// Unique resource name assigned by the host
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceUrn(String);

impl ResourceUrn {
    /// Wrap a raw URN
    #[inline]
    #[must_use]
    pub fn new(urn: impl Into<String>) -> Self {
        Self(urn.into())
    }

    /// URN as string
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceUrn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named outputs registered on a parent component
pub type ResourceOutputs = BTreeMap<String, ResourceUrn>;

/// Options attached to a resource registration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceOptions {
    /// Owning component
    pub parent: Option<ResourceUrn>,
    /// Explicit dependencies
    pub depends_on: Vec<ResourceUrn>,
    /// Refuse deletion
    pub protect: bool,
    /// Properties whose changes are ignored on update
    pub ignore_changes: Vec<String>,
}

impl ResourceOptions {
    /// Options that only set the parent
    #[inline]
    #[must_use]
    pub fn parented(parent: ResourceUrn) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }
}

/// A created child release
#[derive(Debug, Clone)]
pub struct Release {
    /// URN of the release resource
    pub urn: ResourceUrn,
    /// Resource name
    pub name: String,
    /// Status, resolved by the host once deployed
    pub status: ReleaseStatusOutput,
}

/// Resource orchestration host
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResourceHost: Send + Sync {
    /// Register a component resource and return its URN
    async fn register_component(
        &self,
        type_token: &str,
        name: &str,
        opts: &ResourceOptions,
    ) -> Result<ResourceUrn, HostError>;

    /// Create a Helm release
    async fn create_release(
        &self,
        name: &str,
        args: ReleaseArgs,
        opts: ResourceOptions,
    ) -> Result<Release, HostError>;

    /// Register the outputs of a component
    async fn register_outputs(
        &self,
        parent: &ResourceUrn,
        outputs: ResourceOutputs,
    ) -> Result<(), HostError>;
}

/// Component registered on an [`InMemoryHost`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedComponent {
    pub urn: ResourceUrn,
    pub type_token: String,
    pub name: String,
    pub opts: ResourceOptions,
}

/// Release created on an [`InMemoryHost`]
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRelease {
    pub urn: ResourceUrn,
    pub id: Uuid,
    pub name: String,
    pub args: ReleaseArgs,
    pub opts: ResourceOptions,
}

#[derive(Debug, Default)]
struct Recorded {
    components: Vec<RecordedComponent>,
    releases: Vec<RecordedRelease>,
    outputs: BTreeMap<ResourceUrn, ResourceOutputs>,
}

/// Host that records every call and deploys releases instantly
#[derive(Debug)]
pub struct InMemoryHost {
    stack: String,
    recorded: Mutex<Recorded>,
}

impl InMemoryHost {
    /// Create host for the `dev` stack
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_stack("dev")
    }

    /// Create host for a named stack
    #[inline]
    #[must_use]
    pub fn with_stack(stack: impl Into<String>) -> Self {
        Self {
            stack: stack.into(),
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// Registered components, in order
    #[must_use]
    pub fn components(&self) -> Vec<RecordedComponent> {
        self.recorded.lock().components.clone()
    }

    /// Created releases, in order
    #[must_use]
    pub fn releases(&self) -> Vec<RecordedRelease> {
        self.recorded.lock().releases.clone()
    }

    /// Outputs registered for a component
    #[must_use]
    pub fn outputs(&self, parent: &ResourceUrn) -> Option<ResourceOutputs> {
        self.recorded.lock().outputs.get(parent).cloned()
    }

    fn urn(&self, type_token: &str, name: &str) -> ResourceUrn {
        ResourceUrn::new(format!("urn:helmbase:{}::{type_token}::{name}", self.stack))
    }
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResourceHost for InMemoryHost {
    async fn register_component(
        &self,
        type_token: &str,
        name: &str,
        opts: &ResourceOptions,
    ) -> Result<ResourceUrn, HostError> {
        let urn = self.urn(type_token, name);
        let mut recorded = self.recorded.lock();
        if recorded.components.iter().any(|c| c.urn == urn) {
            return Err(HostError::Rejected(format!("duplicate resource {urn}")));
        }
        recorded.components.push(RecordedComponent {
            urn: urn.clone(),
            type_token: type_token.to_owned(),
            name: name.to_owned(),
            opts: opts.clone(),
        });
        Ok(urn)
    }

    async fn create_release(
        &self,
        name: &str,
        args: ReleaseArgs,
        opts: ResourceOptions,
    ) -> Result<Release, HostError> {
        let urn = self.urn(RELEASE_TYPE_TOKEN, name);
        let status = ReleaseStatus {
            chart: Some(args.chart.clone()),
            name: Some(args.name.clone().unwrap_or_else(|| name.to_owned())),
            namespace: args.namespace.clone(),
            revision: Some(1),
            status: "deployed".to_owned(),
            version: args.version.clone(),
            ..ReleaseStatus::default()
        };

        let mut recorded = self.recorded.lock();
        if recorded.releases.iter().any(|r| r.urn == urn) {
            return Err(HostError::Rejected(format!("duplicate resource {urn}")));
        }
        recorded.releases.push(RecordedRelease {
            urn: urn.clone(),
            id: Uuid::new_v4(),
            name: name.to_owned(),
            args,
            opts,
        });

        Ok(Release {
            urn,
            name: name.to_owned(),
            status: ReleaseStatusOutput::resolved(status),
        })
    }

    async fn register_outputs(
        &self,
        parent: &ResourceUrn,
        outputs: ResourceOutputs,
    ) -> Result<(), HostError> {
        let mut recorded = self.recorded.lock();
        if !recorded.components.iter().any(|c| &c.urn == parent) {
            return Err(HostError::Rejected(format!("unknown component {parent}")));
        }
        recorded.outputs.insert(parent.clone(), outputs);
        Ok(())
    }
}
