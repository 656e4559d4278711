//! Testing utilities for helmbase workspace
//!
//! Shared test helpers, fixtures, and a spying host.

#![allow(missing_docs)]

use async_trait::async_trait;
use helmbase_core::host::RecordedRelease;
use helmbase_core::{
    Chart, ChartArgs, ConstructConfig, Context, HostError, InMemoryHost, Release, ReleaseArgs,
    ReleaseStatusOutput, ReleaseTypeArgs, ResourceHost, ResourceOptions, ResourceOutputs,
    ResourceUrn,
};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub const REDIS_TOKEN: &str = "helmBase:index:Redis";
pub const REDIS_CHART: &str = "redis";
pub const REDIS_REPO: &str = "https://charts.example.org";

/// Chart handle with configurable identity
#[derive(Debug)]
pub struct TestChart {
    pub token: String,
    pub chart: String,
    pub repo: String,
    pub status: Option<ReleaseStatusOutput>,
    pub set_outputs_calls: usize,
}

impl TestChart {
    pub fn new(token: &str, chart: &str, repo: &str) -> Self {
        Self {
            token: token.to_string(),
            chart: chart.to_string(),
            repo: repo.to_string(),
            status: None,
            set_outputs_calls: 0,
        }
    }

    pub fn redis() -> Self {
        Self::new(REDIS_TOKEN, REDIS_CHART, REDIS_REPO)
    }
}

impl Chart for TestChart {
    fn type_token(&self) -> &str {
        &self.token
    }

    fn set_outputs(&mut self, status: ReleaseStatusOutput) {
        self.status = Some(status);
        self.set_outputs_calls += 1;
    }

    fn default_chart_name(&self) -> &str {
        &self.chart
    }

    fn default_repo_url(&self) -> &str {
        &self.repo
    }
}

/// Typed args of a Redis chart
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RedisArgs {
    #[serde(rename = "helmOptions", skip_serializing_if = "Option::is_none")]
    pub helm_options: Option<ReleaseTypeArgs>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache_size: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_tag: Option<String>,
}

impl RedisArgs {
    pub fn with_cache_size(mut self, size: i64) -> Self {
        self.cache_size = Some(size);
        self
    }

    pub fn with_helm_options(mut self, options: ReleaseTypeArgs) -> Self {
        self.helm_options = Some(options);
        self
    }
}

impl ChartArgs for RedisArgs {
    fn release_args_mut(&mut self) -> &mut Option<ReleaseTypeArgs> {
        &mut self.helm_options
    }
}

/// Host call that [`SpyHost`] can be told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    RegisterComponent,
    CreateRelease,
    RegisterOutputs,
}

/// [`InMemoryHost`] that counts calls and fails on request
#[derive(Debug, Default)]
pub struct SpyHost {
    inner: InMemoryHost,
    fail_at: Option<FailAt>,
    create_delay: Option<Duration>,
    register_component_calls: AtomicUsize,
    create_release_calls: AtomicUsize,
    register_outputs_calls: AtomicUsize,
}

impl SpyHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_at(fail_at: FailAt) -> Self {
        Self {
            fail_at: Some(fail_at),
            ..Self::default()
        }
    }

    /// Delay every release creation
    pub fn with_create_delay(mut self, delay: Duration) -> Self {
        self.create_delay = Some(delay);
        self
    }

    pub fn register_component_calls(&self) -> usize {
        self.register_component_calls.load(Ordering::SeqCst)
    }

    pub fn create_release_calls(&self) -> usize {
        self.create_release_calls.load(Ordering::SeqCst)
    }

    pub fn register_outputs_calls(&self) -> usize {
        self.register_outputs_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.register_component_calls() + self.create_release_calls() + self.register_outputs_calls()
    }

    pub fn releases(&self) -> Vec<RecordedRelease> {
        self.inner.releases()
    }

    pub fn outputs(&self, parent: &ResourceUrn) -> Option<ResourceOutputs> {
        self.inner.outputs(parent)
    }

    fn check(&self, step: FailAt) -> Result<(), HostError> {
        if self.fail_at == Some(step) {
            return Err(HostError::Rejected(format!("injected failure at {step:?}")));
        }
        Ok(())
    }
}

#[async_trait]
impl ResourceHost for SpyHost {
    async fn register_component(
        &self,
        type_token: &str,
        name: &str,
        opts: &ResourceOptions,
    ) -> Result<ResourceUrn, HostError> {
        self.register_component_calls.fetch_add(1, Ordering::SeqCst);
        self.check(FailAt::RegisterComponent)?;
        self.inner.register_component(type_token, name, opts).await
    }

    async fn create_release(
        &self,
        name: &str,
        args: ReleaseArgs,
        opts: ResourceOptions,
    ) -> Result<Release, HostError> {
        self.create_release_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.create_delay {
            tokio::time::sleep(delay).await;
        }
        self.check(FailAt::CreateRelease)?;
        self.inner.create_release(name, args, opts).await
    }

    async fn register_outputs(
        &self,
        parent: &ResourceUrn,
        outputs: ResourceOutputs,
    ) -> Result<(), HostError> {
        self.register_outputs_calls.fetch_add(1, Ordering::SeqCst);
        self.check(FailAt::RegisterOutputs)?;
        self.inner.register_outputs(parent, outputs).await
    }
}

/// Context around a shared spy host
pub fn spy_context(host: &Arc<SpyHost>) -> Context {
    Context::new(host.clone(), ConstructConfig::default())
}
