//! Construction orchestrator
//!
//! [`construct`] turns one construct request into a registered chart
//! component with a single child Helm release. The pipeline is linear: each
//! step either succeeds and advances or aborts the whole call. Nothing is
//! rolled back; a parent registered before a later failure is left for the
//! host to mark as failed.

use crate::chart::{Chart, ChartArgs};
use crate::config::ConstructConfig;
use crate::defaults::reconcile;
use crate::error::ConstructError;
use crate::host::{ResourceHost, ResourceOptions, ResourceOutputs, ResourceUrn};
use crate::inputs::ConstructInputs;
use crate::projection::to_release_args;
use std::sync::Arc;

/// Output under which the child release is registered on its parent
pub const FIELD_HELM_STATUS_OUTPUT: &str = "status";

/// Everything a construct call needs besides its own arguments
///
/// Immutable and cheap to clone; independent calls may share one.
#[derive(Clone)]
pub struct Context {
    host: Arc<dyn ResourceHost>,
    config: ConstructConfig,
}

impl Context {
    /// Create context
    #[inline]
    #[must_use]
    pub fn new(host: Arc<dyn ResourceHost>, config: ConstructConfig) -> Self {
        Self { host, config }
    }

    /// Resource host
    #[inline]
    #[must_use]
    pub fn host(&self) -> &dyn ResourceHost {
        self.host.as_ref()
    }

    /// Construct configuration
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ConstructConfig {
        &self.config
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// A successfully constructed component
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructResult {
    /// URN of the registered component
    pub urn: ResourceUrn,
    /// Outputs registered on the component
    pub outputs: ResourceOutputs,
}

/// Construct a chart component
///
/// # Workflow
/// 1. Check the chart's type token against `type_token`
/// 2. Copy `inputs` onto `args`
/// 3. Register `chart` as a component
/// 4. Take the nested release args, defaulting them when absent
/// 5. Reconcile them with the chart defaults and `args` as the typed values
/// 6. Create the child release, parented to the component
/// 7. Hand the release status to the chart and register it as output
///
/// On success `args` holds the reconciled release args.
///
/// # Errors
/// The [`ConstructError`] of the first failing step. No step is retried.
#[tracing::instrument(skip_all, fields(type_token = %type_token, name = %name))]
pub async fn construct<C, A>(
    ctx: &Context,
    chart: &mut C,
    type_token: &str,
    name: &str,
    args: &mut A,
    inputs: &ConstructInputs,
    opts: ResourceOptions,
) -> Result<ConstructResult, ConstructError>
where
    C: Chart + ?Sized,
    A: ChartArgs,
{
    tracing::info!("Constructing chart component");

    let actual = chart.type_token();
    if actual != type_token {
        tracing::warn!(actual, "Type token mismatch");
        return Err(ConstructError::TypeMismatch {
            requested: type_token.to_owned(),
            actual: actual.to_owned(),
        });
    }

    inputs.copy_to(args).map_err(|source| {
        tracing::warn!("Hydrating args failed: {}", source);
        ConstructError::HydrationFailed { source }
    })?;
    tracing::debug!("Copied {} inputs onto args", inputs.len());

    let urn = ctx
        .host()
        .register_component(type_token, name, &opts)
        .await
        .map_err(|source| {
            tracing::warn!("Registering component failed: {}", source);
            ConstructError::RegistrationFailed {
                name: name.to_owned(),
                source,
            }
        })?;
    tracing::debug!(%urn, "Registered component");

    // The typed args double as the values payload. The nested release args
    // are taken out first so they are not serialized into their own values.
    let mut release_args = args.release_args_mut().take().unwrap_or_default();
    let reconciled = reconcile(
        &mut release_args,
        chart.default_chart_name(),
        chart.default_repo_url(),
        &*args,
    );
    *args.release_args_mut() = Some(release_args);
    if let Err(e) = reconciled {
        tracing::warn!("Defaulting release args failed: {}", e);
        return Err(e.into());
    }

    let release_args = args
        .release_args_mut()
        .as_ref()
        .map(to_release_args)
        .unwrap_or_default();
    let child_name = ctx.config().child_name(name);
    tracing::debug!(chart = %release_args.chart, child = %child_name, "Creating release");

    let create = ctx.host().create_release(
        &child_name,
        release_args,
        ResourceOptions::parented(urn.clone()),
    );
    let created = match ctx.config().create_timeout() {
        Some(limit) => match tokio::time::timeout(limit, create).await {
            Ok(created) => created,
            Err(_) => {
                tracing::warn!(?limit, "Creating release timed out");
                return Err(ConstructError::Timeout {
                    name: child_name.clone(),
                    limit,
                });
            }
        },
        None => create.await,
    };
    let release = created.map_err(|source| {
        tracing::warn!("Creating release failed: {}", source);
        ConstructError::ChildCreationFailed {
            name: child_name.clone(),
            source,
        }
    })?;

    chart.set_outputs(release.status.clone());

    let mut outputs = ResourceOutputs::new();
    outputs.insert(FIELD_HELM_STATUS_OUTPUT.to_owned(), release.urn.clone());
    ctx.host()
        .register_outputs(&urn, outputs.clone())
        .await
        .map_err(|source| {
            tracing::warn!("Registering outputs failed: {}", source);
            ConstructError::OutputRegistrationFailed {
                name: name.to_owned(),
                source,
            }
        })?;

    tracing::info!(%urn, release = %release.urn, "Constructed chart component");
    Ok(ConstructResult { urn, outputs })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::host::{MockResourceHost, Release};
    use crate::release::ReleaseStatusOutput;
    use crate::types::ReleaseTypeArgs;
    use serde::{Deserialize, Serialize};

    struct Fixture {
        token: &'static str,
        status: Option<ReleaseStatusOutput>,
    }

    impl Chart for Fixture {
        fn type_token(&self) -> &str {
            self.token
        }

        fn set_outputs(&mut self, status: ReleaseStatusOutput) {
            self.status = Some(status);
        }

        fn default_chart_name(&self) -> &str {
            "nginx"
        }

        fn default_repo_url(&self) -> &str {
            "https://charts.example.org"
        }
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    #[serde(default)]
    struct FixtureArgs {
        #[serde(rename = "helmOptions", skip_serializing_if = "Option::is_none")]
        helm_options: Option<ReleaseTypeArgs>,
        #[serde(rename = "replicaCount")]
        replica_count: i64,
    }

    impl ChartArgs for FixtureArgs {
        fn release_args_mut(&mut self) -> &mut Option<ReleaseTypeArgs> {
            &mut self.helm_options
        }
    }

    fn fixture(token: &'static str) -> Fixture {
        Fixture {
            token,
            status: None,
        }
    }

    #[tokio::test]
    async fn type_mismatch_makes_no_host_calls() {
        let mut host = MockResourceHost::new();
        host.expect_register_component().never();
        host.expect_create_release().never();
        host.expect_register_outputs().never();
        let ctx = Context::new(Arc::new(host), ConstructConfig::default());

        let mut chart = fixture("foo:bar");
        let mut args = FixtureArgs::default();
        let err = construct(
            &ctx,
            &mut chart,
            "foo:baz",
            "web",
            &mut args,
            &ConstructInputs::new(),
            ResourceOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ConstructError::TypeMismatch { ref requested, ref actual }
                if requested == "foo:baz" && actual == "foo:bar"
        ));
        assert!(chart.status.is_none());
    }

    #[tokio::test]
    async fn hydration_failure_skips_registration() {
        let mut host = MockResourceHost::new();
        host.expect_register_component().never();
        let ctx = Context::new(Arc::new(host), ConstructConfig::default());

        let mut chart = fixture("web:index:Nginx");
        let mut args = FixtureArgs::default();
        let inputs = ConstructInputs::new().with("replicaCount", "three");
        let err = construct(
            &ctx,
            &mut chart,
            "web:index:Nginx",
            "web",
            &mut args,
            &inputs,
            ResourceOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err,
            ConstructError::HydrationFailed { ref source } if source.field() == Some("replicaCount")
        ));
        assert!(err.to_string().contains("replicaCount"));
        assert_eq!(args.replica_count, 0);
    }

    #[tokio::test]
    async fn registration_failure_stops_pipeline() {
        let mut host = MockResourceHost::new();
        host.expect_register_component()
            .times(1)
            .returning(|_, _, _| Err(HostError::Unavailable("engine down".to_string())));
        host.expect_create_release().never();
        let ctx = Context::new(Arc::new(host), ConstructConfig::default());

        let mut chart = fixture("web:index:Nginx");
        let mut args = FixtureArgs::default();
        let err = construct(
            &ctx,
            &mut chart,
            "web:index:Nginx",
            "web",
            &mut args,
            &ConstructInputs::new(),
            ResourceOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ConstructError::RegistrationFailed { .. }));
        assert!(args.helm_options.is_none());
    }

    #[tokio::test]
    async fn child_is_parented_and_registered_as_status() {
        let mut host = MockResourceHost::new();
        host.expect_register_component()
            .times(1)
            .returning(|_, _, _| Ok(ResourceUrn::new("urn:web")));
        host.expect_create_release()
            .withf(|name, args, opts| {
                name.to_string() == "web-helm"
                    && args.chart == "nginx"
                    && args.values.get("replicaCount") == Some(&serde_json::json!(2))
                    && opts.parent == Some(ResourceUrn::new("urn:web"))
            })
            .times(1)
            .returning(|name, _, _| {
                Ok(Release {
                    urn: ResourceUrn::new("urn:web-helm"),
                    name: name.to_string(),
                    status: ReleaseStatusOutput::unknown(),
                })
            });
        host.expect_register_outputs()
            .withf(|parent, outputs| {
                parent.as_str() == "urn:web"
                    && outputs.get(FIELD_HELM_STATUS_OUTPUT)
                        == Some(&ResourceUrn::new("urn:web-helm"))
            })
            .times(1)
            .returning(|_, _| Ok(()));
        let ctx = Context::new(Arc::new(host), ConstructConfig::default());

        let mut chart = fixture("web:index:Nginx");
        let mut args = FixtureArgs::default();
        let inputs = ConstructInputs::new().with("replicaCount", 2);
        let result = construct(
            &ctx,
            &mut chart,
            "web:index:Nginx",
            "web",
            &mut args,
            &inputs,
            ResourceOptions::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.urn.as_str(), "urn:web");
        assert_eq!(result.outputs.len(), 1);
        assert!(chart.status.is_some());
    }

    #[tokio::test]
    async fn output_registration_failure_is_returned() {
        let mut host = MockResourceHost::new();
        host.expect_register_component()
            .returning(|_, _, _| Ok(ResourceUrn::new("urn:web")));
        host.expect_create_release().returning(|name, _, _| {
            Ok(Release {
                urn: ResourceUrn::new("urn:web-helm"),
                name: name.to_string(),
                status: ReleaseStatusOutput::unknown(),
            })
        });
        host.expect_register_outputs()
            .returning(|_, _| Err(HostError::Rejected("frozen".to_string())));
        let ctx = Context::new(Arc::new(host), ConstructConfig::default());

        let mut chart = fixture("web:index:Nginx");
        let mut args = FixtureArgs::default();
        let err = construct(
            &ctx,
            &mut chart,
            "web:index:Nginx",
            "web",
            &mut args,
            &ConstructInputs::new(),
            ResourceOptions::default(),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ConstructError::OutputRegistrationFailed { .. }));
        assert!(err.parent_registered());
    }
}
