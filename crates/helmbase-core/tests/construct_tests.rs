//! Construction pipeline tests
//!
//! Drives `construct` end to end against the spying host.

use helmbase_core::prelude::*;
use helmbase_core::FIELD_HELM_STATUS_OUTPUT;
use helmbase_test_utils::{
    spy_context, FailAt, RedisArgs, SpyHost, TestChart, REDIS_CHART, REDIS_REPO, REDIS_TOKEN,
};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

/// Args that serialize to an array instead of a structure
#[derive(Debug, Default, Serialize, Deserialize)]
struct ListArgs(Vec<i64>, Option<ReleaseTypeArgs>);

impl ChartArgs for ListArgs {
    fn release_args_mut(&mut self) -> &mut Option<ReleaseTypeArgs> {
        &mut self.1
    }
}

async fn construct_redis(
    host: &Arc<SpyHost>,
    chart: &mut TestChart,
    args: &mut RedisArgs,
    inputs: &ConstructInputs,
) -> Result<ConstructResult, ConstructError> {
    let ctx = spy_context(host);
    construct(
        &ctx,
        chart,
        REDIS_TOKEN,
        "cache",
        args,
        inputs,
        ResourceOptions::default(),
    )
    .await
}

#[tokio::test]
async fn test_end_to_end_redis() {
    let host = Arc::new(SpyHost::new());
    let mut chart = TestChart::redis();
    let mut args = RedisArgs::default().with_cache_size(256);

    let result = construct_redis(&host, &mut chart, &mut args, &ConstructInputs::new())
        .await
        .unwrap();

    let release = args.helm_options.as_ref().unwrap();
    assert_eq!(release.chart.as_deref(), Some(REDIS_CHART));
    assert_eq!(release.repository_opts.repo.as_deref(), Some(REDIS_REPO));
    assert_eq!(
        serde_json::to_value(release.values.as_ref().unwrap()).unwrap(),
        json!({ "cacheSize": 256 })
    );

    assert_eq!(host.create_release_calls(), 1);
    let releases = host.releases();
    assert_eq!(releases.len(), 1);
    assert_eq!(releases[0].name, "cache-helm");
    assert_eq!(releases[0].args.chart, "redis");
    assert_eq!(releases[0].args.values["cacheSize"], json!(256));
    assert_eq!(releases[0].opts.parent.as_ref(), Some(&result.urn));

    let outputs = host.outputs(&result.urn).unwrap();
    assert_eq!(outputs.len(), 1);
    assert_eq!(outputs[FIELD_HELM_STATUS_OUTPUT], releases[0].urn);
    assert_eq!(result.outputs, outputs);

    assert_eq!(chart.set_outputs_calls, 1);
    let status = chart.status.as_ref().unwrap().get().await.unwrap();
    assert_eq!(status.status, "deployed");
    assert_eq!(status.chart.as_deref(), Some("redis"));
}

#[tokio::test]
async fn test_type_mismatch_short_circuits() {
    let host = Arc::new(SpyHost::new());
    let mut chart = TestChart::new("foo:bar", REDIS_CHART, REDIS_REPO);
    let mut args = RedisArgs::default();
    let ctx = spy_context(&host);

    let err = construct(
        &ctx,
        &mut chart,
        "foo:baz",
        "cache",
        &mut args,
        &ConstructInputs::new().with("cacheSize", 1),
        ResourceOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ConstructError::TypeMismatch { .. }));
    assert_eq!(host.total_calls(), 0);
    assert_eq!(args, RedisArgs::default());
}

#[tokio::test]
async fn test_inputs_hydrate_typed_args() {
    let host = Arc::new(SpyHost::new());
    let mut chart = TestChart::redis();
    let mut args = RedisArgs::default();
    let inputs = ConstructInputs::from_value(json!({
        "cacheSize": 512,
        "imageTag": "7.2",
        "helmOptions": {
            "namespace": "infra",
            "values": { "replicas": 3, "cacheSize": 1 }
        },
        "somethingElse": true
    }))
    .unwrap();

    construct_redis(&host, &mut chart, &mut args, &inputs)
        .await
        .unwrap();

    let projected = &host.releases()[0].args;
    assert_eq!(projected.namespace.as_deref(), Some("infra"));
    assert_eq!(
        serde_json::to_value(&projected.values).unwrap(),
        json!({ "replicas": 3, "cacheSize": 512, "imageTag": "7.2" })
    );
}

#[tokio::test]
async fn test_user_chart_and_repo_override_defaults() {
    let host = Arc::new(SpyHost::new());
    let mut chart = TestChart::redis();
    let mut args = RedisArgs::default().with_helm_options(
        ReleaseTypeArgs::new()
            .with_chart("redis-stack")
            .with_repo("https://mirror.example.org"),
    );

    construct_redis(&host, &mut chart, &mut args, &ConstructInputs::new())
        .await
        .unwrap();

    let projected = &host.releases()[0].args;
    assert_eq!(projected.chart, "redis-stack");
    assert_eq!(
        projected.repository_opts.as_ref().unwrap().repo.as_deref(),
        Some("https://mirror.example.org")
    );
}

#[tokio::test]
async fn test_helm_options_never_reach_values() {
    let host = Arc::new(SpyHost::new());
    let mut chart = TestChart::redis();
    let mut args = RedisArgs::default()
        .with_helm_options(ReleaseTypeArgs::new().with_namespace("infra"))
        .with_cache_size(64);

    construct_redis(&host, &mut chart, &mut args, &ConstructInputs::new())
        .await
        .unwrap();

    let values = &host.releases()[0].args.values;
    assert!(!values.contains_key("helmOptions"));
    assert_eq!(values.len(), 1);
}

#[tokio::test]
async fn test_registration_failure_creates_nothing() {
    let host = Arc::new(SpyHost::failing_at(FailAt::RegisterComponent));
    let mut chart = TestChart::redis();
    let mut args = RedisArgs::default();

    let err = construct_redis(&host, &mut chart, &mut args, &ConstructInputs::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ConstructError::RegistrationFailed { .. }));
    assert_eq!(host.register_component_calls(), 1);
    assert_eq!(host.create_release_calls(), 0);
    assert_eq!(host.register_outputs_calls(), 0);
    assert_eq!(chart.set_outputs_calls, 0);
}

#[tokio::test]
async fn test_child_creation_failure_is_not_retried() {
    let host = Arc::new(SpyHost::failing_at(FailAt::CreateRelease));
    let mut chart = TestChart::redis();
    let mut args = RedisArgs::default();

    let err = construct_redis(&host, &mut chart, &mut args, &ConstructInputs::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ConstructError::ChildCreationFailed { ref name, .. } if name == "cache-helm"));
    assert!(err.parent_registered());
    assert_eq!(host.create_release_calls(), 1);
    assert_eq!(host.register_outputs_calls(), 0);
    assert!(chart.status.is_none());
}

#[tokio::test]
async fn test_output_registration_failure() {
    let host = Arc::new(SpyHost::failing_at(FailAt::RegisterOutputs));
    let mut chart = TestChart::redis();
    let mut args = RedisArgs::default();

    let err = construct_redis(&host, &mut chart, &mut args, &ConstructInputs::new())
        .await
        .unwrap_err();

    assert!(matches!(err, ConstructError::OutputRegistrationFailed { .. }));
    assert_eq!(chart.set_outputs_calls, 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_child_creation_times_out() {
    let host = Arc::new(SpyHost::new().with_create_delay(Duration::from_secs(120)));
    let ctx = Context::new(
        host.clone(),
        ConstructConfig::new().with_create_timeout(Duration::from_secs(5)),
    );
    let mut chart = TestChart::redis();
    let mut args = RedisArgs::default();

    let err = construct(
        &ctx,
        &mut chart,
        REDIS_TOKEN,
        "cache",
        &mut args,
        &ConstructInputs::new(),
        ResourceOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ConstructError::Timeout { .. }));
    assert_eq!(host.create_release_calls(), 1);
    assert!(host.releases().is_empty());
    assert_eq!(host.register_outputs_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_sub_second_timeout_allows_fast_creation() {
    let host = Arc::new(SpyHost::new().with_create_delay(Duration::from_millis(10)));
    let ctx = Context::new(
        host.clone(),
        ConstructConfig::new().with_create_timeout(Duration::from_millis(500)),
    );
    let mut chart = TestChart::redis();
    let mut args = RedisArgs::default();

    construct(
        &ctx,
        &mut chart,
        REDIS_TOKEN,
        "cache",
        &mut args,
        &ConstructInputs::new(),
        ResourceOptions::default(),
    )
    .await
    .unwrap();

    assert_eq!(host.releases().len(), 1);
    assert_eq!(host.register_outputs_calls(), 1);
}

#[tokio::test]
async fn test_hydration_failure_names_property() {
    let host = Arc::new(SpyHost::new());
    let mut chart = TestChart::redis();
    let mut args = RedisArgs::default();
    let inputs = ConstructInputs::from_value(json!({ "imageTag": "7", "cacheSize": "big" })).unwrap();

    let err = construct_redis(&host, &mut chart, &mut args, &inputs)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ConstructError::HydrationFailed { ref source } if source.field() == Some("cacheSize")
    ));
    assert_eq!(host.total_calls(), 0);
    assert_eq!(args, RedisArgs::default());
}

#[tokio::test]
async fn test_non_structure_values_abort_before_release() {
    let host = Arc::new(SpyHost::new());
    let ctx = spy_context(&host);
    let mut chart = TestChart::redis();
    let mut args = ListArgs(
        vec![1, 2],
        Some(ReleaseTypeArgs::new().with_namespace("infra")),
    );

    let err = construct(
        &ctx,
        &mut chart,
        REDIS_TOKEN,
        "cache",
        &mut args,
        &ConstructInputs::new(),
        ResourceOptions::default(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, ConstructError::Defaults(_)));
    assert!(err.parent_registered());
    assert_eq!(host.register_component_calls(), 1);
    assert_eq!(host.create_release_calls(), 0);
    assert_eq!(host.register_outputs_calls(), 0);
    assert_eq!(chart.set_outputs_calls, 0);

    let restored = args.1.as_ref().unwrap();
    assert_eq!(restored.namespace.as_deref(), Some("infra"));
    assert_eq!(restored.chart.as_deref(), Some(REDIS_CHART));
}

#[tokio::test]
async fn test_concurrent_constructs_are_independent() {
    let host = Arc::new(SpyHost::new());
    let ctx = spy_context(&host);

    let mut handles = Vec::new();
    for i in 0..8_i64 {
        let ctx = ctx.clone();
        handles.push(tokio::spawn(async move {
            let mut chart = TestChart::redis();
            let mut args = RedisArgs::default().with_cache_size(i);
            let name = format!("cache-{i}");
            construct(
                &ctx,
                &mut chart,
                REDIS_TOKEN,
                &name,
                &mut args,
                &ConstructInputs::new(),
                ResourceOptions::default(),
            )
            .await
            .map(|_| args)
        }));
    }

    for (i, handle) in handles.into_iter().enumerate() {
        let args = handle.await.unwrap().unwrap();
        let values = args.helm_options.unwrap().values.unwrap();
        assert_eq!(values["cacheSize"], json!(i));
    }
    assert_eq!(host.create_release_calls(), 8);
}
