//! Projection of typed release args onto the child release shape
//!
//! [`ReleaseArgs`] and [`ReleaseTypeArgs`] look alike but are not guaranteed
//! to share property names, so the copy is spelled out field by field.
//! [`FIELD_PROJECTION`] documents the pairing; the tests below fail when a
//! field is added to either side without being accounted for here.

use crate::release::ReleaseArgs;
use crate::types::ReleaseTypeArgs;

/// One row of the projection table, by canonical property name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldProjection {
    /// Property on [`ReleaseTypeArgs`]
    pub source: &'static str,
    /// Property on [`ReleaseArgs`], `None` for output-only properties
    pub target: Option<&'static str>,
}

impl FieldProjection {
    const fn mapped(source: &'static str, target: &'static str) -> Self {
        Self {
            source,
            target: Some(target),
        }
    }

    const fn output_only(source: &'static str) -> Self {
        Self {
            source,
            target: None,
        }
    }
}

/// Every property of [`ReleaseTypeArgs`] and where it lands
pub const FIELD_PROJECTION: &[FieldProjection] = &[
    FieldProjection::mapped("atomic", "atomic"),
    FieldProjection::mapped("chart", "chart"),
    FieldProjection::mapped("cleanupOnFail", "cleanupOnFail"),
    FieldProjection::mapped("createNamespace", "createNamespace"),
    FieldProjection::mapped("dependencyUpdate", "dependencyUpdate"),
    FieldProjection::mapped("description", "description"),
    FieldProjection::mapped("devel", "devel"),
    FieldProjection::mapped("disableCRDHooks", "disableCRDHooks"),
    FieldProjection::mapped("disableOpenapiValidation", "disableOpenapiValidation"),
    FieldProjection::mapped("disableWebhooks", "disableWebhooks"),
    FieldProjection::mapped("forceUpdate", "forceUpdate"),
    FieldProjection::mapped("keyring", "keyring"),
    FieldProjection::mapped("lint", "lint"),
    FieldProjection::mapped("manifest", "manifest"),
    FieldProjection::mapped("maxHistory", "maxHistory"),
    FieldProjection::mapped("name", "name"),
    FieldProjection::mapped("namespace", "namespace"),
    FieldProjection::mapped("postrender", "postrender"),
    FieldProjection::mapped("recreatePods", "recreatePods"),
    FieldProjection::mapped("renderSubchartNotes", "renderSubchartNotes"),
    FieldProjection::mapped("replace", "replace"),
    FieldProjection::mapped("repositoryOpts", "repositoryOpts"),
    FieldProjection::mapped("resetValues", "resetValues"),
    FieldProjection::mapped("resourceNames", "resourceNames"),
    FieldProjection::mapped("reuseValues", "reuseValues"),
    FieldProjection::mapped("skipAwait", "skipAwait"),
    FieldProjection::mapped("skipCrds", "skipCrds"),
    FieldProjection::output_only("status"),
    FieldProjection::mapped("timeout", "timeout"),
    FieldProjection::mapped("valueYamlFiles", "valueYamlFiles"),
    FieldProjection::mapped("values", "values"),
    FieldProjection::mapped("verify", "verify"),
    FieldProjection::mapped("version", "version"),
    FieldProjection::mapped("waitForJobs", "waitForJobs"),
];

/// Turn reconciled release args into the child release arguments
///
/// Expects `args` to have been through [`reconcile`](crate::reconcile); an
/// unset chart or values map projects to empty.
#[must_use]
pub fn to_release_args(args: &ReleaseTypeArgs) -> ReleaseArgs {
    ReleaseArgs {
        atomic: args.atomic,
        chart: args.chart.clone().unwrap_or_default(),
        cleanup_on_fail: args.cleanup_on_fail,
        create_namespace: args.create_namespace,
        dependency_update: args.dependency_update,
        description: args.description.clone(),
        devel: args.devel,
        disable_crd_hooks: args.disable_crd_hooks,
        disable_openapi_validation: args.disable_openapi_validation,
        disable_webhooks: args.disable_webhooks,
        force_update: args.force_update,
        keyring: args.keyring.clone(),
        lint: args.lint,
        manifest: args.manifest.clone(),
        max_history: args.max_history,
        name: args.name.clone(),
        namespace: args.namespace.clone(),
        postrender: args.postrender.clone(),
        recreate_pods: args.recreate_pods,
        render_subchart_notes: args.render_subchart_notes,
        replace: args.replace,
        repository_opts: Some(args.repository_opts.clone()),
        reset_values: args.reset_values,
        resource_names: args.resource_names.clone(),
        reuse_values: args.reuse_values,
        skip_await: args.skip_await,
        skip_crds: args.skip_crds,
        timeout: args.timeout,
        value_yaml_files: args.value_yaml_files.clone(),
        values: args.values.clone().unwrap_or_default(),
        verify: args.verify,
        version: args.version.clone(),
        wait_for_jobs: args.wait_for_jobs,
    }
}
