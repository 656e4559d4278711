//! Defaulting engine
//!
//! Fills in the chart name and repository a chart component ships with, then
//! blits its strongly typed values onto the weakly typed `values` map the Helm
//! Release consumes. Typed values win over entries already in the map; every
//! other entry is left alone.

use crate::error::DefaultsError;
use crate::types::{PropertyMap, ReleaseTypeArgs};
use serde::Serialize;
use serde_json::Value;

/// Input name of the nested release options on a chart's typed args
///
/// Never copied into `values`: it is the release args themselves.
pub const FIELD_HELM_OPTIONS_INPUT: &str = "helmOptions";

/// Reconcile `args` with the chart defaults and the typed values in `extra`
///
/// 1. `chart` is set to `default_chart` when unset or empty
/// 2. `repositoryOpts.repo` is set to `default_repo` when unset or empty
/// 3. `values` is initialized when absent
/// 4. `extra` is flattened one level, keyed by its serde names
/// 5. every flattened entry is written into `values`, overwriting
/// 6. [`FIELD_HELM_OPTIONS_INPUT`] is removed from `values`
///
/// Running it again with the same inputs changes nothing.
///
/// # Errors
/// [`DefaultsError`] if `extra` does not serialize to a flat structure. The
/// entries of `values` are not touched in that case.
pub fn reconcile<E>(
    args: &mut ReleaseTypeArgs,
    default_chart: &str,
    default_repo: &str,
    extra: &E,
) -> Result<(), DefaultsError>
where
    E: Serialize + ?Sized,
{
    if is_unset(args.chart.as_deref()) {
        args.chart = Some(default_chart.to_owned());
    }
    if is_unset(args.repository_opts.repo.as_deref()) {
        args.repository_opts.repo = Some(default_repo.to_owned());
    }

    let values = args.values.get_or_insert_with(PropertyMap::new);

    let decoded = decode_flat(extra)?;
    tracing::trace!(keys = decoded.len(), "Merging typed values");
    values.extend(decoded);

    values.remove(FIELD_HELM_OPTIONS_INPUT);
    Ok(())
}

/// Flatten `extra` into a single-level map keyed by its serde names
///
/// Nested values are carried as-is. `null` (e.g. `()` or `None`) flattens to
/// an empty map.
///
/// # Errors
/// [`DefaultsError`] if serialization fails or the result is not an object.
pub fn decode_flat<E>(extra: &E) -> Result<PropertyMap, DefaultsError>
where
    E: Serialize + ?Sized,
{
    match serde_json::to_value(extra)? {
        Value::Null => Ok(PropertyMap::new()),
        Value::Object(map) => Ok(map.into_iter().collect()),
        other => Err(DefaultsError::NotAStructure {
            kind: value_kind(&other),
        }),
    }
}

fn is_unset(value: Option<&str>) -> bool {
    value.map_or(true, str::is_empty)
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
