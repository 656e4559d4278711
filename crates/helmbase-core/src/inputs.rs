//! Raw construct inputs
//!
//! The weakly typed property bag a component is constructed from. It is only
//! ever read by [`ConstructInputs::copy_to`], which blits it onto the typed
//! arguments of a chart.

use crate::error::HydrationError;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw property bag keyed by canonical property name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConstructInputs(Map<String, Value>);

impl ConstructInputs {
    /// Create empty inputs
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build inputs from a JSON object
    ///
    /// # Errors
    /// If `value` is not an object.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::new()),
            other => Err(serde_json::Error::custom(format!(
                "construct inputs must be an object, got {other}"
            ))),
        }
    }

    /// With property
    #[inline]
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Get property
    #[inline]
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Number of properties
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Copy every property onto `target`
    ///
    /// Properties are matched to fields by serde name. Unknown properties are
    /// ignored and fields without a property keep their current value. The
    /// target is only replaced once the whole bag has been applied, so a
    /// failure leaves it untouched.
    ///
    /// # Errors
    /// [`HydrationError::Property`] naming the first property that cannot be
    /// converted to its field type, [`HydrationError::Target`] if `target` is
    /// not a structure.
    pub fn copy_to<T>(&self, target: &mut T) -> Result<(), HydrationError>
    where
        T: Serialize + DeserializeOwned,
    {
        if self.is_empty() {
            return Ok(());
        }

        let base = match serde_json::to_value(&*target)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(serde_json::Error::custom(format!(
                    "cannot copy inputs onto non-structure value {other}"
                ))
                .into())
            }
        };
        let mut merged = base.clone();
        for (key, value) in &self.0 {
            merged.insert(key.clone(), value.clone());
        }

        match serde_json::from_value(Value::Object(merged)) {
            Ok(hydrated) => {
                *target = hydrated;
                Ok(())
            }
            Err(err) => Err(self.blame::<T>(&base).unwrap_or_else(|| err.into())),
        }
    }

    /// Find the first property that fails on its own
    fn blame<T: DeserializeOwned>(&self, base: &Map<String, Value>) -> Option<HydrationError> {
        self.0.iter().find_map(|(key, value)| {
            let mut single = base.clone();
            single.insert(key.clone(), value.clone());
            serde_json::from_value::<T>(Value::Object(single))
                .err()
                .map(|source| HydrationError::Property {
                    field: key.clone(),
                    source,
                })
        })
    }
}

impl From<Map<String, Value>> for ConstructInputs {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
