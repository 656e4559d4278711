//! Error types for helmbase core
//!
//! Provides error handling for:
//! - Defaulting (decoding the typed values payload)
//! - Each step of the construction pipeline
//! - Copying the input bag onto typed args
//! - Host calls (registration, release creation)
//! - Type token parsing

use std::time::Duration;

/// Construction pipeline errors
///
/// Every variant aborts the call. Nothing is retried; retry policy belongs to
/// the host calling `construct` again.
#[derive(Debug, thiserror::Error)]
pub enum ConstructError {
    /// The chart handle is not the kind the caller asked for
    #[error("unknown resource type {requested}; expected {actual}")]
    TypeMismatch {
        /// Token passed to `construct`
        requested: String,
        /// Token reported by the chart handle
        actual: String,
    },

    /// The raw input bag could not populate the typed input
    #[error("setting args: {source}")]
    HydrationFailed {
        #[source]
        source: HydrationError,
    },

    /// The host refused to register the parent component
    #[error("registering component {name}: {source}")]
    RegistrationFailed {
        name: String,
        #[source]
        source: HostError,
    },

    /// The typed values could not be flattened into the release values
    #[error("defaulting release args: {0}")]
    Defaults(#[from] DefaultsError),

    /// The host rejected the child release
    #[error("creating release {name}: {source}")]
    ChildCreationFailed {
        name: String,
        #[source]
        source: HostError,
    },

    /// Child release creation did not finish in time
    #[error("creating release {name} timed out after {limit:?}")]
    Timeout { name: String, limit: Duration },

    /// Outputs could not be attached to the parent component
    #[error("registering outputs of {name}: {source}")]
    OutputRegistrationFailed {
        name: String,
        #[source]
        source: HostError,
    },
}

impl ConstructError {
    /// True when the failure happened after the parent was registered
    ///
    /// The parent is then left registered but incomplete; cleaning it up is
    /// the host's job.
    #[inline]
    #[must_use]
    pub fn parent_registered(&self) -> bool {
        matches!(
            self,
            Self::Defaults(_)
                | Self::ChildCreationFailed { .. }
                | Self::Timeout { .. }
                | Self::OutputRegistrationFailed { .. }
        )
    }
}

/// Defaulting engine errors
#[derive(Debug, thiserror::Error)]
pub enum DefaultsError {
    /// The payload failed to serialize
    #[error("decoding values: {0}")]
    Decode(#[from] serde_json::Error),

    /// The payload serialized to something other than a flat structure
    #[error("decoding values: expected a structure, got {kind}")]
    NotAStructure { kind: &'static str },
}

/// Input bag hydration errors
#[derive(Debug, thiserror::Error)]
pub enum HydrationError {
    /// A property could not be converted to its field type
    #[error("property {field}: {source}")]
    Property {
        field: String,
        #[source]
        source: serde_json::Error,
    },

    /// The target is not a structure, or the properties only fail together
    #[error(transparent)]
    Target(#[from] serde_json::Error),
}

impl HydrationError {
    /// Name of the property that failed, if a single one did
    #[inline]
    #[must_use]
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::Property { field, .. } => Some(field),
            Self::Target(_) => None,
        }
    }
}

/// Errors reported by a resource host
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    /// The host rejected the request
    #[error("rejected: {0}")]
    Rejected(String),

    /// The host could not be reached
    #[error("host unavailable: {0}")]
    Unavailable(String),
}

/// Type token parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// Not of the form `package:module:Name`
    #[error("malformed type token '{0}': expected package:module:Name")]
    Malformed(String),
}
