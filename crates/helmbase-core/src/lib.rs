//! helmbase core - strongly typed Helm chart components
//!
//! The layer between a chart's typed arguments and the weakly typed property
//! bag a Helm Release consumes:
//! - Defaulting engine: fills the chart name and repository, then blits the
//!   typed values onto the `values` map without clobbering user overrides
//! - Construction orchestrator: validates the type token, hydrates the typed
//!   input, registers the parent component, creates the child release and
//!   attaches its outputs
//!
//! # Example
//!
//! ```rust,ignore
//! use helmbase_core::prelude::*;
//!
//! # async fn example(chart: &mut impl Chart, args: &mut impl ChartArgs) -> Result<(), ConstructError> {
//! let ctx = Context::new(Arc::new(InMemoryHost::new()), ConstructConfig::default());
//! let result = construct(
//!     &ctx,
//!     chart,
//!     "helmBase:index:Redis",
//!     "cache",
//!     args,
//!     &ConstructInputs::new(),
//!     ResourceOptions::default(),
//! )
//! .await?;
//!
//! println!("registered {}", result.urn);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod chart;
pub mod config;
pub mod construct;
pub mod defaults;
pub mod error;
pub mod host;
pub mod inputs;
pub mod projection;
pub mod release;
pub mod token;
pub mod types;

pub use chart::{Chart, ChartArgs};
pub use config::ConstructConfig;
pub use construct::{construct, ConstructResult, Context, FIELD_HELM_STATUS_OUTPUT};
pub use defaults::{decode_flat, reconcile, FIELD_HELM_OPTIONS_INPUT};
pub use error::{ConstructError, DefaultsError, HostError, HydrationError, TokenError};
pub use host::{InMemoryHost, Release, ResourceHost, ResourceOptions, ResourceOutputs, ResourceUrn};
pub use inputs::ConstructInputs;
pub use projection::{to_release_args, FieldProjection, FIELD_PROJECTION};
pub use release::{ReleaseArgs, ReleaseStatusOutput};
pub use token::{ModuleMap, TypeToken};
pub use types::{AssetOrArchive, PropertyMap, ReleaseStatus, ReleaseTypeArgs, RepositoryOpts};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for building chart components
    pub use crate::{
        construct, reconcile, Chart, ChartArgs, ConstructConfig, ConstructError, ConstructInputs,
        ConstructResult, Context, InMemoryHost, ReleaseStatusOutput, ReleaseTypeArgs,
        ResourceHost, ResourceOptions,
    };
    pub use std::sync::Arc;
}

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
