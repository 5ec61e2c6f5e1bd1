//! Typed client for the GraphSchema.io management API.
//!
//! Built on [`typed_graphql`]: the bundled schema fragment declares the
//! operations, and the models in [`types`] describe their arguments and
//! results.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]

pub mod client;
pub mod error;
pub mod types;

pub use client::{DEFAULT_ENDPOINT, GraphschemaClient, SCHEMA_FRAGMENT};
pub use error::{GraphschemaError, GraphschemaResult};
pub use types::{
    DgraphCertificates, DgraphInstance, DgraphInstanceInput, Environment, EnvironmentReference,
    MODEL_NAMESPACE, model_catalog,
};
