//! Typed GraphQL-over-HTTP client.
//!
//! This crate provides:
//! - Host type descriptors ([`GraphqlType`]) and a compatibility matcher
//!   between host types and GraphQL type references.
//! - Selection-set synthesis with per-type depth control.
//! - Request building from schema field descriptors and positional arguments.
//! - Whole-schema compatibility validation that reports every problem at once.
//! - Strict typed decoding of responses with GraphQL null handling.
//!
//! ```no_run
//! use serde::Deserialize;
//! use typed_graphql::{Argument, GraphqlClientBuilder, GraphqlType, HostType, ModelDescriptor};
//!
//! #[derive(Deserialize)]
//! struct Repo {
//!     name: String,
//! }
//!
//! impl GraphqlType for Repo {
//!     fn host_type() -> HostType {
//!         HostType::model("Repo", || ModelDescriptor::new("Repo").field::<String>("name"))
//!     }
//! }
//!
//! # async fn run() -> Result<(), typed_graphql::GraphqlClientError> {
//! let client = GraphqlClientBuilder::new("https://api.example.com/graphql")
//!     .with_schema("type Repo { name: String! } type Query { repo(id: ID!): Repo! }")
//!     .build()?;
//! let repo: Repo = client.execute("repo", &[Argument::new("r-1")]).await?;
//! # let _ = repo.name;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_lines)]

mod client;
mod compat;
mod config;
mod decode;
mod error;
mod executor;
mod host;
mod logging;
mod operation;
mod registry;
mod request;
mod retry;
mod schema;
mod selection;
mod transport;
mod types;
mod validate;

pub use client::{
    GraphqlClient, GraphqlClientBuilder, GraphqlClientConfig, GraphqlClientMetrics,
    GraphqlClientMetricsSnapshot,
};
pub use compat::is_compatible;
pub use config::{ClientProfile, ConfigError};
pub use decode::{check_shape, decode};
pub use error::{
    ClientError, ExceptionalError, GraphqlClientError, JSON_DECODE_FAILURE, NULL_FOR_NON_NULL,
    TRANSPORT_FAILURE,
};
pub use executor::RequestExecutor;
pub use host::{
    GraphqlType, HostType, ModelDescriptor, ModelField, ModelRef, NamingStrategy, SUPPORTED_SCALARS,
    ScalarKind, is_supported_scalar,
};
pub use logging::{
    DEFAULT_REDACT_FIELDS, LoggingConfig, LoggingError, init_logging, redact_sensitive,
};
pub use operation::{GraphqlQuery, GraphqlRequest, GraphqlResponse, OperationKind};
pub use registry::FieldRegistry;
pub use request::{Argument, RequestBuilder, render_operation};
pub use retry::{NoRetry, RetryDecision, RetryPolicy};
pub use schema::{NamedTypeKind, SchemaDocument, SchemaError};
pub use selection::{
    ArgumentBinding, DEFAULT_SELECTION_DEPTH, FieldSelection, SelectionSet, VariableDefinition,
    synthesize,
};
pub use transport::{GraphqlTransport, HttpTransport, TransportError, TransportResponse};
pub use types::{ArgumentDescriptor, FieldDescriptor, TypeDescriptor};
pub use validate::{CatalogOracle, ModelCatalog, SchemaValidator, TypeOracle, ValidationReport};
