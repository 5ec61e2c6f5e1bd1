//! GraphSchema.io API models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use typed_graphql::{GraphqlType, HostType, ModelCatalog, ModelDescriptor, NamingStrategy};

/// Namespace the models are registered under for schema validation.
pub const MODEL_NAMESPACE: &str = "graphschema_client::types";

/// A deployment environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Environment {
    pub id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub name: Option<String>,
}

impl GraphqlType for Environment {
    fn host_type() -> HostType {
        HostType::model("Environment", || {
            ModelDescriptor::new("Environment")
                .with_naming(NamingStrategy::LowerCamelCase)
                .field::<String>("id")
                .field::<Option<DateTime<Utc>>>("created_at")
                .field::<Option<String>>("name")
        })
    }
}

/// Reference to an existing environment, used in inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvironmentReference {
    pub id: String,
}

impl EnvironmentReference {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

impl GraphqlType for EnvironmentReference {
    fn host_type() -> HostType {
        HostType::model("EnvironmentReference", || {
            ModelDescriptor::new("EnvironmentReference").field::<String>("id")
        })
    }
}

/// Client certificates for connecting to a Dgraph instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DgraphCertificates {
    pub ca_cert: Option<String>,
    pub client_cert: Option<String>,
    pub client_key: Option<String>,
}

impl GraphqlType for DgraphCertificates {
    fn host_type() -> HostType {
        HostType::model("DgraphCertificates", || {
            ModelDescriptor::new("DgraphCertificates")
                .with_naming(NamingStrategy::LowerCamelCase)
                .field::<Option<String>>("ca_cert")
                .field::<Option<String>>("client_cert")
                .field::<Option<String>>("client_key")
        })
    }
}

/// A hosted Dgraph instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DgraphInstance {
    pub dgraph_id: String,
    pub created_at: Option<DateTime<Utc>>,
    pub replicas: Option<i32>,
    pub shards: Option<i32>,
    #[serde(rename = "storageGB")]
    pub storage_gb: Option<i32>,
    pub env: Option<Environment>,
    pub certificates: Option<DgraphCertificates>,
}

impl GraphqlType for DgraphInstance {
    fn host_type() -> HostType {
        HostType::model("DgraphInstance", || {
            ModelDescriptor::new("DgraphInstance")
                .with_naming(NamingStrategy::LowerCamelCase)
                .field::<String>("dgraph_id")
                .field::<Option<DateTime<Utc>>>("created_at")
                .field::<Option<i32>>("replicas")
                .field::<Option<i32>>("shards")
                .renamed_field::<Option<i32>>("storage_gb", "storageGB")
                .field::<Option<Environment>>("env")
                .field::<Option<DgraphCertificates>>("certificates")
        })
    }
}

/// Input for provisioning a Dgraph instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DgraphInstanceInput {
    pub replicas: i32,
    pub shards: i32,
    #[serde(rename = "storageGB")]
    pub storage_gb: i32,
    pub env: EnvironmentReference,
}

impl GraphqlType for DgraphInstanceInput {
    fn host_type() -> HostType {
        HostType::model("DgraphInstanceInput", || {
            ModelDescriptor::new("DgraphInstanceInput")
                .with_naming(NamingStrategy::LowerCamelCase)
                .field::<i32>("replicas")
                .field::<i32>("shards")
                .renamed_field::<i32>("storage_gb", "storageGB")
                .field::<EnvironmentReference>("env")
        })
    }
}

/// Catalog holding every model above under [`MODEL_NAMESPACE`].
#[must_use]
pub fn model_catalog() -> ModelCatalog {
    ModelCatalog::new()
        .register::<Environment>(MODEL_NAMESPACE)
        .register::<EnvironmentReference>(MODEL_NAMESPACE)
        .register::<DgraphCertificates>(MODEL_NAMESPACE)
        .register::<DgraphInstance>(MODEL_NAMESPACE)
        .register::<DgraphInstanceInput>(MODEL_NAMESPACE)
}
