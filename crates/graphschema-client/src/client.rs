//! GraphSchema.io API client.

use std::time::Duration;

use tracing::{debug, info, instrument, warn};
use typed_graphql::{
    Argument, CatalogOracle, GraphqlClient, GraphqlClientBuilder, GraphqlClientError,
};

use crate::error::{GraphschemaError, GraphschemaResult};
use crate::types::{
    DgraphInstance, DgraphInstanceInput, Environment, MODEL_NAMESPACE, model_catalog,
};

/// Default API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://graphschema.io/api/graphql";

/// Operations this client calls, as schema text.
pub const SCHEMA_FRAGMENT: &str = include_str!("../resources/graphschema.graphql");

/// Readiness polls made after adding an instance.
const READY_POLLS: u32 = 3;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// GraphSchema.io API client.
#[derive(Debug, Clone)]
pub struct GraphschemaClient {
    inner: GraphqlClient,
    poll_interval: Duration,
}

impl GraphschemaClient {
    /// Builder for `endpoint` with the bundled schema fragment already loaded.
    #[must_use]
    pub fn builder(endpoint: impl Into<String>) -> GraphqlClientBuilder {
        GraphqlClientBuilder::new(endpoint).with_schema(SCHEMA_FRAGMENT)
    }

    /// Client for the public endpoint, authenticated with `token`.
    pub fn new(token: impl AsRef<str>) -> GraphschemaResult<Self> {
        let inner = Self::builder(DEFAULT_ENDPOINT)
            .with_bearer_token(token)
            .build()?;
        Ok(Self::from_client(inner))
    }

    /// Wrap a client built from [`Self::builder`].
    #[must_use]
    pub const fn from_client(inner: GraphqlClient) -> Self {
        Self {
            inner,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Base delay between readiness polls; poll `n` waits `n` times this.
    #[must_use]
    pub const fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The wrapped GraphQL client.
    #[must_use]
    pub const fn graphql(&self) -> &GraphqlClient {
        &self.inner
    }

    /// Check the bundled models against the full API schema.
    pub fn validate_schema(&self, sdl: &str) -> Result<(), GraphqlClientError> {
        let oracle = CatalogOracle::new(model_catalog(), [MODEL_NAMESPACE]);
        self.inner.validate_against_schema(sdl, &oracle)
    }

    #[instrument(skip(self))]
    pub async fn get_environment(&self, id: &str) -> GraphschemaResult<Option<Environment>> {
        Ok(self.inner.execute("getEnvironment", &[Argument::new(id)]).await?)
    }

    /// Environments whose name equals `name`.
    #[instrument(skip(self))]
    pub async fn query_environment(&self, name: &str) -> GraphschemaResult<Vec<Environment>> {
        let names = vec![name.to_string()];
        Ok(self
            .inner
            .execute("queryEnvironment", &[Argument::new(&names)])
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn get_dgraph_instance(
        &self,
        dgraph_id: &str,
    ) -> GraphschemaResult<Option<DgraphInstance>> {
        Ok(self
            .inner
            .execute("getDgraphInstance", &[Argument::new(dgraph_id)])
            .await?)
    }

    /// The instance deployed into an environment, if any.
    #[instrument(skip(self))]
    pub async fn query_dgraph_instance(
        &self,
        environment_id: &str,
    ) -> GraphschemaResult<Option<DgraphInstance>> {
        Ok(self
            .inner
            .execute("queryDgraphInstance", &[Argument::new(environment_id)])
            .await?)
    }

    #[instrument(skip(self, input), fields(env = %input.env.id))]
    pub async fn add_dgraph_instance(
        &self,
        input: &DgraphInstanceInput,
    ) -> GraphschemaResult<DgraphInstance> {
        let instance: DgraphInstance = self
            .inner
            .execute("addDgraphInstance", &[Argument::new(input)])
            .await?;
        info!(dgraph_id = %instance.dgraph_id, "Dgraph instance added");
        Ok(instance)
    }

    /// Add an instance, then poll until it can be read back.
    ///
    /// Polls up to three times, waiting one, two, then three poll intervals.
    /// Failed polls are logged and retried. If the instance never appears the
    /// error is [`GraphschemaError::NotReady`], which still names the added
    /// instance.
    #[instrument(skip(self, input), fields(env = %input.env.id))]
    pub async fn add_dgraph_instance_and_wait(
        &self,
        input: &DgraphInstanceInput,
    ) -> GraphschemaResult<DgraphInstance> {
        let added = self.add_dgraph_instance(input).await?;

        for poll in 1..=READY_POLLS {
            tokio::time::sleep(self.poll_interval * poll).await;
            match self.get_dgraph_instance(&added.dgraph_id).await {
                Ok(Some(instance)) => return Ok(instance),
                Ok(None) => debug!(poll, dgraph_id = %added.dgraph_id, "instance not readable yet"),
                Err(err) => warn!(poll, dgraph_id = %added.dgraph_id, error = %err, "readiness poll failed"),
            }
        }

        Err(GraphschemaError::NotReady {
            dgraph_id: added.dgraph_id,
        })
    }

    /// Delete an instance, returning the server's confirmation text.
    #[instrument(skip(self))]
    pub async fn delete_dgraph_instance(&self, dgraph_id: &str) -> GraphschemaResult<Option<String>> {
        Ok(self
            .inner
            .execute("deleteDgraphInstance", &[Argument::new(dgraph_id)])
            .await?)
    }
}
