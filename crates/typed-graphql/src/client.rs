//! GraphQL HTTP client implementation.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderName, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::{ClientProfile, ConfigError};
use crate::decode::decode;
use crate::error::{ExceptionalError, GraphqlClientError};
use crate::executor::RequestExecutor;
use crate::host::{GraphqlType, HostType};
use crate::logging::DEFAULT_REDACT_FIELDS;
use crate::operation::{GraphqlRequest, GraphqlResponse};
use crate::registry::FieldRegistry;
use crate::request::{Argument, RequestBuilder};
use crate::retry::{NoRetry, RetryDecision, RetryPolicy};
use crate::schema::SchemaDocument;
use crate::selection::DEFAULT_SELECTION_DEPTH;
use crate::transport::{GraphqlTransport, HttpTransport};
use crate::validate::{SchemaValidator, TypeOracle};

/// GraphQL client metrics.
#[derive(Debug, Default)]
#[allow(clippy::struct_field_names)]
pub struct GraphqlClientMetrics {
    requests_total: AtomicU64,
    requests_success: AtomicU64,
    requests_error: AtomicU64,
    requests_retried: AtomicU64,
}

impl GraphqlClientMetrics {
    /// Snapshot current metrics.
    #[must_use]
    pub fn snapshot(&self) -> GraphqlClientMetricsSnapshot {
        GraphqlClientMetricsSnapshot {
            requests_total: self.requests_total.load(Ordering::Relaxed),
            requests_success: self.requests_success.load(Ordering::Relaxed),
            requests_error: self.requests_error.load(Ordering::Relaxed),
            requests_retried: self.requests_retried.load(Ordering::Relaxed),
        }
    }

    fn record(&self, ok: bool) {
        if ok {
            self.requests_success.fetch_add(1, Ordering::Relaxed);
        } else {
            self.requests_error.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Metrics snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_field_names)]
pub struct GraphqlClientMetricsSnapshot {
    /// Calls that reached the transport.
    pub requests_total: u64,
    /// Calls that produced a value.
    pub requests_success: u64,
    /// Calls that failed after reaching the transport.
    pub requests_error: u64,
    /// Retries performed.
    pub requests_retried: u64,
}

/// GraphQL client configuration.
#[derive(Debug, Clone)]
pub struct GraphqlClientConfig {
    /// Default headers applied to every request.
    pub headers: HeaderMap,
    /// Request timeout.
    pub timeout: Duration,
    /// Selection depth for result types without an override.
    pub selection_depth: usize,
    /// Per-model selection depth, keyed by model name.
    pub depth_overrides: BTreeMap<String, usize>,
    /// Variable keys never written to logs.
    pub redact_fields: Vec<String>,
}

impl Default for GraphqlClientConfig {
    fn default() -> Self {
        Self {
            headers: HeaderMap::new(),
            timeout: Duration::from_secs(30),
            selection_depth: DEFAULT_SELECTION_DEPTH,
            depth_overrides: BTreeMap::new(),
            redact_fields: DEFAULT_REDACT_FIELDS.iter().map(ToString::to_string).collect(),
        }
    }
}

impl GraphqlClientConfig {
    /// Selection depth for a result type: its model override, else the default.
    #[must_use]
    pub fn depth_for(&self, host: &HostType) -> usize {
        host.as_model()
            .and_then(|model| self.depth_overrides.get(model.name()))
            .copied()
            .unwrap_or(self.selection_depth)
    }
}

/// GraphQL client builder.
#[derive(Debug)]
pub struct GraphqlClientBuilder {
    endpoint: String,
    config: GraphqlClientConfig,
    schemas: Vec<String>,
    headers: Vec<(String, String)>,
    retry: Arc<dyn RetryPolicy>,
    transport: Option<Arc<dyn GraphqlTransport>>,
}

impl GraphqlClientBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            config: GraphqlClientConfig::default(),
            schemas: Vec::new(),
            headers: Vec::new(),
            retry: Arc::new(NoRetry),
            transport: None,
        }
    }

    /// Start from a validated profile.
    pub fn from_profile(profile: &ClientProfile) -> Result<Self, ConfigError> {
        profile.validate()?;
        let mut builder = Self::new(profile.endpoint.trim())
            .with_timeout(profile.timeout())
            .with_selection_depth(profile.selection_depth);
        builder.config.redact_fields.clone_from(&profile.logging.redact_fields);
        for (model, depth) in &profile.depth_overrides {
            builder = builder.with_depth_override(model.clone(), *depth);
        }
        for (name, value) in &profile.headers {
            builder = builder.with_header(name.clone(), value.clone());
        }
        if let Some(token) = profile.bearer_token()? {
            builder = builder.with_bearer_token(token);
        }
        Ok(builder)
    }

    /// Add schema text describing operations the client may call.
    ///
    /// May be called repeatedly; later definitions replace earlier ones.
    #[must_use]
    pub fn with_schema(mut self, sdl: impl Into<String>) -> Self {
        self.schemas.push(sdl.into());
        self
    }

    /// Add a header. Invalid names or values fail at [`Self::build`].
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Add a bearer token header.
    #[must_use]
    pub fn with_bearer_token(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.with_header(AUTHORIZATION.as_str(), value)
    }

    /// Set timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set the default selection depth.
    #[must_use]
    pub const fn with_selection_depth(mut self, depth: usize) -> Self {
        self.config.selection_depth = depth;
        self
    }

    /// Set the selection depth for one model.
    #[must_use]
    pub fn with_depth_override(mut self, model: impl Into<String>, depth: usize) -> Self {
        self.config.depth_overrides.insert(model.into(), depth);
        self
    }

    /// Set retry policy.
    #[must_use]
    pub fn with_retry_policy(mut self, retry: impl RetryPolicy + 'static) -> Self {
        self.retry = Arc::new(retry);
        self
    }

    /// Replace the HTTP transport.
    #[must_use]
    pub fn with_transport(mut self, transport: Arc<dyn GraphqlTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the client.
    pub fn build(mut self) -> Result<GraphqlClient, GraphqlClientError> {
        if self.config.selection_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "selection_depth",
                message: "must be > 0".into(),
            }
            .into());
        }

        let mut registry = FieldRegistry::new();
        for sdl in &self.schemas {
            registry.load(sdl)?;
        }

        for (name, value) in &self.headers {
            let header_name =
                HeaderName::from_bytes(name.as_bytes()).map_err(|err| ConfigError::Header {
                    name: name.clone(),
                    message: err.to_string(),
                })?;
            let header_value = HeaderValue::from_str(value).map_err(|err| ConfigError::Header {
                name: name.clone(),
                message: err.to_string(),
            })?;
            self.config.headers.insert(header_name, header_value);
        }

        let transport = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(
                self.endpoint,
                self.config.headers.clone(),
                self.config.timeout,
            )?),
        };

        Ok(GraphqlClient {
            registry: Arc::new(registry),
            executor: RequestExecutor::new(transport, self.config.redact_fields.clone()),
            config: self.config,
            retry: self.retry,
            metrics: Arc::new(GraphqlClientMetrics::default()),
        })
    }
}

/// GraphQL client.
#[derive(Debug, Clone)]
pub struct GraphqlClient {
    registry: Arc<FieldRegistry>,
    executor: RequestExecutor,
    config: GraphqlClientConfig,
    retry: Arc<dyn RetryPolicy>,
    metrics: Arc<GraphqlClientMetrics>,
}

impl GraphqlClient {
    /// Shorthand for [`GraphqlClientBuilder::new`].
    #[must_use]
    pub fn builder(endpoint: impl Into<String>) -> GraphqlClientBuilder {
        GraphqlClientBuilder::new(endpoint)
    }

    /// Return client metrics snapshot.
    #[must_use]
    pub fn metrics(&self) -> GraphqlClientMetricsSnapshot {
        self.metrics.snapshot()
    }

    #[must_use]
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn config(&self) -> &GraphqlClientConfig {
        &self.config
    }

    /// Call field `name`, using `name` as the operation name.
    ///
    /// See [`Self::execute_as`] for how nulls are decoded.
    pub async fn execute<T>(&self, name: &str, args: &[Argument]) -> Result<T, GraphqlClientError>
    where
        T: DeserializeOwned + GraphqlType,
    {
        self.execute_as(name, name, args).await
    }

    /// Call field `name` under `operation_name`.
    ///
    /// A blank `operation_name` falls back to `name`. Server-reported errors
    /// are returned as [`GraphqlClientError::Remote`] and nothing is decoded.
    ///
    /// A null for a nullable field decodes `T` from `null`, so nullable
    /// results must be requested as `Option<_>`. A plain struct there fails
    /// with a JSON decode error when the server returns null.
    pub async fn execute_as<T>(
        &self,
        name: &str,
        operation_name: &str,
        args: &[Argument],
    ) -> Result<T, GraphqlClientError>
    where
        T: DeserializeOwned + GraphqlType,
    {
        let request = self.prepare::<T>(name, operation_name, args)?;
        let required_non_null = self
            .registry
            .lookup(name)
            .is_some_and(|(field, _)| field.ty.is_non_null());

        let response = match self.send(&request).await {
            Ok(response) => response,
            Err(err) => {
                self.metrics.record(false);
                return Err(err);
            }
        };

        if !response.is_ok() {
            warn!(
                operation = %request.operation_name,
                errors = response.errors.len(),
                "GraphQL server returned errors"
            );
            self.metrics.record(false);
            return Err(GraphqlClientError::Remote {
                errors: response.errors,
            });
        }

        let decoded = decode::<T>(&response, &request, name, required_non_null);
        self.metrics.record(decoded.is_ok());
        decoded.map_err(Into::into)
    }

    /// Build the request for a typed call without sending it.
    pub fn prepare<T>(
        &self,
        name: &str,
        operation_name: &str,
        args: &[Argument],
    ) -> Result<GraphqlRequest, GraphqlClientError>
    where
        T: GraphqlType + ?Sized,
    {
        if name.trim().is_empty() {
            return Err(ExceptionalError::BlankName.into());
        }
        let operation_name = if operation_name.trim().is_empty() {
            name
        } else {
            operation_name
        };

        let (field, kind) = self
            .registry
            .lookup(name)
            .ok_or_else(|| ExceptionalError::UnknownOperation(name.to_string()))?;

        let result = T::host_type();
        let builder = RequestBuilder::new(self.config.depth_for(&result));
        Ok(builder.build_for(&result, name, operation_name, kind, field, args)?)
    }

    /// Send an already built request and return the raw response.
    pub async fn execute_request(
        &self,
        request: &GraphqlRequest,
    ) -> Result<GraphqlResponse, GraphqlClientError> {
        let result = self.send(request).await;
        self.metrics
            .record(result.as_ref().is_ok_and(GraphqlResponse::is_ok));
        result
    }

    /// Check every registered operation against `sdl`, reporting all
    /// incompatibilities at once.
    pub fn validate_against_schema(
        &self,
        sdl: &str,
        oracle: &dyn TypeOracle,
    ) -> Result<(), GraphqlClientError> {
        let schema = SchemaDocument::parse(sdl)?;
        SchemaValidator::new(oracle)
            .validate_all(self.registry.fields().map(|(field, _)| field), &schema)
            .into_result()
    }

    async fn send(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, GraphqlClientError> {
        self.metrics.requests_total.fetch_add(1, Ordering::Relaxed);
        let mut attempt = 1;
        loop {
            let err = match self.executor.execute(request).await {
                Ok(response) => return Ok(response),
                Err(err) => GraphqlClientError::from(err),
            };
            if !err.is_retryable() {
                return Err(err);
            }
            match self.retry.decide(&err, attempt) {
                RetryDecision::RetryAfter(delay) => {
                    self.metrics
                        .requests_retried
                        .fetch_add(1, Ordering::Relaxed);
                    debug!("retrying GraphQL request after {:?}", delay);
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                RetryDecision::DoNotRetry => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::ModelDescriptor;

    struct Tree;

    impl GraphqlType for Tree {
        fn host_type() -> HostType {
            HostType::model("Tree", || ModelDescriptor::new("Tree").field::<Tree>("child"))
        }
    }

    #[test]
    fn depth_override_applies_to_model_and_lists() {
        let mut config = GraphqlClientConfig::default();
        config.depth_overrides.insert("Tree".to_string(), 7);
        assert_eq!(config.depth_for(&Tree::host_type()), 7);
        assert_eq!(config.depth_for(&Vec::<Tree>::host_type()), 7);
        assert_eq!(config.depth_for(&i32::host_type()), DEFAULT_SELECTION_DEPTH);
    }

    #[test]
    fn build_rejects_bad_header_and_schema() {
        let err = GraphqlClientBuilder::new("http://localhost")
            .with_header("bad header", "x")
            .build()
            .expect_err("header");
        assert!(matches!(err, GraphqlClientError::Config(ConfigError::Header { .. })));

        let err = GraphqlClientBuilder::new("http://localhost")
            .with_schema("type Query {")
            .build()
            .expect_err("schema");
        assert!(matches!(err, GraphqlClientError::Schema(_)));
    }

    #[test]
    fn blank_and_unknown_names_are_exceptional() {
        let client = GraphqlClientBuilder::new("http://localhost")
            .with_schema("type Query { tree: Tree } type Tree { child: Tree }")
            .build()
            .expect("client");

        let err = client.prepare::<Tree>("  ", "", &[]).expect_err("blank");
        assert!(matches!(err, GraphqlClientError::Exceptional(ExceptionalError::BlankName)));

        let err = client.prepare::<Tree>("forest", "", &[]).expect_err("unknown");
        assert_eq!(err.to_string(), "No query or mutation \"forest\" was found.");

        let request = client.prepare::<Tree>("tree", " ", &[]).expect("request");
        assert_eq!(request.operation_name, "tree");
        assert_eq!(
            request.query.as_str(),
            "query tree { tree { child { child { child } } } }"
        );
    }
}
