//! Sends a built request and turns the raw transport result into a
//! [`GraphqlResponse`] or a [`ClientError`].

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::{ClientError, JSON_DECODE_FAILURE, TRANSPORT_FAILURE};
use crate::logging::redact_sensitive;
use crate::operation::{GraphqlRequest, GraphqlResponse};
use crate::transport::GraphqlTransport;

/// Single-shot request execution over a [`GraphqlTransport`].
#[derive(Debug, Clone)]
pub struct RequestExecutor {
    transport: Arc<dyn GraphqlTransport>,
    redact_fields: Vec<String>,
}

impl RequestExecutor {
    #[must_use]
    pub fn new(transport: Arc<dyn GraphqlTransport>, redact_fields: Vec<String>) -> Self {
        Self {
            transport,
            redact_fields,
        }
    }

    /// Post `request` once.
    ///
    /// Transport faults, non-success statuses and unreadable bodies become a
    /// [`ClientError`] carrying the request and, where one was read, the body
    /// text verbatim. Server-reported errors are left in the response.
    pub async fn execute(&self, request: &GraphqlRequest) -> Result<GraphqlResponse, ClientError> {
        let body = serde_json::to_vec(request).map_err(|err| {
            ClientError::new(TRANSPORT_FAILURE)
                .with_cause(err)
                .with_request(request)
        })?;

        debug!(
            operation = %request.operation_name,
            variables = %redact_sensitive(&serde_json::Value::Object(request.variables.clone()), &self.redact_fields),
            "sending GraphQL request"
        );

        let response = self.transport.send(body).await.map_err(|err| {
            warn!(operation = %request.operation_name, error = %err, "GraphQL transport failed");
            ClientError::new(TRANSPORT_FAILURE)
                .with_cause(err)
                .with_request(request)
        })?;

        if !response.status.is_success() {
            let status = response.status.as_u16();
            warn!(operation = %request.operation_name, status, "GraphQL HTTP status is not success");
            return Err(
                ClientError::new(format!("HTTP response is not success (code {status})"))
                    .with_request(request)
                    .with_response(response.text()),
            );
        }

        serde_json::from_slice::<GraphqlResponse>(&response.body).map_err(|err| {
            warn!(operation = %request.operation_name, error = %err, "GraphQL response is not valid JSON");
            ClientError::new(JSON_DECODE_FAILURE)
                .with_cause(err)
                .with_request(request)
                .with_response(response.text())
        })
    }
}
