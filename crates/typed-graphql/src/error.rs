//! Error types for the GraphQL client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use crate::config::ConfigError;
use crate::operation::GraphqlRequest;
use crate::schema::SchemaError;

/// Message used when a null reaches a non-null position.
pub const NULL_FOR_NON_NULL: &str = "Returned null, but GraphQL required non-null.";
/// Message used when a response body or payload cannot be decoded.
pub const JSON_DECODE_FAILURE: &str = "Json Serialization Exception while reading GraphQL response";
/// Message used when the transport itself fails.
pub const TRANSPORT_FAILURE: &str = "Exception while processing request";

/// Programming faults detected before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExceptionalError {
    /// Missing or whitespace-only operation name.
    #[error("operation name must not be blank")]
    BlankName,

    /// Neither the query nor the mutation root declares the name.
    #[error("No query or mutation \"{0}\" was found.")]
    UnknownOperation(String),

    /// Absent value for a non-null argument.
    #[error("Argument is null, but GraphQL is requiring {0} to be non-null.")]
    ArgumentRequired(String),

    /// Result host type does not match the field's result type.
    #[error("Result type {host} doesn't match GraphQL result type {expected}")]
    ResultTypeMismatch {
        /// Host type name.
        host: String,
        /// GraphQL named type.
        expected: String,
    },

    /// Result host type is not representable in GraphQL.
    #[error("Result type {0} isn't a GraphQL model")]
    ResultNotRepresentable(String),

    /// Argument host type does not match the declared argument type.
    #[error("Argument type {host} doesn't match GraphQL type {expected} of {argument}")]
    ArgumentTypeMismatch {
        /// Argument name.
        argument: String,
        /// Host type name.
        host: String,
        /// GraphQL named type.
        expected: String,
    },

    /// Argument host type is not representable in GraphQL.
    #[error("Argument type {host} of {argument} isn't a GraphQL model")]
    ArgumentNotRepresentable {
        /// Argument name.
        argument: String,
        /// Host type name.
        host: String,
    },

    /// Argument value could not be JSON-encoded.
    #[error("Argument {argument} could not be encoded: {message}")]
    MalformedArgument {
        /// Argument name.
        argument: String,
        /// Encoder message.
        message: String,
    },

    /// More present arguments than the field declares.
    #[error("{field} declares {declared} argument(s) but {supplied} were supplied")]
    TooManyArguments {
        /// Field name.
        field: String,
        /// Declared argument count.
        declared: usize,
        /// Supplied (present) argument count.
        supplied: usize,
    },
}

/// An error minted by the client itself (never by the remote server).
///
/// Carries the request and, where one was received, the response text so a
/// failure can be reproduced without re-running the call.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[error("{message}")]
pub struct ClientError {
    /// Human-readable message.
    pub message: String,
    /// Underlying decode or transport failure.
    pub cause: Option<String>,
    /// Request that was being executed.
    pub request: Option<GraphqlRequest>,
    /// Response text, when one was received.
    pub response: Option<String>,
    /// Identifier for cross-referencing logs.
    pub id: Uuid,
    /// When the client minted the error.
    pub timestamp: DateTime<Utc>,
}

impl ClientError {
    /// Create an error with a fresh id and timestamp.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            cause: None,
            request: None,
            response: None,
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn with_cause(mut self, cause: impl ToString) -> Self {
        self.cause = Some(cause.to_string());
        self
    }

    #[must_use]
    pub fn with_request(mut self, request: &GraphqlRequest) -> Self {
        self.request = Some(request.clone());
        self
    }

    #[must_use]
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    /// Render as a GraphQL error object (`message` + `extensions`).
    #[must_use]
    pub fn to_graphql_error(&self) -> Value {
        serde_json::json!({
            "message": self.message,
            "extensions": {
                "id": self.id,
                "exception": self.cause,
                "response": self.response,
                "request": self.request,
                "timestamp": self.timestamp,
            }
        })
    }
}

/// Error type for GraphQL client operations.
#[derive(Debug, Clone, Error)]
pub enum GraphqlClientError {
    /// Caller-side programming fault; nothing was sent.
    #[error(transparent)]
    Exceptional(#[from] ExceptionalError),

    /// Transport, HTTP status or decode failure minted by the client.
    #[error("{0}")]
    Client(Box<ClientError>),

    /// GraphQL-level errors returned by the server, untouched.
    #[error("GraphQL errors: {}", render_errors(.errors))]
    Remote {
        /// GraphQL error list.
        errors: Vec<Value>,
    },

    /// Schema validation error.
    #[error("Schema validation failed: {message}")]
    SchemaValidation {
        /// Summary message.
        message: String,
        /// Individual validation errors.
        errors: Vec<String>,
    },

    /// Schema text could not be read.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// Invalid client configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn render_errors(errors: &[Value]) -> String {
    Value::Array(errors.to_vec()).to_string()
}

impl From<ClientError> for GraphqlClientError {
    fn from(err: ClientError) -> Self {
        Self::Client(Box::new(err))
    }
}

impl GraphqlClientError {
    /// Every individual reason carried by this failure.
    #[must_use]
    pub fn reasons(&self) -> Vec<String> {
        match self {
            Self::SchemaValidation { errors, .. } => errors.clone(),
            Self::Remote { errors } => errors
                .iter()
                .map(|err| {
                    err.get("message")
                        .and_then(Value::as_str)
                        .map_or_else(|| err.to_string(), str::to_string)
                })
                .collect(),
            other => vec![other.to_string()],
        }
    }

    /// The client-minted error, if this is one.
    #[must_use]
    pub fn client_error(&self) -> Option<&ClientError> {
        match self {
            Self::Client(err) => Some(err),
            _ => None,
        }
    }

    /// Returns `true` for caller-side programming faults.
    #[must_use]
    pub const fn is_exceptional(&self) -> bool {
        matches!(self, Self::Exceptional(_))
    }

    /// Returns `true` if the failure happened before any response was read.
    ///
    /// Only these are offered to a retry policy.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Client(err) => err.message == TRANSPORT_FAILURE,
            _ => false,
        }
    }
}
