//! GraphSchema.io client errors.

use thiserror::Error;
use typed_graphql::GraphqlClientError;

/// GraphSchema.io client errors.
#[derive(Debug, Clone, Error)]
pub enum GraphschemaError {
    /// The underlying GraphQL call failed.
    #[error(transparent)]
    Graphql(#[from] GraphqlClientError),

    /// The instance was created but never became readable while polling.
    #[error("Instance doesn't seem to be up yet")]
    NotReady {
        /// Id of the instance that was added.
        dgraph_id: String,
    },
}

impl GraphschemaError {
    /// Id of an instance that was added, even though the call failed.
    #[must_use]
    pub fn added_instance(&self) -> Option<&str> {
        match self {
            Self::NotReady { dgraph_id } => Some(dgraph_id),
            Self::Graphql(_) => None,
        }
    }
}

/// Result alias for GraphSchema.io calls.
pub type GraphschemaResult<T> = Result<T, GraphschemaError>;
