use thiserror::Error;

use crate::db::repository::RepositoryError;
use crate::graph::GraphError;

/// Failure of a course query, classified by how callers should react.
#[derive(Debug, Error)]
pub enum QueryError {
    /// Caller input was rejected; the message is safe to show.
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Anything else; the message is for logs only.
    #[error("{0}")]
    Internal(String),
}

impl QueryError {
    pub fn is_validation(&self) -> bool {
        matches!(self, QueryError::Validation(_))
    }
}

impl From<RepositoryError> for QueryError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ValidationError { message, .. } => QueryError::Validation(message),
            RepositoryError::NotFound { message, .. } => QueryError::NotFound(message),
            other => QueryError::Internal(other.to_string()),
        }
    }
}

impl From<GraphError> for QueryError {
    fn from(err: GraphError) -> Self {
        QueryError::Internal(err.to_string())
    }
}
