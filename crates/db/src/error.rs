use roombrief_core::error::CoreError;
use roombrief_core::types::ProjectId;

/// Errors returned by [`ProjectStore`](crate::ProjectStore) implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Project {0} not found")]
    NotFound(ProjectId),

    #[error(transparent)]
    Validation(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Malformed project document: {0}")]
    Serialization(#[from] serde_json::Error),
}
