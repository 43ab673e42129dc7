use crate::db::DatabaseError;
use crate::storage::StorageError;
use thiserror::Error;

/// Errors surfaced by the entity services to their callers
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Bad input shape or missing required field; never retried.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No authenticated user where one is required.
    #[error("User not authenticated")]
    Auth,

    #[error(transparent)]
    Database(#[from] DatabaseError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}
