use thiserror::Error;

/// Errors that can occur when interacting with the database
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to connect to database: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("No row found for {0}")]
    NotFound(String),

    #[error("Other database error: {0}")]
    Other(#[from] anyhow::Error),
}
