use thiserror::Error;

/// Errors that can occur in the upload pipeline and object storage
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Invalid file type '{0}'. Please upload a JPEG, PNG, WebP, or GIF image.")]
    InvalidFileType(String),

    #[error("File size too large ({size} bytes). Maximum size is {max} bytes.")]
    FileTooLarge { size: u64, max: u64 },

    #[error("Failed to decode image: {0}")]
    Decode(String),

    #[error("Failed to encode image: {0}")]
    Encode(String),

    #[error("Object with key {0} not found")]
    NotFound(String),

    #[error("Failed to write object {0}: {1}")]
    Write(String, String),

    #[error("Failed to delete object {0}: {1}")]
    Delete(String, String),

    #[error("Other storage error: {0}")]
    Other(#[from] anyhow::Error),
}
