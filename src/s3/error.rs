use thiserror::Error;

/// Errors that can occur when interacting with the object store
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to connect to storage: {0}")]
    ConnectionError(String),

    #[error("Object {0} not found")]
    ObjectNotFound(String),

    #[error("Object {0} already exists")]
    AlreadyExists(String),

    #[error("Access denied for object {0}: {1}")]
    AccessDenied(String, String),

    #[error("Failed to upload object {0}: {1}")]
    UploadError(String, String),

    #[error("Failed to delete object {0}: {1}")]
    DeleteError(String, String),

    #[error("Unknown bucket: {0}")]
    UnknownBucket(String),

    #[error("Other storage error: {0}")]
    Other(#[from] anyhow::Error),
}
