use thiserror::Error;

/// Errors that can occur when interacting with the local key/value store
#[derive(Error, Debug)]
pub enum LocalStoreError {
    #[error("Failed to open local store: {0}")]
    OpenError(String),

    #[error("Local store operation failed: {0}")]
    OperationError(String),

    #[error("Local store is locked")]
    Locked,

    #[error("Failed to encode value for key {0}: {1}")]
    EncodeError(String, String),

    #[error("Other local store error: {0}")]
    Other(#[from] anyhow::Error),
}
