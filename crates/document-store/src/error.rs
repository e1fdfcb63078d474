use thiserror::Error;

/// Errors that can occur when interacting with the document store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An operation needing the in-memory handle ran before `load()`.
    #[error("Data store is not loaded")]
    NotLoaded,

    /// Reading or writing the backing storage failed.
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The storage backend rejected the operation.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Result type for document store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
