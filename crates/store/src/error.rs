//! Error types for storage operations

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Style profile not found: {0}")]
    NotFound(Uuid),

    #[error("Style profile already exists: {0}")]
    AlreadyExists(Uuid),
}

pub type Result<T> = std::result::Result<T, StoreError>;
