//! Error types for style model

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StyleError {
    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Invalid style: {0}")]
    InvalidStyle(String),

    #[error("Invalid page config: {0}")]
    InvalidPage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StyleError>;
