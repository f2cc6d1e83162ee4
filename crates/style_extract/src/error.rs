//! Error types for style extraction

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("Image decode error: {0}")]
    Decode(#[from] image::ImageError),

    #[error("Sample contains no ink")]
    NoInk,
}

pub type Result<T> = std::result::Result<T, ExtractError>;
