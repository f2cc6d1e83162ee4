//! Error types for layout engine

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Render superseded by newer input")]
    Cancelled,

    #[error("Page {index} out of range for a {total}-page plan")]
    PageOutOfRange { index: usize, total: usize },

    #[error("Invalid style: {0}")]
    Style(#[from] style_model::StyleError),

    #[error("Surface error: {0}")]
    Surface(#[from] render_model::RenderError),
}

pub type Result<T> = std::result::Result<T, LayoutError>;
