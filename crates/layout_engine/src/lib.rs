//! Layout Engine - Handwriting synthesis and document layout
//!
//! This crate turns text into handwritten-looking pages: it composites the
//! paper, places every glyph with bounded random perturbation, wraps words
//! inside the page geometry, splits long answers into pages, and layers
//! exam-style formatting on top of the glyph layout primitives.

mod diagram;
mod error;
mod exam;
mod glyph_layout;
mod metrics;
mod page_renderer;
mod paginator;
mod paper;
mod session;

pub use diagram::*;
pub use error::*;
pub use exam::*;
pub use glyph_layout::*;
pub use metrics::*;
pub use page_renderer::*;
pub use paginator::*;
pub use paper::*;
pub use session::*;
