//! Style Extract - Handwriting style estimation
//!
//! A one-shot heuristic pass over a photographed handwriting sample. The image
//! is resized to a fixed analysis resolution and binarized; slant comes from a
//! sweep of shear angles that maximizes column-wise ink variance, stroke width
//! from ink coverage, and spacing from the gaps between ink runs.

mod error;
mod extract;
mod mask;

pub use error::*;
pub use extract::*;
pub use mask::*;
