//! Math - Typesetting collaborator for inline and display math
//!
//! The layout engine treats a typeset expression as an opaque box: it only
//! needs the measured width and height to advance its cursor. Real renderers
//! implement [`MathTypesetter`]; [`EstimatingTypesetter`] measures expressions
//! from their source when no renderer is attached, and [`linear_text`] gives
//! the one-line form the engine writes by hand.

mod error;
mod estimate;
mod linear;
mod typesetter;

pub use error::*;
pub use estimate::*;
pub use linear::*;
pub use typesetter::*;
