//! Render Model - Page surfaces and display-list items
//!
//! A rendered page is a raster layer (paper, rules and the ink written on
//! them) plus an ordered display list of the same ink items (glyphs, math
//! runs, strokes) for export collaborators that composite with their own fonts.

mod affine;
mod error;
mod font;
mod paint;
mod random;
mod render_item;
mod surface;

pub use affine::*;
pub use error::*;
pub use font::*;
pub use paint::*;
pub use random::*;
pub use render_item::*;
pub use surface::*;
