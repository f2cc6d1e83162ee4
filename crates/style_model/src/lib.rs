//! Style Model - Handwriting style and page geometry value types
//!
//! Immutable value objects shared by every layer of the engine: the ink and
//! spacing parameters of a handwriting style, the geometry of a page of paper,
//! stored style profiles, and the tunable engine settings.

mod color;
mod error;
mod page;
mod profile;
mod settings;
mod style;

pub use color::*;
pub use error::*;
pub use page::*;
pub use profile::*;
pub use settings::*;
pub use style::*;
