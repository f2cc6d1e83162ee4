//! Store - Style profile persistence
//!
//! Style profiles are records keyed by an opaque id. The engine only needs
//! create, read, update and delete; this crate provides an in-memory store
//! and a directory of JSON files behind one trait.

mod error;
mod json_store;
mod memory;
mod style_store;

pub use error::*;
pub use json_store::*;
pub use memory::*;
pub use style_store::*;
