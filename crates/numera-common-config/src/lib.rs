//! Configuration types for Numera.
//!
//! This crate provides the configuration used by the `numera` tools for
//! `.numera/config.yaml` files: which numbers and categories a content record
//! may carry, where the content corpus lives, and the conventional essay
//! outline.

pub mod types;
pub mod loader;
pub mod env;


pub use types::*;
pub use loader::*;
pub use env::*;
