//! Core domain entities.
//!
//! - [`Definition`] - A stored dictionary entry
//! - [`NewDefinition`] - Validated input for create and replace
//! - [`DefinitionKey`] - Lookup key used by full replace

pub mod definition;

pub use definition::{Definition, DefinitionKey, NewDefinition, Pronunciation, Rarity};
