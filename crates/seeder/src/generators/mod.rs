//! Entity generators for seed data.
//!
//! - [`DocumentGenerator`]: Build the document inserted into each collection
//! - [`NamespaceGenerator`]: Derive database and collection names from loop indices

pub mod document;
pub mod namespace;

pub use document::{DocumentGenerator, SeedDocument};
pub use namespace::NamespaceGenerator;
