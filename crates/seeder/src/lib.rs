//! Seed data generation for document stores.
//!
//! This crate creates a grid of databases and collections in a
//! [`DocumentStore`](docstore::DocumentStore): for every database `i` and
//! collection `j` it creates the collection, indexes the `name` field and
//! inserts `{name: "name<i>", seq: j}`.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use seeder::prelude::*;
//!
//! let store = PgDocumentStore::connect(&database_url).await?;
//! let summary = Seeder::new(store).run(10_000, 15).await?;
//! ```

pub mod config;
pub mod db;
pub mod generators;

pub use docstore::{
    CollectionName, DatabaseName, DocumentStore, IndexSpec, MemoryStore, Operation,
    PgDocumentStore, StoreError,
};

pub mod prelude {
    //! Convenient re-exports for common usage.

    pub use crate::config::SeedConfig;
    pub use crate::db::{SeedError, SeedSummary, Seeder};
    pub use crate::generators::{DocumentGenerator, NamespaceGenerator, SeedDocument};
    pub use crate::{DocumentStore, IndexSpec, MemoryStore, PgDocumentStore};
}
