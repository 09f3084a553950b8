//! Document-store abstraction used by the seeder.
//!
//! A [`DocumentStore`] holds named databases, each holding named collections of
//! JSON documents. Two backends ship with the crate:
//!
//! - [`PgDocumentStore`]: PostgreSQL, one schema per database and one JSONB table per collection.
//! - [`MemoryStore`]: in-process, journals every call. Used for dry runs and tests.

pub mod database;
pub mod errors;
pub mod memory;
pub mod models;
pub mod sql;
pub mod store;

pub use database::PgDocumentStore;
pub use errors::StoreError;
pub use memory::{Call, MemoryStore};
pub use models::{CollectionName, DatabaseName, IndexDirection, IndexSpec, NameKind, Operation};
pub use store::DocumentStore;
