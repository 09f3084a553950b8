//! Store integration for seeding.
//!
//! The [`Seeder`] drives a [`DocumentStore`](docstore::DocumentStore) through the
//! create-collection, create-index, insert-one cycle, reporting progress once
//! per database.

mod seeder;

pub use seeder::{SeedError, SeedSummary, Seeder, log_progress};
