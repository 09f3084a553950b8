//! Configuration types for seeding.

use std::ops::Range;

use docstore::{IndexSpec, StoreError};
use serde::{Deserialize, Serialize};

use crate::db::SeedError;
use crate::generators::NamespaceGenerator;

/// Number of databases seeded when nothing else is configured.
pub const DEFAULT_DATABASE_COUNT: usize = 10_000;

/// Number of collections created in each database by default.
pub const DEFAULT_COLLECTIONS_PER_DATABASE: usize = 15;

/// Configuration for seeding operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    /// Number of databases to seed.
    pub database_count: usize,

    /// Number of collections created in each database.
    pub collections_per_database: usize,

    /// Index of the first database. Non-zero to resume an interrupted run.
    pub start_index: usize,

    /// Database names are `{database_prefix}{i}`.
    pub database_prefix: String,

    /// Collection names are `{collection_prefix}{j}`.
    pub collection_prefix: String,

    /// The `name` field of each document is `{name_prefix}{i}`.
    pub name_prefix: String,

    /// Index created on every collection.
    pub index: IndexSpec,

    /// Drop every database in range before seeding.
    pub reset: bool,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            database_count: DEFAULT_DATABASE_COUNT,
            collections_per_database: DEFAULT_COLLECTIONS_PER_DATABASE,
            start_index: 0,
            database_prefix: "testdb".to_string(),
            collection_prefix: "testcoll".to_string(),
            name_prefix: "name".to_string(),
            index: IndexSpec::ascending("name"),
            reset: false,
        }
    }
}

impl SeedConfig {
    /// Default naming with the given counts.
    pub fn with_counts(database_count: usize, collections_per_database: usize) -> Self {
        Self {
            database_count,
            collections_per_database,
            ..Self::default()
        }
    }

    /// Database indices covered by this run.
    pub fn database_range(&self) -> Result<Range<usize>, SeedError> {
        let end = self
            .start_index
            .checked_add(self.database_count)
            .ok_or_else(|| {
                SeedError::InvalidConfig(format!(
                    "start index {} plus database count {} overflows",
                    self.start_index, self.database_count
                ))
            })?;
        Ok(self.start_index..end)
    }

    /// Checks the database range and every name this run would produce.
    ///
    /// Names only grow with the index, so checking the first and last of each
    /// range is enough.
    pub fn validate(&self) -> Result<(), SeedError> {
        let range = self.database_range()?;
        self.validate_names(&range).map_err(SeedError::InvalidName)
    }

    fn validate_names(&self, range: &Range<usize>) -> Result<(), StoreError> {
        let names = NamespaceGenerator::from_config(self);
        if !range.is_empty() {
            names.database(range.start)?;
            names.database(range.end - 1)?;
        }
        if self.collections_per_database > 0 {
            names.collection(0)?;
            names.collection(self.collections_per_database - 1)?;
        }
        Ok(())
    }
}
