//! Database seeding.

use std::ops::Range;
use std::time::Instant;

use docstore::{CollectionName, DatabaseName, DocumentStore, Operation, StoreError};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::SeedConfig;
use crate::generators::{DocumentGenerator, NamespaceGenerator};

fn collection_suffix(collection: &Option<String>) -> String {
    collection
        .as_ref()
        .map(|c| format!("/{c}"))
        .unwrap_or_default()
}

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("{operation} failed on {database}{}: {source}", collection_suffix(.collection))]
    ExternalService {
        operation: Operation,
        database: String,
        collection: Option<String>,
        #[source]
        source: StoreError,
    },
    #[error("Invalid name: {0}")]
    InvalidName(#[source] StoreError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Connection failed: {0}")]
    Connection(#[source] StoreError),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SeedError {
    fn external(
        operation: Operation,
        database: &DatabaseName,
        collection: Option<&CollectionName>,
        source: StoreError,
    ) -> Self {
        SeedError::ExternalService {
            operation,
            database: database.to_string(),
            collection: collection.map(ToString::to_string),
            source,
        }
    }

    /// The store operation that failed, if the failure came from the store.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            SeedError::ExternalService { operation, .. } => Some(*operation),
            _ => None,
        }
    }
}

/// Counts of completed store operations for one seeding run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedSummary {
    pub databases: usize,
    pub collections: usize,
    pub indexes: usize,
    pub documents: usize,
    pub elapsed_ms: u64,
}

/// Default progress reporter: one `info` event per seeded database.
pub fn log_progress(database_index: usize) {
    info!(database = database_index, "Seeded database");
}

/// Seeds databases, collections, indexes and documents into a [`DocumentStore`].
///
/// Every store call is awaited before the next one is issued, and the first
/// failure ends the run.
pub struct Seeder<S> {
    store: S,
    config: SeedConfig,
    names: NamespaceGenerator,
    documents: DocumentGenerator,
}

impl<S: DocumentStore> Seeder<S> {
    /// Creates a seeder with the default configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, SeedConfig::default())
    }

    pub fn with_config(store: S, config: SeedConfig) -> Self {
        let names = NamespaceGenerator::from_config(&config);
        let documents = DocumentGenerator::new(&config.name_prefix);
        Self {
            store,
            config,
            names,
            documents,
        }
    }

    pub fn config(&self) -> &SeedConfig {
        &self.config
    }

    /// Returns a reference to the store for advanced usage.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Seeds databases `0..database_count`, logging progress through `tracing`.
    pub async fn run(
        &self,
        database_count: usize,
        collections_per_database: usize,
    ) -> Result<SeedSummary, SeedError> {
        self.run_with_progress(database_count, collections_per_database, log_progress)
            .await
    }

    /// Seeds databases `0..database_count`, calling `on_progress(i)` after database `i`.
    pub async fn run_with_progress(
        &self,
        database_count: usize,
        collections_per_database: usize,
        on_progress: impl FnMut(usize),
    ) -> Result<SeedSummary, SeedError> {
        self.seed_range(0..database_count, collections_per_database, on_progress)
            .await
    }

    /// Seeds the configured range, dropping it first when `reset` is set.
    pub async fn seed(&self) -> Result<SeedSummary, SeedError> {
        self.seed_with_progress(log_progress).await
    }

    pub async fn seed_with_progress(
        &self,
        on_progress: impl FnMut(usize),
    ) -> Result<SeedSummary, SeedError> {
        self.config.validate()?;

        let range = self.config.database_range()?;
        if self.config.reset {
            self.clear(range.clone()).await?;
        }

        self.seed_range(range, self.config.collections_per_database, on_progress)
            .await
    }

    /// Drops every database in `range`. Returns the number of databases dropped.
    pub async fn clear(&self, range: Range<usize>) -> Result<usize, SeedError> {
        info!("Clearing {} databases...", range.len());

        let mut dropped = 0;
        for i in range {
            let database = self.names.database(i).map_err(SeedError::InvalidName)?;
            self.store
                .drop_database(&database)
                .await
                .map_err(|e| SeedError::external(Operation::DropDatabase, &database, None, e))?;
            dropped += 1;
        }

        info!("Cleared {} databases", dropped);
        Ok(dropped)
    }

    async fn seed_range(
        &self,
        range: Range<usize>,
        collections_per_database: usize,
        mut on_progress: impl FnMut(usize),
    ) -> Result<SeedSummary, SeedError> {
        let started = Instant::now();

        // Collection names repeat in every database; build and validate them once.
        let collections = self
            .names
            .collections(collections_per_database)
            .map_err(SeedError::InvalidName)?;
        if let Some(last) = range.clone().last() {
            self.names.database(last).map_err(SeedError::InvalidName)?;
        }

        info!(
            "Seeding {} databases x {} collections...",
            range.len(),
            collections_per_database
        );

        let mut summary = SeedSummary::default();
        for i in range {
            let database = self.names.database(i).map_err(SeedError::InvalidName)?;
            self.seed_database(&database, i, &collections, &mut summary)
                .await?;
            summary.databases += 1;
            on_progress(i);
        }

        summary.elapsed_ms = started.elapsed().as_millis() as u64;
        info!(
            "Seeded {} databases, {} collections, {} documents in {}ms",
            summary.databases, summary.collections, summary.documents, summary.elapsed_ms
        );
        Ok(summary)
    }

    async fn seed_database(
        &self,
        database: &DatabaseName,
        database_index: usize,
        collections: &[CollectionName],
        summary: &mut SeedSummary,
    ) -> Result<(), SeedError> {
        for (j, collection) in collections.iter().enumerate() {
            let document = self.documents.generate(database_index, j).to_value()?;

            self.store
                .create_collection(database, collection)
                .await
                .map_err(|e| {
                    SeedError::external(Operation::CreateCollection, database, Some(collection), e)
                })?;
            summary.collections += 1;

            self.store
                .create_index(database, collection, &self.config.index)
                .await
                .map_err(|e| {
                    SeedError::external(Operation::CreateIndex, database, Some(collection), e)
                })?;
            summary.indexes += 1;

            self.store
                .insert_one(database, collection, &document)
                .await
                .map_err(|e| {
                    SeedError::external(Operation::InsertOne, database, Some(collection), e)
                })?;
            summary.documents += 1;

            debug!(%database, %collection, "Seeded collection");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use docstore::MemoryStore;

    #[tokio::test]
    async fn test_summary_counts() {
        let store = MemoryStore::new();
        let seeder = Seeder::new(&store);

        let summary = seeder.run(3, 4).await.unwrap();

        assert_eq!(summary.databases, 3);
        assert_eq!(summary.collections, 12);
        assert_eq!(summary.indexes, 12);
        assert_eq!(summary.documents, 12);
        assert_eq!(store.document_count(), 12);
    }

    #[tokio::test]
    async fn test_call_order_within_collection() {
        let store = MemoryStore::new();
        Seeder::new(&store).run(1, 1).await.unwrap();

        let operations: Vec<Operation> = store.calls().iter().map(|c| c.operation).collect();
        assert_eq!(
            operations,
            vec![
                Operation::CreateCollection,
                Operation::CreateIndex,
                Operation::InsertOne
            ]
        );
    }

    #[tokio::test]
    async fn test_zero_collections_still_reports_progress() {
        let store = MemoryStore::new();
        let mut seen = Vec::new();

        let summary = Seeder::new(&store)
            .run_with_progress(2, 0, |i| seen.push(i))
            .await
            .unwrap();

        assert_eq!(seen, vec![0, 1]);
        assert_eq!(summary.databases, 2);
        assert!(store.calls().is_empty());
    }

    #[tokio::test]
    async fn test_error_names_operation_and_namespace() {
        let store = MemoryStore::new().fail_at(4);
        let err = Seeder::new(&store).run(1, 2).await.unwrap_err();

        assert_eq!(err.operation(), Some(Operation::CreateIndex));
        assert!(err.to_string().starts_with("create_index failed on testdb0/testcoll1: "));
        match err {
            SeedError::ExternalService {
                database,
                collection,
                source,
                ..
            } => {
                assert_eq!(database, "testdb0");
                assert_eq!(collection.as_deref(), Some("testcoll1"));
                assert!(matches!(source, StoreError::Unavailable(_)));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_clear_error_has_no_collection() {
        let store = MemoryStore::new().fail_at(0);
        let err = Seeder::new(&store).clear(0..3).await.unwrap_err();

        assert_eq!(err.operation(), Some(Operation::DropDatabase));
        assert!(err.to_string().starts_with("drop_database failed on testdb0: "));
        assert_eq!(store.calls().len(), 1);
    }
}
