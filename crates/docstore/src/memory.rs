//! In-process [`DocumentStore`] with a call journal.
//!
//! Used by the seeder's dry-run mode and by tests. Every call is journaled
//! before it is applied, including calls that fail.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::errors::StoreError;
use crate::models::{CollectionName, DatabaseName, IndexSpec, Operation};
use crate::store::{DocumentStore, ensure_object};

/// One journaled call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Call {
    pub operation: Operation,
    pub database: String,
    pub collection: Option<String>,
}

impl Call {
    /// `database/collection`, or just `database` for database-level calls.
    pub fn namespace(&self) -> String {
        match &self.collection {
            Some(collection) => format!("{}/{}", self.database, collection),
            None => self.database.clone(),
        }
    }
}

#[derive(Debug, Default)]
struct Collection {
    indexes: Vec<IndexSpec>,
    documents: Vec<Value>,
}

#[derive(Debug, Default)]
struct State {
    databases: BTreeMap<String, BTreeMap<String, Collection>>,
    calls: Vec<Call>,
    fail_at: Option<usize>,
}

impl State {
    /// Journals the call and applies the failure plan, if any.
    fn record(
        &mut self,
        operation: Operation,
        database: &DatabaseName,
        collection: Option<&CollectionName>,
    ) -> Result<(), StoreError> {
        let position = self.calls.len();
        self.calls.push(Call {
            operation,
            database: database.to_string(),
            collection: collection.map(ToString::to_string),
        });

        if self.fail_at == Some(position) {
            return Err(StoreError::Unavailable(format!(
                "injected failure on call {position} ({operation})"
            )));
        }
        Ok(())
    }

    fn collection_mut(
        &mut self,
        database: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<&mut Collection, StoreError> {
        self.databases
            .get_mut(database.as_str())
            .and_then(|db| db.get_mut(collection.as_str()))
            .ok_or_else(|| StoreError::CollectionNotFound {
                database: database.to_string(),
                collection: collection.to_string(),
            })
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the call at zero-based `position` fail with [`StoreError::Unavailable`].
    pub fn fail_at(self, position: usize) -> Self {
        self.state().fail_at = Some(position);
        self
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn call_count(&self, operation: Operation) -> usize {
        self.state()
            .calls
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    pub fn database_names(&self) -> Vec<String> {
        self.state().databases.keys().cloned().collect()
    }

    pub fn collection_names(&self, database: &str) -> Vec<String> {
        self.state()
            .databases
            .get(database)
            .map(|db| db.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn documents(&self, database: &str, collection: &str) -> Vec<Value> {
        self.state()
            .databases
            .get(database)
            .and_then(|db| db.get(collection))
            .map(|c| c.documents.clone())
            .unwrap_or_default()
    }

    pub fn indexes(&self, database: &str, collection: &str) -> Vec<IndexSpec> {
        self.state()
            .databases
            .get(database)
            .and_then(|db| db.get(collection))
            .map(|c| c.indexes.clone())
            .unwrap_or_default()
    }

    /// Total documents across all databases.
    pub fn document_count(&self) -> usize {
        self.state()
            .databases
            .values()
            .flat_map(|db| db.values())
            .map(|c| c.documents.len())
            .sum()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn create_collection(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        state.record(Operation::CreateCollection, database, Some(collection))?;

        let db = state.databases.entry(database.to_string()).or_default();
        if db.contains_key(collection.as_str()) {
            return Err(StoreError::CollectionExists {
                database: database.to_string(),
                collection: collection.to_string(),
            });
        }
        db.insert(collection.to_string(), Collection::default());
        Ok(())
    }

    async fn create_index(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
        index: &IndexSpec,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        state.record(Operation::CreateIndex, database, Some(collection))?;

        let coll = state.collection_mut(database, collection)?;
        if !coll.indexes.contains(index) {
            coll.indexes.push(index.clone());
        }
        Ok(())
    }

    async fn insert_one(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
        document: &Value,
    ) -> Result<(), StoreError> {
        let mut state = self.state();
        state.record(Operation::InsertOne, database, Some(collection))?;

        ensure_object(document)?;
        state
            .collection_mut(database, collection)?
            .documents
            .push(document.clone());
        Ok(())
    }

    async fn drop_database(&self, database: &DatabaseName) -> Result<(), StoreError> {
        let mut state = self.state();
        state.record(Operation::DropDatabase, database, None)?;

        state.databases.remove(database.as_str());
        Ok(())
    }
}
