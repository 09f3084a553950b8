//! The document-store seam.
//!
//! The seeder only ever talks to a [`DocumentStore`]. Backends decide what a
//! database and a collection map onto; callers see the same four operations.

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::StoreError;
use crate::models::{CollectionName, DatabaseName, IndexSpec};

/// A service holding named databases of named document collections.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Create `collection` inside `database`, creating the database if needed.
    /// Fails with [`StoreError::CollectionExists`] if the collection is already present.
    async fn create_collection(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<(), StoreError>;

    /// Create a single-field index. Creating the same index twice is a no-op.
    async fn create_index(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
        index: &IndexSpec,
    ) -> Result<(), StoreError>;

    /// Insert one document. The document must be a JSON object.
    async fn insert_one(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
        document: &Value,
    ) -> Result<(), StoreError>;

    /// Drop a database and everything in it. Dropping a missing database is a no-op.
    async fn drop_database(&self, database: &DatabaseName) -> Result<(), StoreError>;
}

#[async_trait]
impl<S: DocumentStore + ?Sized> DocumentStore for &S {
    async fn create_collection(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<(), StoreError> {
        (**self).create_collection(database, collection).await
    }

    async fn create_index(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
        index: &IndexSpec,
    ) -> Result<(), StoreError> {
        (**self).create_index(database, collection, index).await
    }

    async fn insert_one(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
        document: &Value,
    ) -> Result<(), StoreError> {
        (**self).insert_one(database, collection, document).await
    }

    async fn drop_database(&self, database: &DatabaseName) -> Result<(), StoreError> {
        (**self).drop_database(database).await
    }
}

pub(crate) fn ensure_object(document: &Value) -> Result<(), StoreError> {
    if document.is_object() {
        Ok(())
    } else {
        Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {document}"
        )))
    }
}
