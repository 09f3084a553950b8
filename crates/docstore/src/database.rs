use async_trait::async_trait;
use serde_json::Value;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tracing::debug;
use uuid::Uuid;

use crate::errors::StoreError;
use crate::models::{CollectionName, DatabaseName, IndexSpec};
use crate::sql;
use crate::store::{DocumentStore, ensure_object};

const DUPLICATE_TABLE: &str = "42P07";
const UNDEFINED_TABLE: &str = "42P01";
const INVALID_SCHEMA_NAME: &str = "3F000";

/// [`DocumentStore`] on PostgreSQL: one schema per database, one JSONB table per collection.
#[derive(Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects with a single-connection pool so statements run in program order.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    pub async fn collection_exists(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<bool, StoreError> {
        let exists: bool = sqlx::query_scalar(sql::TABLE_EXISTS)
            .bind(database.as_str())
            .bind(collection.as_str())
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    pub async fn count_documents(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<i64, StoreError> {
        let query = format!(
            "SELECT COUNT(*) FROM {}",
            sql::qualified_table(database, collection)
        );
        let count: i64 = sqlx::query_scalar(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_missing(e, database, collection))?;
        Ok(count)
    }

    /// Returns a reference to the pool for advanced usage.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn has_code(err: &sqlx::Error, code: &str) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|c| c == code),
        _ => false,
    }
}

fn map_missing(
    err: sqlx::Error,
    database: &DatabaseName,
    collection: &CollectionName,
) -> StoreError {
    if has_code(&err, UNDEFINED_TABLE) || has_code(&err, INVALID_SCHEMA_NAME) {
        StoreError::CollectionNotFound {
            database: database.to_string(),
            collection: collection.to_string(),
        }
    } else {
        StoreError::Database(err)
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn create_collection(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
    ) -> Result<(), StoreError> {
        sqlx::query(&sql::create_schema(database))
            .execute(&self.pool)
            .await?;

        sqlx::query(&sql::create_table(database, collection))
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if has_code(&e, DUPLICATE_TABLE) {
                    StoreError::CollectionExists {
                        database: database.to_string(),
                        collection: collection.to_string(),
                    }
                } else {
                    StoreError::Database(e)
                }
            })?;

        debug!(%database, %collection, "created collection");
        Ok(())
    }

    async fn create_index(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
        index: &IndexSpec,
    ) -> Result<(), StoreError> {
        sqlx::query(&sql::create_index(database, collection, index))
            .execute(&self.pool)
            .await
            .map_err(|e| map_missing(e, database, collection))?;

        debug!(%database, %collection, index = %index.index_name(), "created index");
        Ok(())
    }

    async fn insert_one(
        &self,
        database: &DatabaseName,
        collection: &CollectionName,
        document: &Value,
    ) -> Result<(), StoreError> {
        ensure_object(document)?;
        let body = serde_json::to_string(document)?;

        sqlx::query(&sql::insert_document(database, collection))
            .bind(Uuid::new_v4())
            .bind(body)
            .execute(&self.pool)
            .await
            .map_err(|e| map_missing(e, database, collection))?;

        Ok(())
    }

    async fn drop_database(&self, database: &DatabaseName) -> Result<(), StoreError> {
        sqlx::query(&sql::drop_schema(database))
            .execute(&self.pool)
            .await?;

        debug!(%database, "dropped database");
        Ok(())
    }
}
