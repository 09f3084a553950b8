use thiserror::Error;

use crate::models::NameKind;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid {kind} name {name:?}: {reason}")]
    InvalidName {
        kind: NameKind,
        name: String,
        reason: String,
    },

    #[error("Collection {database}.{collection} already exists")]
    CollectionExists {
        database: String,
        collection: String,
    },

    #[error("Collection {database}.{collection} not found")]
    CollectionNotFound {
        database: String,
        collection: String,
    },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
