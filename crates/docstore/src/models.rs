use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Longest identifier PostgreSQL keeps without truncation.
pub const MAX_NAME_LEN: usize = 63;

const DATABASE_FORBIDDEN: &[char] = &['/', '\\', '.', '"', '$', ' ', '\0'];
const COLLECTION_FORBIDDEN: &[char] = &['"', '$', '\0'];

/// Which kind of name failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameKind {
    Database,
    Collection,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Database => f.write_str("database"),
            NameKind::Collection => f.write_str("collection"),
        }
    }
}

fn validate(kind: NameKind, name: &str) -> Result<(), StoreError> {
    let invalid = |reason: &str| StoreError::InvalidName {
        kind,
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name is empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(invalid("name is longer than 63 bytes"));
    }
    let forbidden = match kind {
        NameKind::Database => DATABASE_FORBIDDEN,
        NameKind::Collection => COLLECTION_FORBIDDEN,
    };
    if let Some(c) = name.chars().find(|c| forbidden.contains(c)) {
        return Err(invalid(&format!("name contains forbidden character {c:?}")));
    }
    if kind == NameKind::Collection && name.starts_with("system.") {
        return Err(invalid("collection names may not start with 'system.'"));
    }
    // reserved for PostgreSQL system schemas
    if kind == NameKind::Database && name.starts_with("pg_") {
        return Err(invalid("database names may not start with 'pg_'"));
    }
    Ok(())
}

/// A validated database name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct DatabaseName(String);

impl DatabaseName {
    pub fn new(name: impl Into<String>) -> Result<Self, StoreError> {
        let name = name.into();
        validate(NameKind::Database, &name)?;
        Ok(Self(name))
    }

    /// Builds `"{prefix}{index}"`, e.g. `testdb42`.
    pub fn indexed(prefix: &str, index: usize) -> Result<Self, StoreError> {
        Self::new(format!("{prefix}{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated collection name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CollectionName(String);

impl CollectionName {
    pub fn new(name: impl Into<String>) -> Result<Self, StoreError> {
        let name = name.into();
        validate(NameKind::Collection, &name)?;
        Ok(Self(name))
    }

    /// Builds `"{prefix}{index}"`, e.g. `testcoll7`.
    pub fn indexed(prefix: &str, index: usize) -> Result<Self, StoreError> {
        Self::new(format!("{prefix}{index}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexDirection {
    #[default]
    Ascending,
    Descending,
}

impl IndexDirection {
    /// Numeric form used in key specs (`1` / `-1`).
    pub fn as_i32(self) -> i32 {
        match self {
            IndexDirection::Ascending => 1,
            IndexDirection::Descending => -1,
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            IndexDirection::Ascending => "ASC",
            IndexDirection::Descending => "DESC",
        }
    }
}

/// Single-field index definition.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IndexSpec {
    pub field: String,
    pub direction: IndexDirection,
}

impl IndexSpec {
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: IndexDirection::Ascending,
        }
    }

    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: IndexDirection::Descending,
        }
    }

    /// Conventional index name, `name_1` for an ascending index on `name`.
    pub fn index_name(&self) -> String {
        format!("{}_{}", self.field, self.direction.as_i32())
    }
}

/// The operations a [`DocumentStore`](crate::store::DocumentStore) exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    CreateCollection,
    CreateIndex,
    InsertOne,
    DropDatabase,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::CreateCollection => "create_collection",
            Operation::CreateIndex => "create_index",
            Operation::InsertOne => "insert_one",
            Operation::DropDatabase => "drop_database",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indexed_names() {
        assert_eq!(DatabaseName::indexed("testdb", 0).unwrap().as_str(), "testdb0");
        assert_eq!(
            CollectionName::indexed("testcoll", 14).unwrap().as_str(),
            "testcoll14"
        );
    }

    #[test]
    fn test_rejects_empty_name() {
        let err = DatabaseName::new("").unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidName {
                kind: NameKind::Database,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_forbidden_characters() {
        for bad in ["a.b", "a/b", "a b", "a$b", "a\"b", "a\\b"] {
            assert!(DatabaseName::new(bad).is_err(), "{bad} should be rejected");
        }
        assert!(CollectionName::new("a$b").is_err());
        assert!(CollectionName::new("a\0b").is_err());
    }

    #[test]
    fn test_rejects_long_names() {
        let name = "x".repeat(MAX_NAME_LEN + 1);
        assert!(CollectionName::new(name).is_err());
        assert!(CollectionName::new("x".repeat(MAX_NAME_LEN)).is_ok());
    }

    #[test]
    fn test_rejects_system_collections() {
        assert!(CollectionName::new("system.users").is_err());
        assert!(CollectionName::new("events.2024").is_ok());
        assert!(DatabaseName::new("events.2024").is_err());
    }

    #[test]
    fn test_rejects_reserved_database_prefix() {
        let err = DatabaseName::indexed("pg_", 0).unwrap_err();
        assert!(matches!(
            err,
            StoreError::InvalidName {
                kind: NameKind::Database,
                ..
            }
        ));
        assert!(DatabaseName::new("pgdata0").is_ok());
        assert!(CollectionName::new("pg_stats").is_ok());
    }

    #[test]
    fn test_index_name() {
        assert_eq!(IndexSpec::ascending("name").index_name(), "name_1");
        assert_eq!(IndexSpec::descending("seq").index_name(), "seq_-1");
    }
}
