//! Database and collection naming.

use docstore::{CollectionName, DatabaseName, StoreError};

use crate::config::SeedConfig;

/// Derives names as `{prefix}{index}`.
#[derive(Debug, Clone)]
pub struct NamespaceGenerator {
    database_prefix: String,
    collection_prefix: String,
}

impl NamespaceGenerator {
    pub fn new(database_prefix: impl Into<String>, collection_prefix: impl Into<String>) -> Self {
        Self {
            database_prefix: database_prefix.into(),
            collection_prefix: collection_prefix.into(),
        }
    }

    pub fn from_config(config: &SeedConfig) -> Self {
        Self::new(&config.database_prefix, &config.collection_prefix)
    }

    pub fn database(&self, index: usize) -> Result<DatabaseName, StoreError> {
        DatabaseName::indexed(&self.database_prefix, index)
    }

    pub fn collection(&self, index: usize) -> Result<CollectionName, StoreError> {
        CollectionName::indexed(&self.collection_prefix, index)
    }

    /// All collection names for one database, in order.
    pub fn collections(&self, count: usize) -> Result<Vec<CollectionName>, StoreError> {
        (0..count).map(|j| self.collection(j)).collect()
    }
}

impl Default for NamespaceGenerator {
    fn default() -> Self {
        Self::new("testdb", "testcoll")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_names() {
        let names = NamespaceGenerator::default();
        assert_eq!(names.database(9999).unwrap().as_str(), "testdb9999");
        assert_eq!(names.collection(0).unwrap().as_str(), "testcoll0");
    }

    #[test]
    fn test_collections_in_order() {
        let names = NamespaceGenerator::new("db", "c");
        let collections: Vec<String> = names
            .collections(3)
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(collections, vec!["c0", "c1", "c2"]);
    }

    #[test]
    fn test_invalid_prefix() {
        let names = NamespaceGenerator::new("bad db", "c");
        assert!(matches!(
            names.database(0),
            Err(StoreError::InvalidName { .. })
        ));
    }
}
