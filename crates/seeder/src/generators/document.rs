//! Document generation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Document inserted into every seeded collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedDocument {
    /// Derived from the database index.
    pub name: String,
    /// The collection index.
    pub seq: usize,
}

impl SeedDocument {
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

/// Generates the per-collection documents.
#[derive(Debug, Clone)]
pub struct DocumentGenerator {
    name_prefix: String,
}

impl DocumentGenerator {
    pub fn new(name_prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: name_prefix.into(),
        }
    }

    /// Document for collection `collection_index` of database `database_index`.
    pub fn generate(&self, database_index: usize, collection_index: usize) -> SeedDocument {
        SeedDocument {
            name: format!("{}{}", self.name_prefix, database_index),
            seq: collection_index,
        }
    }
}

impl Default for DocumentGenerator {
    fn default() -> Self {
        Self::new("name")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_generate_document() {
        let doc = DocumentGenerator::default().generate(1, 1);
        assert_eq!(
            doc,
            SeedDocument {
                name: "name1".to_string(),
                seq: 1
            }
        );
    }

    #[test]
    fn test_document_json_shape() {
        let doc = DocumentGenerator::new("user").generate(42, 7);
        assert_eq!(doc.to_value().unwrap(), json!({"name": "user42", "seq": 7}));
    }
}
