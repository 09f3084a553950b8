//! SQL statement builders for the PostgreSQL backend.
//!
//! Databases map to schemas and collections map to tables, so every name ends
//! up as an identifier. Names cannot be bound as parameters; they are quoted here.

use crate::models::{CollectionName, DatabaseName, IndexSpec, MAX_NAME_LEN};

/// Quotes an identifier, doubling embedded double quotes.
pub fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

/// Quotes a string literal, doubling embedded single quotes.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// `"schema"."table"`
pub fn qualified_table(database: &DatabaseName, collection: &CollectionName) -> String {
    format!(
        "{}.{}",
        quote_ident(database.as_str()),
        quote_ident(collection.as_str())
    )
}

pub fn create_schema(database: &DatabaseName) -> String {
    format!(
        "CREATE SCHEMA IF NOT EXISTS {}",
        quote_ident(database.as_str())
    )
}

pub fn drop_schema(database: &DatabaseName) -> String {
    format!(
        "DROP SCHEMA IF EXISTS {} CASCADE",
        quote_ident(database.as_str())
    )
}

/// No `IF NOT EXISTS`: an existing collection must surface as an error.
pub fn create_table(database: &DatabaseName, collection: &CollectionName) -> String {
    format!(
        "CREATE TABLE {} (\
         id UUID PRIMARY KEY, \
         doc JSONB NOT NULL, \
         created_at TIMESTAMPTZ NOT NULL DEFAULT NOW())",
        qualified_table(database, collection)
    )
}

/// Index names share a schema-wide namespace with tables and are cut at 63 bytes.
///
/// The name is `{collection}_{field}_{dir}`, shortened to fit, followed by `$`
/// and a CRC32 of the full index identity. `$` is not allowed in collection
/// names, so an index name never equals a table name, and the checksum keeps
/// shortened names of different indexes apart.
pub fn index_name(collection: &CollectionName, index: &IndexSpec) -> String {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(collection.as_str().as_bytes());
    hasher.update(&[0]);
    hasher.update(index.field.as_bytes());
    hasher.update(&[0]);
    hasher.update(&index.direction.as_i32().to_le_bytes());
    let checksum = format!("${:08x}", hasher.finalize());

    let readable = format!("{}_{}", collection.as_str(), index.index_name());
    let head = truncate_at_char_boundary(&readable, MAX_NAME_LEN - checksum.len());
    format!("{head}{checksum}")
}

fn truncate_at_char_boundary(value: &str, max_len: usize) -> &str {
    if value.len() <= max_len {
        return value;
    }
    let mut end = max_len;
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    &value[..end]
}

pub fn create_index(
    database: &DatabaseName,
    collection: &CollectionName,
    index: &IndexSpec,
) -> String {
    format!(
        "CREATE INDEX IF NOT EXISTS {} ON {} ((doc->>{}) {})",
        quote_ident(&index_name(collection, index)),
        qualified_table(database, collection),
        quote_literal(&index.field),
        index.direction.as_sql()
    )
}

/// Parameters: `$1` id (uuid), `$2` document (text, cast to jsonb).
pub fn insert_document(database: &DatabaseName, collection: &CollectionName) -> String {
    format!(
        "INSERT INTO {} (id, doc) VALUES ($1, $2::jsonb)",
        qualified_table(database, collection)
    )
}

/// Parameters: `$1` schema name, `$2` table name.
pub const TABLE_EXISTS: &str = r#"
    SELECT EXISTS (
        SELECT 1 FROM information_schema.tables
        WHERE table_schema = $1 AND table_name = $2
    )
"#;

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> (DatabaseName, CollectionName) {
        (
            DatabaseName::new("testdb1").unwrap(),
            CollectionName::new("testcoll1").unwrap(),
        )
    }

    #[test]
    fn test_quote_ident_escapes_quotes() {
        assert_eq!(quote_ident("plain"), "\"plain\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn test_quote_literal_escapes_quotes() {
        assert_eq!(quote_literal("name"), "'name'");
        assert_eq!(quote_literal("o'neil"), "'o''neil'");
    }

    #[test]
    fn test_create_table() {
        let (db, coll) = names();
        let sql = create_table(&db, &coll);
        assert!(sql.starts_with("CREATE TABLE \"testdb1\".\"testcoll1\" ("));
        assert!(!sql.contains("IF NOT EXISTS"));
        assert!(sql.contains("doc JSONB NOT NULL"));
    }

    #[test]
    fn test_create_index() {
        let (db, coll) = names();
        let index = IndexSpec::ascending("name");
        let sql = create_index(&db, &coll, &index);
        assert_eq!(
            sql,
            format!(
                "CREATE INDEX IF NOT EXISTS \"{}\" ON \"testdb1\".\"testcoll1\" ((doc->>'name') ASC)",
                index_name(&coll, &index)
            )
        );
    }

    #[test]
    fn test_descending_index() {
        let (db, coll) = names();
        let sql = create_index(&db, &coll, &IndexSpec::descending("seq"));
        assert!(sql.contains("\"testcoll1_seq_-1$"));
        assert!(sql.ends_with("((doc->>'seq') DESC)"));
    }

    #[test]
    fn test_index_name_is_readable_and_stable() {
        let (_, coll) = names();
        let index = IndexSpec::ascending("name");
        let name = index_name(&coll, &index);

        assert!(name.starts_with("testcoll1_name_1$"));
        assert_eq!(name.len(), "testcoll1_name_1$".len() + 8);
        assert_eq!(name, index_name(&coll, &index));
        assert_ne!(name, index_name(&coll, &IndexSpec::descending("name")));
    }

    #[test]
    fn test_index_name_fits_for_longest_collection() {
        let coll = CollectionName::new("c".repeat(MAX_NAME_LEN)).unwrap();
        let name = index_name(&coll, &IndexSpec::ascending("name"));

        assert_eq!(name.len(), MAX_NAME_LEN);
        assert_ne!(name, coll.as_str());
        // '$' cannot appear in a collection name, so no table can share this name
        assert!(CollectionName::new(name).is_err());
    }

    #[test]
    fn test_index_name_separates_shared_prefixes() {
        let a = CollectionName::new(format!("{}a", "c".repeat(60))).unwrap();
        let b = CollectionName::new(format!("{}b", "c".repeat(60))).unwrap();
        let index = IndexSpec::ascending("name");

        assert_ne!(index_name(&a, &index), index_name(&b, &index));
    }

    #[test]
    fn test_index_name_truncates_on_char_boundary() {
        // one ASCII byte shifts every two-byte 'é' onto odd offsets
        let coll = CollectionName::new(format!("x{}", "é".repeat(31))).unwrap();
        let name = index_name(&coll, &IndexSpec::ascending("name"));

        assert_eq!(name.len(), MAX_NAME_LEN - 1);
        assert_eq!(name.find('$'), Some(name.len() - 9));
    }

    #[test]
    fn test_insert_document() {
        let (db, coll) = names();
        assert_eq!(
            insert_document(&db, &coll),
            "INSERT INTO \"testdb1\".\"testcoll1\" (id, doc) VALUES ($1, $2::jsonb)"
        );
    }

    #[test]
    fn test_schema_statements() {
        let (db, _) = names();
        assert_eq!(create_schema(&db), "CREATE SCHEMA IF NOT EXISTS \"testdb1\"");
        assert_eq!(drop_schema(&db), "DROP SCHEMA IF EXISTS \"testdb1\" CASCADE");
    }
}
