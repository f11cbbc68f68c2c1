//! Database schema definitions for the crawl index

/// SQL schema for the index database
pub const SCHEMA_SQL: &str = r#"
-- One row per indexed namespace
CREATE TABLE IF NOT EXISTS crawl_index (
    namespace TEXT PRIMARY KEY,
    created_at TEXT NOT NULL,
    page_count INTEGER NOT NULL
);

-- Indexed pages, in crawl order
CREATE TABLE IF NOT EXISTS indexed_pages (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    namespace TEXT NOT NULL REFERENCES crawl_index(namespace) ON DELETE CASCADE,
    position INTEGER NOT NULL,
    url TEXT NOT NULL,
    final_url TEXT NOT NULL,
    title TEXT,
    content TEXT NOT NULL,
    content_hash TEXT NOT NULL,
    fetched_at TEXT NOT NULL,
    UNIQUE(namespace, position),
    UNIQUE(namespace, url)
);

CREATE INDEX IF NOT EXISTS idx_indexed_pages_namespace ON indexed_pages(namespace);
CREATE INDEX IF NOT EXISTS idx_indexed_pages_hash ON indexed_pages(content_hash);
"#;

/// Creates all tables and indexes if they do not exist yet
pub fn initialize_schema(conn: &rusqlite::Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_initializes() {
        let conn = Connection::open_in_memory().unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_schema_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();
        assert!(initialize_schema(&conn).is_ok());
    }

    #[test]
    fn test_tables_exist_after_init() {
        let conn = Connection::open_in_memory().unwrap();
        initialize_schema(&conn).unwrap();

        for table in ["crawl_index", "indexed_pages"] {
            let count: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
                    [table],
                    |row| row.get(0),
                )
                .unwrap();
            assert_eq!(count, 1, "missing table {}", table);
        }
    }
}
