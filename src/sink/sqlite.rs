//! SQLite indexing sink
//!
//! Stores each crawl's pages under its namespace. Re-indexing a namespace
//! replaces its previous contents in one transaction (last write wins).

use crate::page::Page;
use crate::sink::schema::initialize_schema;
use crate::sink::traits::{IndexHandle, IndexingSink, SinkError, SinkResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use sha2::{Digest, Sha256};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// A page as stored in the index
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedPage {
    pub position: usize,
    pub url: String,
    pub final_url: String,
    pub title: Option<String>,
    pub content: String,
    pub content_hash: String,
    pub fetched_at: DateTime<Utc>,
}

/// SQLite-backed indexing sink
///
/// The connection is shared with the blocking pool, where namespace writes
/// run off the async workers.
pub struct SqliteSink {
    conn: Arc<Mutex<Connection>>,
    location: String,
}

impl SqliteSink {
    /// Opens (or creates) the index database at `path`
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSink)` - Successfully opened/created database
    /// * `Err(SinkError)` - Failed to open database
    pub fn open(path: &Path) -> SinkResult<Self> {
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
        ",
        )?;

        initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location: path.display().to_string(),
        })
    }

    /// Creates an in-memory index (for testing)
    pub fn open_in_memory() -> SinkResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        initialize_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            location: ":memory:".to_string(),
        })
    }

    /// Number of pages recorded for `namespace`, if it was ever indexed
    pub fn page_count(&self, namespace: &str) -> SinkResult<Option<usize>> {
        let conn = lock(&self.conn)?;
        let count: Option<i64> = conn
            .query_row(
                "SELECT page_count FROM crawl_index WHERE namespace = ?1",
                params![namespace],
                |row| row.get(0),
            )
            .optional()?;
        Ok(count.map(|c| c as usize))
    }

    /// Reads back the pages of `namespace` in crawl order
    pub fn load_pages(&self, namespace: &str) -> SinkResult<Vec<IndexedPage>> {
        let conn = lock(&self.conn)?;
        let mut stmt = conn.prepare(
            "SELECT position, url, final_url, title, content, content_hash, fetched_at
             FROM indexed_pages WHERE namespace = ?1 ORDER BY position",
        )?;

        let rows = stmt.query_map(params![namespace], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, String>(4)?,
                row.get::<_, String>(5)?,
                row.get::<_, String>(6)?,
            ))
        })?;

        let mut pages = Vec::new();
        for row in rows {
            let (position, url, final_url, title, content, content_hash, fetched_at) = row?;
            let fetched_at = fetched_at
                .parse::<DateTime<Utc>>()
                .map_err(|e| SinkError::Database(format!("bad timestamp for {}: {}", url, e)))?;
            pages.push(IndexedPage {
                position: position as usize,
                url,
                final_url,
                title,
                content,
                content_hash,
                fetched_at,
            });
        }

        Ok(pages)
    }
}

fn lock(conn: &Mutex<Connection>) -> SinkResult<MutexGuard<'_, Connection>> {
    conn.lock()
        .map_err(|_| SinkError::Database("connection lock poisoned".to_string()))
}

/// Replaces the contents of `namespace` with `pages` in one transaction
fn write_namespace(conn: &Mutex<Connection>, pages: &[Page], namespace: &str) -> SinkResult<()> {
    let mut conn = lock(conn)?;
    let tx = conn.transaction()?;

    tx.execute(
        "DELETE FROM indexed_pages WHERE namespace = ?1",
        params![namespace],
    )?;
    tx.execute(
        "INSERT INTO crawl_index (namespace, created_at, page_count) VALUES (?1, ?2, ?3)
         ON CONFLICT(namespace) DO UPDATE SET created_at = ?2, page_count = ?3",
        params![namespace, Utc::now().to_rfc3339(), pages.len() as i64],
    )?;

    {
        let mut insert = tx.prepare(
            "INSERT INTO indexed_pages
             (namespace, position, url, final_url, title, content, content_hash, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        )?;

        for (position, page) in pages.iter().enumerate() {
            insert.execute(params![
                namespace,
                position as i64,
                page.url,
                page.final_url,
                page.title,
                page.content,
                content_hash(&page.content),
                page.fetched_at.to_rfc3339(),
            ])?;
        }
    }

    tx.commit()?;
    Ok(())
}

#[async_trait]
impl IndexingSink for SqliteSink {
    async fn index(&self, pages: &[Page], namespace: &str) -> SinkResult<IndexHandle> {
        if namespace.trim().is_empty() {
            return Err(SinkError::EmptyNamespace);
        }

        if pages.is_empty() {
            tracing::warn!(namespace = %namespace, "Indexing an empty crawl");
        }

        let conn = Arc::clone(&self.conn);
        let owned_pages = pages.to_vec();
        let owned_namespace = namespace.to_string();
        tokio::task::spawn_blocking(move || write_namespace(&conn, &owned_pages, &owned_namespace))
            .await
            .map_err(|e| SinkError::Database(format!("index write task failed: {}", e)))??;

        tracing::info!(
            "Indexed {} pages under namespace '{}' in {}",
            pages.len(),
            namespace,
            self.location
        );

        Ok(IndexHandle {
            namespace: namespace.to_string(),
            page_count: pages.len(),
            location: self.location.clone(),
        })
    }
}

/// Hex-encoded SHA-256 of page content
pub fn content_hash(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
