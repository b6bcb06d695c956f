//! SQLite-backed document store.
//!
//! Provides the `SqliteStore` struct that implements the `DocumentStore` trait
//! by keeping JSON document bodies in a single SQLite table via sqlx.

use crate::db::{filter, Document, DocumentStore, FindOptions};
use crate::error::{DynuiError, Result};
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::PathBuf;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Maximum pooled connections.
const MAX_CONNECTIONS: u32 = 5;

/// SQLite document store.
#[derive(Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if needed) the store named by a `sqlite://` URL.
    pub async fn connect(url: &str) -> Result<Self> {
        let path = path_from_url(url)?;
        Self::open(path).await
    }

    /// Opens (creating if needed) the store file at `path`.
    pub async fn open(path: PathBuf) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    DynuiError::connection(format!(
                        "Failed to create store directory {}: {e}",
                        parent.display()
                    ))
                })?;
            }
        }

        let options = SqliteConnectOptions::new()
            .filename(&path)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(10))
            .connect_with(options)
            .await
            .map_err(|e| {
                DynuiError::connection(format!(
                    "Failed to open store at {}: {e}",
                    path.display()
                ))
            })?;

        ensure_documents_table(&pool).await?;
        debug!("Opened SQLite document store at {}", path.display());

        Ok(Self { pool, path })
    }

    /// Returns the path of the backing file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Loads the raw bodies of a collection in insertion order.
    ///
    /// Skip and limit are pushed into SQL only when no filter or sort has to
    /// see the whole collection first.
    async fn load_bodies(&self, collection: &str, options: &FindOptions) -> Result<Vec<String>> {
        let windowed = options.filter.is_none() && options.sort.is_none();

        let paged = windowed && (options.skip.is_some() || options.limit.is_some());
        let bodies: std::result::Result<Vec<String>, sqlx::Error> = if paged {
            // Values past i64::MAX saturate; SQLite reads a negative LIMIT as unbounded
            let limit = options.limit.map_or(-1, saturating_i64);
            let offset = options.skip.map_or(0, saturating_i64);
            sqlx::query_scalar(
                "SELECT body FROM documents WHERE collection = ? ORDER BY id LIMIT ? OFFSET ?",
            )
            .bind(collection)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await
        } else {
            sqlx::query_scalar("SELECT body FROM documents WHERE collection = ? ORDER BY id")
                .bind(collection)
                .fetch_all(&self.pool)
                .await
        };

        bodies.map_err(|e| DynuiError::store(format!("Failed to read '{collection}': {e}")))
    }
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn document_count(&self, collection: &str) -> Result<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM documents WHERE collection = ?")
            .bind(collection)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DynuiError::store(format!("Failed to count '{collection}': {e}")))?;
        Ok(count.max(0) as u64)
    }

    async fn find(&self, collection: &str, options: &FindOptions) -> Result<Vec<Document>> {
        let bodies = self.load_bodies(collection, options).await?;

        let mut docs = Vec::with_capacity(bodies.len());
        for body in bodies {
            let doc: Document = serde_json::from_str(&body).map_err(|e| {
                DynuiError::store(format!("Malformed document in '{collection}': {e}"))
            })?;
            docs.push(doc);
        }

        if options.filter.is_none() && options.sort.is_none() {
            // Window already applied in SQL
            let remaining = FindOptions {
                projection: options.projection.clone(),
                ..Default::default()
            };
            return filter::apply_find(docs, &remaining);
        }
        filter::apply_find(docs, options)
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        sqlx::query_scalar("SELECT DISTINCT collection FROM documents ORDER BY collection")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DynuiError::store(format!("Failed to list collections: {e}")))
    }

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<u64> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DynuiError::store(format!("Failed to start insert: {e}")))?;

        let mut written = 0u64;
        for doc in docs {
            let body = serde_json::to_string(&doc)
                .map_err(|e| DynuiError::internal(format!("Failed to encode document: {e}")))?;
            sqlx::query("INSERT INTO documents (collection, body) VALUES (?, ?)")
                .bind(collection)
                .bind(body)
                .execute(&mut *tx)
                .await
                .map_err(|e| DynuiError::store(format!("Failed to insert into '{collection}': {e}")))?;
            written += 1;
        }

        tx.commit()
            .await
            .map_err(|e| DynuiError::store(format!("Failed to commit insert: {e}")))?;
        Ok(written)
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

fn saturating_i64(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Creates the documents table if it does not exist.
async fn ensure_documents_table(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS documents (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            collection TEXT NOT NULL,
            body TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| DynuiError::connection(format!("Failed to create documents table: {e}")))?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_collection ON documents (collection)")
        .execute(pool)
        .await
        .map_err(|e| DynuiError::connection(format!("Failed to create collection index: {e}")))?;

    Ok(())
}

/// Extracts the file path from a `sqlite://` URL.
///
/// `sqlite:///abs/store.db` is absolute; `sqlite://data/store.db` is relative
/// to the working directory.
pub(crate) fn path_from_url(url: &str) -> Result<PathBuf> {
    let parsed = Url::parse(url)
        .map_err(|e| DynuiError::config(format!("Invalid store URL '{url}': {e}")))?;

    let mut path = String::new();
    if let Some(host) = parsed.host_str() {
        path.push_str(host);
    }
    path.push_str(parsed.path());

    if path.is_empty() || path == "/" {
        return Err(DynuiError::config(format!(
            "Store URL '{url}' does not name a database file"
        )));
    }
    Ok(PathBuf::from(path))
}
