//! Document store abstraction layer for dynui-data.
//!
//! Provides a trait-based interface for document store operations, allowing
//! different backends to be used interchangeably.

pub mod filter;
mod memory;
mod sqlite;
mod types;

pub use memory::{FailingStore, MemoryStore};
pub use sqlite::SqliteStore;
pub use types::{Document, Row, Value};

use crate::config::StoreConfig;
use crate::error::{DynuiError, Result};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};
use url::Url;

/// Supported document store backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// In-process collections, lost on exit.
    Memory,
    /// JSON documents persisted in a SQLite file.
    Sqlite,
}

impl StoreBackend {
    /// Returns the backend as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Memory => "memory",
            Self::Sqlite => "sqlite",
        }
    }

    /// Parses a backend from a URL scheme.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Some(Self::Memory),
            "sqlite" | "sqlite3" => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Determines the backend of a store URL.
    pub fn from_url(url: &str) -> Result<Self> {
        let parsed = Url::parse(url)
            .map_err(|e| DynuiError::config(format!("Invalid store URL '{url}': {e}")))?;
        Self::parse(parsed.scheme()).ok_or_else(|| {
            DynuiError::config(format!(
                "Unsupported store scheme '{}'. Expected 'sqlite' or 'memory'",
                parsed.scheme()
            ))
        })
    }
}

/// Clauses of a live find, already reduced to the ones that apply.
///
/// Empty filter/projection/sort documents and zero skip/limit are `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub filter: Option<Document>,
    pub projection: Option<Document>,
    pub sort: Option<Document>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

/// Trait defining the interface for document stores.
///
/// All operations are async and return Results with DynuiError.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Counts the documents in a collection. Unknown collections count as zero.
    async fn document_count(&self, collection: &str) -> Result<u64>;

    /// Runs a find against a collection.
    async fn find(&self, collection: &str, options: &FindOptions) -> Result<Vec<Document>>;

    /// Lists the names of all non-empty collections.
    async fn list_collection_names(&self) -> Result<Vec<String>>;

    /// Appends documents to a collection, returning how many were written.
    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<u64>;

    /// Releases the store's resources.
    async fn close(&self) -> Result<()>;
}

/// Opens a document store for the given configuration.
///
/// This is the central factory function for store connections.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>> {
    let url = config
        .url
        .as_deref()
        .ok_or_else(|| DynuiError::config("Store is enabled but no store URL is configured"))?;

    match StoreBackend::from_url(url)? {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Sqlite => {
            let store = SqliteStore::connect(url).await?;
            Ok(Arc::new(store))
        }
    }
}

/// Availability of the backing store, decided once at startup.
#[derive(Clone)]
pub enum StoreHandle {
    /// A reachable store.
    Connected(Arc<dyn DocumentStore>),
    /// Store disabled or unreachable; every query degrades to sample data.
    Unavailable,
}

impl StoreHandle {
    /// Wraps an already-open store.
    pub fn connected(store: impl DocumentStore + 'static) -> Self {
        Self::Connected(Arc::new(store))
    }

    /// Resolves the handle from configuration.
    ///
    /// A disabled store or a failed connection yields `Unavailable`; the failure
    /// is logged here and never surfaces again.
    pub async fn from_config(config: &StoreConfig) -> Self {
        if !config.enabled {
            info!("Document store disabled; serving sample data");
            return Self::Unavailable;
        }

        match connect(config).await {
            Ok(store) => {
                info!("Connected to document store: {}", config.display_string());
                Self::Connected(store)
            }
            Err(e) => {
                warn!("Document store connection failed, using sample data: {e}");
                Self::Unavailable
            }
        }
    }

    /// Returns the store if connected.
    pub fn store(&self) -> Option<&Arc<dyn DocumentStore>> {
        match self {
            Self::Connected(store) => Some(store),
            Self::Unavailable => None,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, Self::Connected(_))
    }

    /// Closes the underlying store, if any.
    pub async fn close(&self) -> Result<()> {
        match self {
            Self::Connected(store) => store.close().await,
            Self::Unavailable => Ok(()),
        }
    }
}

impl fmt::Debug for StoreHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected(_) => f.write_str("StoreHandle::Connected"),
            Self::Unavailable => f.write_str("StoreHandle::Unavailable"),
        }
    }
}
