//! In-memory document stores.
//!
//! `MemoryStore` keeps collections in process for demos and headless testing.
//! `FailingStore` raises on every call to exercise error paths.

use super::{filter, Document, DocumentStore, FindOptions};
use crate::error::{DynuiError, Result};
use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// A document store that keeps every collection in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<BTreeMap<String, Vec<Document>>>,
}

impl MemoryStore {
    /// Creates a new store with no collections.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with one collection.
    pub fn with_collection(mut self, name: impl Into<String>, docs: Vec<Document>) -> Self {
        self.collections
            .get_mut()
            .entry(name.into())
            .or_default()
            .extend(docs);
        self
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn document_count(&self, collection: &str) -> Result<u64> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).map_or(0, |docs| docs.len() as u64))
    }

    async fn find(&self, collection: &str, options: &FindOptions) -> Result<Vec<Document>> {
        let docs = {
            let collections = self.collections.read().await;
            collections.get(collection).cloned().unwrap_or_default()
        };
        filter::apply_find(docs, options)
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        let collections = self.collections.read().await;
        Ok(collections
            .iter()
            .filter(|(_, docs)| !docs.is_empty())
            .map(|(name, _)| name.clone())
            .collect())
    }

    async fn insert_many(&self, collection: &str, docs: Vec<Document>) -> Result<u64> {
        let count = docs.len() as u64;
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_string())
            .or_default()
            .extend(docs);
        Ok(count)
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A store whose every operation fails with the configured message.
#[derive(Debug, Clone)]
pub struct FailingStore {
    message: String,
    count: Option<u64>,
}

impl FailingStore {
    /// Creates a store that fails every call with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            count: None,
        }
    }

    /// Lets `document_count` succeed with `count`, so only the find itself fails.
    pub fn with_document_count(mut self, count: u64) -> Self {
        self.count = Some(count);
        self
    }

    fn fail<T>(&self) -> Result<T> {
        Err(DynuiError::store(self.message.clone()))
    }
}

#[async_trait]
impl DocumentStore for FailingStore {
    async fn document_count(&self, _collection: &str) -> Result<u64> {
        match self.count {
            Some(count) => Ok(count),
            None => self.fail(),
        }
    }

    async fn find(&self, _collection: &str, _options: &FindOptions) -> Result<Vec<Document>> {
        self.fail()
    }

    async fn list_collection_names(&self) -> Result<Vec<String>> {
        self.fail()
    }

    async fn insert_many(&self, _collection: &str, _docs: Vec<Document>) -> Result<u64> {
        self.fail()
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
