//! Collection-agnostic query descriptions.

use crate::db::{Document, FindOptions};
use crate::error::{DynuiError, Result};
use serde::{Deserialize, Serialize};

/// Message returned for requests without a usable collection name.
pub const COLLECTION_REQUIRED: &str = "Collection name is required";

/// An abstract find against one collection.
///
/// Filter, projection, and sort are passed through to the store untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRequest {
    /// Target collection name.
    #[serde(default)]
    pub collection: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<Document>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub projection: Option<Document>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<Document>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
}

impl QueryRequest {
    /// Creates a request for every document of a collection.
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: Document) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_projection(mut self, projection: Document) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn with_sort(mut self, sort: Document) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_skip(mut self, skip: u64) -> Self {
        self.skip = Some(skip);
        self
    }

    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Checks the request can be sent to a store.
    pub fn validate(&self) -> Result<()> {
        if self.collection.trim().is_empty() {
            return Err(DynuiError::validation(COLLECTION_REQUIRED));
        }
        Ok(())
    }

    /// Reduces the request to the clauses that apply.
    ///
    /// Empty documents and zero skip/limit are dropped.
    pub fn find_options(&self) -> FindOptions {
        let non_empty = |doc: &Option<Document>| doc.as_ref().filter(|d| !d.is_empty()).cloned();
        FindOptions {
            filter: non_empty(&self.filter),
            projection: non_empty(&self.projection),
            sort: non_empty(&self.sort),
            skip: self.skip.filter(|&s| s > 0),
            limit: self.limit.filter(|&l| l > 0),
        }
    }
}
