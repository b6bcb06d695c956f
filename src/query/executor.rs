//! Query execution with sample-data fallback.
//!
//! Provides isolated query execution that can be tested independently
//! of the service envelopes.

use std::time::{Duration, Instant};

use tracing::debug;

use super::request::QueryRequest;
use super::samples::{collection_list, sample_rows, DEMO_COLLECTIONS, MINIMAL_COLLECTIONS};
use crate::db::{Row, StoreHandle};
use crate::error::{DynuiError, Result};

/// Why sample rows were served instead of live ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    /// No store was configured or it could not be reached at startup.
    StoreUnavailable,
    /// The store holds no documents for the collection.
    EmptyCollection,
}

/// Where a result's rows came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowSource {
    Live,
    Sample(FallbackReason),
}

/// Successful query execution outcome.
#[derive(Debug, Clone)]
pub struct QueryOutcome {
    /// Result rows.
    pub rows: Vec<Row>,
    /// Whether the rows are live or canned.
    pub source: RowSource,
    /// How long the query took to execute.
    pub execution_time: Duration,
}

impl QueryOutcome {
    fn sample(collection: &str, reason: FallbackReason, start: Instant) -> Self {
        Self {
            rows: sample_rows(collection),
            source: RowSource::Sample(reason),
            execution_time: start.elapsed(),
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }
}

/// Query executor that translates requests into store finds.
///
/// Store absence and empty collections are answered with canned sample rows;
/// store failures are returned as errors.
#[derive(Debug, Clone)]
pub struct QueryExecutor {
    store: StoreHandle,
}

impl QueryExecutor {
    /// Creates a new query executor.
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// Returns the store handle this executor reads from.
    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    /// Executes a request and returns its rows.
    pub async fn execute(&self, request: &QueryRequest) -> Result<Vec<Row>> {
        Ok(self.execute_detailed(request).await?.rows)
    }

    /// Executes a request, reporting where the rows came from.
    pub async fn execute_detailed(&self, request: &QueryRequest) -> Result<QueryOutcome> {
        request.validate()?;
        let start = Instant::now();
        let collection = request.collection.as_str();

        let Some(store) = self.store.store() else {
            debug!(collection, "store unavailable, serving sample rows");
            return Ok(QueryOutcome::sample(
                collection,
                FallbackReason::StoreUnavailable,
                start,
            ));
        };

        let count = store
            .document_count(collection)
            .await
            .map_err(|e| DynuiError::store_execution(e.message()))?;
        if count == 0 {
            debug!(collection, "collection empty, serving sample rows");
            return Ok(QueryOutcome::sample(
                collection,
                FallbackReason::EmptyCollection,
                start,
            ));
        }

        let options = request.find_options();
        let rows = store
            .find(collection, &options)
            .await
            .map_err(|e| DynuiError::store_execution(e.message()))?;

        let execution_time = start.elapsed();
        debug!(
            collection,
            rows = rows.len(),
            elapsed_ms = execution_time.as_millis() as u64,
            "live query complete"
        );

        Ok(QueryOutcome {
            rows,
            source: RowSource::Live,
            execution_time,
        })
    }

    /// Lists collection names.
    ///
    /// Never fails: no store or an empty store yields the demo list, and a
    /// listing error yields the minimal list.
    pub async fn list_collections(&self) -> Vec<String> {
        let Some(store) = self.store.store() else {
            return collection_list(&DEMO_COLLECTIONS);
        };

        match store.list_collection_names().await {
            Ok(names) if names.is_empty() => collection_list(&DEMO_COLLECTIONS),
            Ok(names) => names,
            Err(e) => {
                debug!("listing collections failed, using minimal list: {e}");
                collection_list(&MINIMAL_COLLECTIONS)
            }
        }
    }
}
