//! Response envelopes exposed to the API layer.
//!
//! `DataService` wires the query executor, the dataset catalog, and the
//! synthesizer together and shapes their results into `{success, ...}`
//! envelopes. Transport framing is left to the caller.

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, warn};

use crate::dataset::{Dataset, DatasetCatalog};
use crate::db::{Row, StoreHandle};
use crate::error::{DynuiError, Result};
use crate::query::{QueryExecutor, QueryRequest};
use crate::synth::DataSynthesizer;

/// Envelope for `execute_query`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Echo of the request.
    pub query: QueryRequest,
}

/// Envelope for `validate_query`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<QueryRequest>,
}

/// Envelope for `list_collections`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionsResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collections: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Entry point for the query and dataset-data operations.
pub struct DataService {
    executor: QueryExecutor,
    catalog: Arc<dyn DatasetCatalog>,
    synthesizer: Mutex<DataSynthesizer>,
}

impl DataService {
    /// Creates a service over a store handle and dataset catalog.
    pub fn new(store: StoreHandle, catalog: Arc<dyn DatasetCatalog>) -> Self {
        Self::with_synthesizer(store, catalog, DataSynthesizer::new())
    }

    /// Creates a service with an explicit synthesizer (e.g. a seeded one).
    pub fn with_synthesizer(
        store: StoreHandle,
        catalog: Arc<dyn DatasetCatalog>,
        synthesizer: DataSynthesizer,
    ) -> Self {
        Self {
            executor: QueryExecutor::new(store),
            catalog,
            synthesizer: Mutex::new(synthesizer),
        }
    }

    pub fn executor(&self) -> &QueryExecutor {
        &self.executor
    }

    /// Runs an ad-hoc query.
    pub async fn execute_query(&self, request: &QueryRequest) -> QueryResponse {
        match self.executor.execute(request).await {
            Ok(rows) => QueryResponse {
                success: true,
                count: Some(rows.len()),
                data: Some(rows),
                error: None,
                query: request.clone(),
            },
            Err(e) => {
                let error = match &e {
                    DynuiError::Validation(msg) => msg.clone(),
                    other => {
                        warn!(collection = %request.collection, "query failed: {other}");
                        other.to_string()
                    }
                };
                QueryResponse {
                    success: false,
                    data: None,
                    count: None,
                    error: Some(error),
                    query: request.clone(),
                }
            }
        }
    }

    /// Checks a request without touching the store.
    pub fn validate_query(&self, request: &QueryRequest) -> ValidationResponse {
        match request.validate() {
            Ok(()) => ValidationResponse {
                success: true,
                message: Some("Query is valid".to_string()),
                error: None,
                query: Some(request.clone()),
            },
            Err(e) => ValidationResponse {
                success: false,
                message: None,
                error: Some(e.message().to_string()),
                query: None,
            },
        }
    }

    /// Lists collections; always succeeds thanks to the listing fallbacks.
    pub async fn list_collections(&self) -> CollectionsResponse {
        CollectionsResponse {
            success: true,
            collections: Some(self.executor.list_collections().await),
            error: None,
        }
    }

    /// Returns every dataset in the catalog.
    pub fn datasets(&self) -> Vec<Dataset> {
        self.catalog.list().into_iter().cloned().collect()
    }

    /// Synthesizes rows for a dataset's schema.
    pub fn generate_data_for_dataset(&self, dataset_id: &str, row_count: usize) -> Result<Vec<Row>> {
        if row_count == 0 {
            return Err(DynuiError::validation("Row count must be positive"));
        }

        let schema = self
            .catalog
            .get_schema(dataset_id)
            .ok_or_else(|| DynuiError::not_found(format!("Dataset '{dataset_id}' not found")))?;

        let mut synthesizer = self
            .synthesizer
            .lock()
            .map_err(|_| DynuiError::internal("synthesizer lock poisoned"))?;
        let rows = synthesizer.generate(schema, row_count);
        debug!(dataset_id, rows = rows.len(), "synthesized dataset rows");
        Ok(rows)
    }
}
