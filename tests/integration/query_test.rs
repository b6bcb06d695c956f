//! Query execution integration tests.
//!
//! Tests the fallback rules and live finds through the public executor API.

use dynui_data::db::{Document, FailingStore, MemoryStore, StoreHandle, Value};
use dynui_data::error::DynuiError;
use dynui_data::query::{
    FallbackReason, QueryExecutor, QueryRequest, RowSource, DEMO_COLLECTIONS, MINIMAL_COLLECTIONS,
};
use pretty_assertions::assert_eq;

fn inventory() -> Vec<Document> {
    vec![
        Document::new().with("_id", "i1").with("sku", "A-100").with("qty", 12).with("site", "north"),
        Document::new().with("_id", "i2").with("sku", "B-200").with("qty", 0).with("site", "south"),
        Document::new().with("_id", "i3").with("sku", "C-300").with("qty", 40).with("site", "north"),
        Document::new().with("_id", "i4").with("sku", "D-400").with("qty", 7).with("site", "east"),
    ]
}

fn executor_with_inventory() -> QueryExecutor {
    let store = MemoryStore::new().with_collection("inventory", inventory());
    QueryExecutor::new(StoreHandle::connected(store))
}

#[tokio::test]
async fn test_absent_and_empty_store_serve_identical_rows() {
    let absent = QueryExecutor::new(StoreHandle::Unavailable);
    let empty = QueryExecutor::new(StoreHandle::connected(MemoryStore::new()));

    for collection in ["users", "orders", "products"] {
        let request = QueryRequest::new(collection);
        let from_absent = absent.execute_detailed(&request).await.unwrap();
        let from_empty = empty.execute_detailed(&request).await.unwrap();

        assert_eq!(from_absent.rows, from_empty.rows);
        assert_eq!(
            from_absent.source,
            RowSource::Sample(FallbackReason::StoreUnavailable)
        );
        assert_eq!(
            from_empty.source,
            RowSource::Sample(FallbackReason::EmptyCollection)
        );
    }
}

#[tokio::test]
async fn test_sample_rows_ignore_request_clauses() {
    let executor = QueryExecutor::new(StoreHandle::Unavailable);
    let request = QueryRequest::new("users")
        .with_filter(Document::new().with("name", "Nobody"))
        .with_limit(1);

    let rows = executor.execute(&request).await.unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].get("name").and_then(Value::as_str), Some("John Doe"));
}

#[tokio::test]
async fn test_unknown_collection_gets_placeholder_row() {
    let executor = QueryExecutor::new(StoreHandle::Unavailable);
    let rows = executor
        .execute(&QueryRequest::new("telemetry"))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    let row = &rows[0];
    assert_eq!(row.get("_id").and_then(Value::as_str), Some("sample1"));
    assert_eq!(row.get("collection").and_then(Value::as_str), Some("telemetry"));
    assert_eq!(
        row.get("message").and_then(Value::as_str),
        Some("Sample data for telemetry")
    );
    assert!(matches!(row.get("timestamp"), Some(Value::Int(ms)) if *ms > 0));
}

#[tokio::test]
async fn test_blank_collection_is_rejected_before_store_access() {
    // A failing store proves the store is never consulted.
    let executor = QueryExecutor::new(StoreHandle::connected(FailingStore::new("unreachable")));

    for collection in ["", "   "] {
        let err = executor
            .execute(&QueryRequest::new(collection))
            .await
            .unwrap_err();
        assert!(matches!(err, DynuiError::Validation(_)));
        assert_eq!(err.message(), "Collection name is required");
    }
}

#[tokio::test]
async fn test_live_find_applies_all_clauses() {
    let request = QueryRequest::new("inventory")
        .with_filter(Document::new().with("site", "north").with(
            "qty",
            Document::new().with("$gt", 0),
        ))
        .with_sort(Document::new().with("qty", -1))
        .with_projection(Document::new().with("sku", 1).with("_id", 0));

    let outcome = executor_with_inventory()
        .execute_detailed(&request)
        .await
        .unwrap();

    assert_eq!(outcome.source, RowSource::Live);
    assert_eq!(
        outcome.rows,
        vec![
            Document::new().with("sku", "C-300"),
            Document::new().with("sku", "A-100"),
        ]
    );
}

#[tokio::test]
async fn test_live_find_skip_and_limit() {
    let request = QueryRequest::new("inventory")
        .with_sort(Document::new().with("sku", 1))
        .with_skip(1)
        .with_limit(2);

    let rows = executor_with_inventory().execute(&request).await.unwrap();
    let skus: Vec<&str> = rows
        .iter()
        .filter_map(|r| r.get("sku").and_then(Value::as_str))
        .collect();
    assert_eq!(skus, vec!["B-200", "C-300"]);
}

#[tokio::test]
async fn test_zero_limit_and_empty_clauses_are_ignored() {
    let request = QueryRequest::new("inventory")
        .with_filter(Document::new())
        .with_sort(Document::new())
        .with_limit(0)
        .with_skip(0);

    let rows = executor_with_inventory().execute(&request).await.unwrap();
    assert_eq!(rows.len(), 4);
}

#[tokio::test]
async fn test_filter_matching_nothing_returns_empty_live_result() {
    let request = QueryRequest::new("inventory").with_filter(Document::new().with("site", "west"));

    let outcome = executor_with_inventory()
        .execute_detailed(&request)
        .await
        .unwrap();
    assert_eq!(outcome.source, RowSource::Live);
    assert!(outcome.rows.is_empty());
}

#[tokio::test]
async fn test_find_failure_surfaces_as_execution_error() {
    let store = FailingStore::new("socket closed").with_document_count(3);
    let executor = QueryExecutor::new(StoreHandle::connected(store));

    let err = executor
        .execute(&QueryRequest::new("orders"))
        .await
        .unwrap_err();
    assert!(matches!(err, DynuiError::StoreExecution(_)));
    assert_eq!(err.to_string(), "Error executing query: socket closed");
}

#[tokio::test]
async fn test_count_failure_surfaces_as_execution_error() {
    let executor = QueryExecutor::new(StoreHandle::connected(FailingStore::new("auth expired")));

    let err = executor
        .execute(&QueryRequest::new("orders"))
        .await
        .unwrap_err();
    assert!(matches!(err, DynuiError::StoreExecution(_)));
}

#[tokio::test]
async fn test_collection_listing_tiers() {
    let demo: Vec<String> = DEMO_COLLECTIONS.iter().map(|s| s.to_string()).collect();
    let minimal: Vec<String> = MINIMAL_COLLECTIONS.iter().map(|s| s.to_string()).collect();

    let absent = QueryExecutor::new(StoreHandle::Unavailable);
    assert_eq!(absent.list_collections().await, demo);

    let empty = QueryExecutor::new(StoreHandle::connected(MemoryStore::new()));
    assert_eq!(empty.list_collections().await, demo);

    let failing = QueryExecutor::new(StoreHandle::connected(FailingStore::new("down")));
    assert_eq!(failing.list_collections().await, minimal);

    assert_eq!(
        executor_with_inventory().list_collections().await,
        vec!["inventory".to_string()]
    );
}
