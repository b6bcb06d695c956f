//! Service envelope integration tests.

use std::sync::Arc;

use dynui_data::config::Config;
use dynui_data::dataset::InMemoryCatalog;
use dynui_data::db::{Document, FailingStore, MemoryStore, StoreHandle};
use dynui_data::error::DynuiError;
use dynui_data::query::QueryRequest;
use dynui_data::service::DataService;
use dynui_data::synth::DataSynthesizer;
use pretty_assertions::assert_eq;
use serde_json::json;

fn service_over(store: StoreHandle) -> DataService {
    DataService::with_synthesizer(
        store,
        Arc::new(InMemoryCatalog::demo()),
        DataSynthesizer::seeded(2024),
    )
}

#[tokio::test]
async fn test_query_envelope_without_store() {
    let service = service_over(StoreHandle::Unavailable);
    let response = service.execute_query(&QueryRequest::new("products")).await;

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], json!(true));
    assert_eq!(json["count"], json!(2));
    assert_eq!(json["data"][0]["name"], json!("MacBook Pro"));
    assert_eq!(json["query"]["collection"], json!("products"));
    assert!(json.get("error").is_none());
}

#[tokio::test]
async fn test_query_envelope_echoes_request_in_camel_case() {
    let store = MemoryStore::new().with_collection(
        "orders",
        vec![Document::new().with("_id", "o1").with("status", "open")],
    );
    let request = QueryRequest::new("orders")
        .with_filter(Document::new().with("status", "open"))
        .with_limit(10);
    let response = service_over(StoreHandle::connected(store))
        .execute_query(&request)
        .await;

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(
        json["query"],
        json!({"collection": "orders", "filter": {"status": "open"}, "limit": 10})
    );
    assert_eq!(json["data"], json!([{"_id": "o1", "status": "open"}]));
}

#[tokio::test]
async fn test_query_envelope_reports_validation_message() {
    let response = service_over(StoreHandle::Unavailable)
        .execute_query(&QueryRequest::new(""))
        .await;
    assert!(!response.success);
    assert_eq!(response.error.as_deref(), Some("Collection name is required"));
    assert_eq!(response.count, None);
}

#[tokio::test]
async fn test_query_envelope_reports_store_failure() {
    let store = FailingStore::new("connection reset").with_document_count(5);
    let response = service_over(StoreHandle::connected(store))
        .execute_query(&QueryRequest::new("orders"))
        .await;
    assert!(!response.success);
    assert_eq!(
        response.error.as_deref(),
        Some("Error executing query: connection reset")
    );
}

#[tokio::test]
async fn test_collections_envelope_always_succeeds() {
    let response = service_over(StoreHandle::connected(FailingStore::new("down")))
        .list_collections()
        .await;
    assert!(response.success);
    assert_eq!(
        response.collections,
        Some(vec![
            "users".to_string(),
            "orders".to_string(),
            "products".to_string()
        ])
    );
}

#[test]
fn test_generate_for_demo_dataset() {
    let service = service_over(StoreHandle::Unavailable);
    let rows = service.generate_data_for_dataset("Orders", 5).unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(
        rows[4].keys().collect::<Vec<_>>(),
        vec![
            "id",
            "customer_name",
            "product_name",
            "quantity",
            "total_amount",
            "order_date",
            "status"
        ]
    );
}

#[test]
fn test_generate_for_configured_dataset() {
    let toml = r#"
[[datasets]]
id = "tickets"
name = "Support tickets"

[datasets.columns]
ticket_id = "number"
title = "string"
escalated = "boolean"
"#;
    let path = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(path.path(), toml).unwrap();
    let config = Config::load_from_file(path.path()).unwrap();

    let service = DataService::with_synthesizer(
        StoreHandle::Unavailable,
        Arc::new(InMemoryCatalog::from_config(&config.datasets)),
        DataSynthesizer::seeded(1),
    );

    let rows = service.generate_data_for_dataset("tickets", 3).unwrap();
    let json = serde_json::to_value(&rows).unwrap();
    assert_eq!(json[0]["ticket_id"], json!(1));
    assert_eq!(json[2]["ticket_id"], json!(3));
    assert_eq!(json[0]["title"], json!("Sample Item #1"));
    assert!(json[1]["escalated"].is_boolean());

    let err = service.generate_data_for_dataset("users", 3).unwrap_err();
    assert!(matches!(err, DynuiError::NotFound(_)));
}

#[test]
fn test_datasets_lists_catalog() {
    let service = service_over(StoreHandle::Unavailable);
    let ids: Vec<String> = service.datasets().into_iter().map(|d| d.id).collect();
    assert_eq!(ids, vec!["users", "products", "orders"]);
}
