//! SQLite store integration tests.
//!
//! Each test opens its own store file in a temporary directory.

use dynui_data::config::StoreConfig;
use dynui_data::db::{
    Document, DocumentStore, FindOptions, MemoryStore, SqliteStore, StoreHandle, Value,
};
use dynui_data::query::{QueryExecutor, QueryRequest, RowSource};
use tempfile::tempdir;

fn people() -> Vec<Document> {
    vec![
        Document::new().with("_id", "p1").with("name", "Ada").with("age", 36),
        Document::new().with("_id", "p2").with("name", "Linus").with("age", 29),
        Document::new().with("_id", "p3").with("name", "Grace").with("age", 45),
    ]
}

async fn create_test_store() -> (SqliteStore, tempfile::TempDir) {
    let dir = tempdir().unwrap();
    let store = SqliteStore::open(dir.path().join("store.db")).await.unwrap();
    (store, dir)
}

#[tokio::test]
async fn test_store_file_is_created() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nested").join("store.db");

    let store = SqliteStore::open(path.clone()).await.unwrap();
    assert!(path.exists());
    assert_eq!(store.path(), &path);
    store.close().await.unwrap();
}

#[tokio::test]
async fn test_insert_count_and_list() {
    let (store, _dir) = create_test_store().await;

    assert_eq!(store.document_count("people").await.unwrap(), 0);
    assert!(store.list_collection_names().await.unwrap().is_empty());

    let inserted = store.insert_many("people", people()).await.unwrap();
    assert_eq!(inserted, 3);
    assert_eq!(store.document_count("people").await.unwrap(), 3);
    assert_eq!(
        store.list_collection_names().await.unwrap(),
        vec!["people".to_string()]
    );
    store.close().await.unwrap();
}

#[tokio::test]
async fn test_find_round_trips_documents_in_insertion_order() {
    let (store, _dir) = create_test_store().await;
    store.insert_many("people", people()).await.unwrap();

    let docs = store
        .find("people", &FindOptions::default())
        .await
        .unwrap();
    assert_eq!(docs, people());
    store.close().await.unwrap();
}

#[tokio::test]
async fn test_find_with_filter_sort_and_window() {
    let (store, _dir) = create_test_store().await;
    store.insert_many("people", people()).await.unwrap();

    let options = FindOptions {
        filter: Some(Document::new().with("age", Document::new().with("$gte", 30))),
        sort: Some(Document::new().with("age", -1)),
        limit: Some(1),
        ..Default::default()
    };
    let docs = store.find("people", &options).await.unwrap();
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].get("name").and_then(Value::as_str), Some("Grace"));

    let window = FindOptions {
        skip: Some(1),
        limit: Some(1),
        ..Default::default()
    };
    let docs = store.find("people", &window).await.unwrap();
    assert_eq!(docs[0].get("_id").and_then(Value::as_str), Some("p2"));
    store.close().await.unwrap();
}

#[tokio::test]
async fn test_oversized_window_matches_memory_store() {
    let (sqlite, _dir) = create_test_store().await;
    sqlite.insert_many("people", people()).await.unwrap();
    let memory = MemoryStore::new().with_collection("people", people());

    let windows = [
        FindOptions {
            skip: Some(u64::MAX),
            ..Default::default()
        },
        FindOptions {
            skip: Some(1),
            limit: Some(u64::MAX),
            ..Default::default()
        },
    ];
    for options in &windows {
        let from_sqlite = sqlite.find("people", options).await.unwrap();
        let from_memory = memory.find("people", options).await.unwrap();
        assert_eq!(from_sqlite, from_memory, "window {options:?}");
    }
    assert!(sqlite.find("people", &windows[0]).await.unwrap().is_empty());
    assert_eq!(sqlite.find("people", &windows[1]).await.unwrap().len(), 2);
    sqlite.close().await.unwrap();
}

#[tokio::test]
async fn test_documents_survive_reopen() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("store.db");

    let store = SqliteStore::open(path.clone()).await.unwrap();
    store.insert_many("people", people()).await.unwrap();
    store.close().await.unwrap();

    let reopened = SqliteStore::open(path).await.unwrap();
    assert_eq!(reopened.document_count("people").await.unwrap(), 3);
    reopened.close().await.unwrap();
}

#[tokio::test]
async fn test_executor_over_sqlite_url() {
    let dir = tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("store.db").display());
    let handle = StoreHandle::from_config(&StoreConfig::enabled(url)).await;
    assert!(handle.is_connected());

    let executor = QueryExecutor::new(handle.clone());

    // Empty collection first: canned rows.
    let outcome = executor
        .execute_detailed(&QueryRequest::new("people"))
        .await
        .unwrap();
    assert!(matches!(outcome.source, RowSource::Sample(_)));

    handle
        .store()
        .unwrap()
        .insert_many("people", people())
        .await
        .unwrap();

    let outcome = executor
        .execute_detailed(
            &QueryRequest::new("people")
                .with_projection(Document::new().with("name", 1))
                .with_sort(Document::new().with("name", 1)),
        )
        .await
        .unwrap();
    assert_eq!(outcome.source, RowSource::Live);
    let names: Vec<&str> = outcome
        .rows
        .iter()
        .filter_map(|r| r.get("name").and_then(Value::as_str))
        .collect();
    assert_eq!(names, vec!["Ada", "Grace", "Linus"]);
    assert!(outcome.rows.iter().all(|r| r.contains_key("_id") && r.len() == 2));

    assert_eq!(executor.list_collections().await, vec!["people".to_string()]);
    handle.close().await.unwrap();
}
