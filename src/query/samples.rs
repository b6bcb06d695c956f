//! Canned sample rows for the ad-hoc query fallback.
//!
//! Served when the store is unavailable or the collection is empty. These are
//! fixed demo rows, independent of any dataset schema.

use crate::db::{Document, Row};
use chrono::Utc;

/// Collections offered when the store is absent or holds nothing.
pub const DEMO_COLLECTIONS: [&str; 5] = ["users", "orders", "products", "inventory", "analytics"];

/// Collections offered when listing fails.
pub const MINIMAL_COLLECTIONS: [&str; 3] = ["users", "orders", "products"];

/// Returns the canned rows for a collection name, matched case-insensitively.
///
/// Unknown names get a single placeholder row stamped with the current time
/// in epoch milliseconds.
pub fn sample_rows(collection: &str) -> Vec<Row> {
    match collection.to_lowercase().as_str() {
        "users" => vec![
            Document::new()
                .with("_id", "1")
                .with("name", "John Doe")
                .with("email", "john@example.com")
                .with("age", 30)
                .with("department", "Engineering"),
            Document::new()
                .with("_id", "2")
                .with("name", "Jane Smith")
                .with("email", "jane@example.com")
                .with("age", 28)
                .with("department", "Design"),
            Document::new()
                .with("_id", "3")
                .with("name", "Bob Johnson")
                .with("email", "bob@example.com")
                .with("age", 35)
                .with("department", "Marketing"),
        ],
        "orders" => vec![
            Document::new()
                .with("_id", "order1")
                .with("customerId", "1")
                .with("product", "Laptop")
                .with("quantity", 2)
                .with("price", 1200.00)
                .with("status", "completed"),
            Document::new()
                .with("_id", "order2")
                .with("customerId", "2")
                .with("product", "Mouse")
                .with("quantity", 1)
                .with("price", 25.99)
                .with("status", "pending"),
        ],
        "products" => vec![
            Document::new()
                .with("_id", "prod1")
                .with("name", "MacBook Pro")
                .with("category", "Electronics")
                .with("price", 2499.99)
                .with("inStock", true)
                .with("rating", 4.8),
            Document::new()
                .with("_id", "prod2")
                .with("name", "iPhone 15")
                .with("category", "Electronics")
                .with("price", 999.99)
                .with("inStock", false)
                .with("rating", 4.7),
        ],
        _ => vec![Document::new()
            .with("_id", "sample1")
            .with("collection", collection)
            .with("message", format!("Sample data for {collection}"))
            .with("timestamp", Utc::now().timestamp_millis())],
    }
}

/// Owned copy of a fixed collection list.
pub fn collection_list(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}
