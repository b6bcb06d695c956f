//! Schema-driven synthesis integration tests.

use chrono::NaiveDateTime;
use dynui_data::dataset::{ColumnType, DatasetCatalog, InMemoryCatalog, Schema};
use dynui_data::db::Value;
use dynui_data::synth::{generate_email, generate_name, DataSynthesizer, DATE_FORMAT};
use pretty_assertions::assert_eq;

fn now() -> NaiveDateTime {
    NaiveDateTime::parse_from_str("2025-03-01 08:00:00", DATE_FORMAT).unwrap()
}

fn str_of<'a>(value: Option<&'a Value>) -> &'a str {
    value.and_then(Value::as_str).unwrap_or_default()
}

#[test]
fn test_rows_carry_exactly_the_schema_columns() {
    let catalog = InMemoryCatalog::demo();
    let mut synth = DataSynthesizer::seeded(7);

    for dataset in catalog.list() {
        let rows = synth.generate_at(&dataset.columns, 25, now());
        assert_eq!(rows.len(), 25);

        let expected: Vec<&str> = dataset.columns.columns().map(|(name, _)| name).collect();
        for row in &rows {
            let keys: Vec<&str> = row.keys().collect();
            assert_eq!(keys, expected);
        }
    }
}

#[test]
fn test_id_and_identity_columns_are_index_derived() {
    let schema = Schema::new()
        .with_column("id", ColumnType::Number)
        .with_column("name", ColumnType::String)
        .with_column("email", ColumnType::String);

    // Different seeds must not change the index-derived columns.
    let first = DataSynthesizer::seeded(1).generate_at(&schema, 12, now());
    let second = DataSynthesizer::seeded(2).generate_at(&schema, 12, now());
    assert_eq!(first, second);

    for (i, row) in first.iter().enumerate() {
        let index = i + 1;
        assert_eq!(row.get("id"), Some(&Value::Int(index as i64)));
        assert_eq!(str_of(row.get("name")), generate_name(index));
        assert_eq!(str_of(row.get("email")), generate_email(index));
    }
}

#[test]
fn test_email_is_derived_from_name() {
    for index in 1..=30 {
        let name = generate_name(index);
        let email = generate_email(index);
        let (local, domain) = email.split_once('@').unwrap();
        assert_eq!(local, name.to_lowercase().replace(' ', "."));
        assert!(["email.com", "test.org", "sample.net", "demo.io"].contains(&domain));
    }
}

#[test]
fn test_numeric_rules_respect_ranges() {
    let catalog = InMemoryCatalog::demo();
    let products = catalog.get_schema("products").unwrap();
    let rows = DataSynthesizer::seeded(11).generate_at(products, 200, now());

    for row in &rows {
        let price = row.get("price").and_then(Value::as_f64).unwrap();
        assert!((10.0..1010.0).contains(&price), "price out of range: {price}");
        assert_eq!((price * 100.0).round() / 100.0, price);

        let stock = row.get("stock_quantity").and_then(Value::as_f64).unwrap();
        assert!((1.0..=100.0).contains(&stock));
        assert!(matches!(row.get("is_active"), Some(Value::Bool(_))));
    }

    let users = catalog.get_schema("users").unwrap();
    for row in DataSynthesizer::seeded(12).generate_at(users, 200, now()) {
        let age = row.get("age").and_then(Value::as_f64).unwrap();
        assert!((18.0..=87.0).contains(&age));
        let status = str_of(row.get("status"));
        assert!(["Active", "Inactive", "Pending", "Completed", "Draft", "Published"].contains(&status));
    }
}

#[test]
fn test_dates_fall_within_the_last_year() {
    let schema = Schema::new().with_column("created_date", ColumnType::Date);
    let rows = DataSynthesizer::seeded(3).generate_at(&schema, 100, now());

    for row in rows {
        let text = str_of(row.get("created_date"));
        let date = NaiveDateTime::parse_from_str(text, DATE_FORMAT).unwrap();
        let days_back = (now() - date).num_days();
        assert!((0..365).contains(&days_back), "date too old: {text}");
    }
}

#[test]
fn test_fallback_strings_and_unknown_types() {
    let schema = Schema::new()
        .with_column("notes", ColumnType::String)
        .with_column("location", ColumnType::parse("geo"));
    let rows = DataSynthesizer::seeded(5).generate_at(&schema, 2, now());

    assert_eq!(str_of(rows[0].get("notes")), "Sample notes 1");
    assert_eq!(str_of(rows[1].get("notes")), "Sample notes 2");
    assert_eq!(str_of(rows[0].get("location")), "Unknown type: geo");
}

#[test]
fn test_seeded_synthesizers_repeat() {
    let catalog = InMemoryCatalog::demo();
    let orders = catalog.get_schema("orders").unwrap();

    let a = DataSynthesizer::seeded(42).generate_at(orders, 10, now());
    let b = DataSynthesizer::seeded(42).generate_at(orders, 10, now());
    assert_eq!(a, b);
}
