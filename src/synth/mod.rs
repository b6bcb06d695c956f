//! Schema-driven sample data synthesis.
//!
//! Produces plausible rows for a dataset from nothing but its column names and
//! type tags. Identifier columns, names, and emails are pure functions of the
//! row index; everything else draws from the owned random source.

use crate::dataset::{ColumnType, Schema};
use crate::db::{Row, Value};
use chrono::{Local, NaiveDateTime, TimeDelta};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Output format of synthesized `date` values.
pub const DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Dates are drawn from this many days before now.
const DATE_WINDOW_DAYS: i64 = 365;

const FIRST_NAMES: [&str; 10] = [
    "John", "Jane", "Mike", "Sarah", "David", "Emma", "Chris", "Lisa", "Tom", "Anna",
];

const LAST_NAMES: [&str; 10] = [
    "Smith", "Johnson", "Williams", "Brown", "Jones", "Garcia", "Miller", "Davis", "Wilson",
    "Moore",
];

const EMAIL_DOMAINS: [&str; 4] = ["email.com", "test.org", "sample.net", "demo.io"];

const CATEGORIES: [&str; 8] = [
    "Electronics",
    "Clothing",
    "Books",
    "Home & Garden",
    "Sports",
    "Toys",
    "Food",
    "Beauty",
];

const STATUSES: [&str; 6] = [
    "Active",
    "Inactive",
    "Pending",
    "Completed",
    "Draft",
    "Published",
];

const TITLES: [&str; 8] = [
    "Product Title",
    "Sample Item",
    "Demo Product",
    "Test Article",
    "Example Entry",
    "Sample Record",
    "Demo Item",
    "Test Product",
];

/// Generates synthetic rows from a schema.
#[derive(Debug, Clone)]
pub struct DataSynthesizer<R = StdRng> {
    rng: R,
}

impl DataSynthesizer<StdRng> {
    /// Creates a synthesizer seeded from the operating system.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Creates a synthesizer whose random columns repeat for the same seed.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for DataSynthesizer<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> DataSynthesizer<R> {
    /// Creates a synthesizer drawing from the given random source.
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Generates `row_count` rows, with dates relative to the current local time.
    pub fn generate(&mut self, schema: &Schema, row_count: usize) -> Vec<Row> {
        self.generate_at(schema, row_count, Local::now().naive_local())
    }

    /// Generates `row_count` rows, with dates relative to `now`.
    ///
    /// Row indexes are 1-based. Each row holds one value per schema column, in
    /// schema order.
    pub fn generate_at(&mut self, schema: &Schema, row_count: usize, now: NaiveDateTime) -> Vec<Row> {
        (1..=row_count)
            .map(|index| {
                schema
                    .columns()
                    .map(|(name, column_type)| {
                        (name, self.generate_value(column_type, index, name, now))
                    })
                    .collect()
            })
            .collect()
    }

    /// Synthesizes one value for a column at a 1-based row index.
    pub fn generate_value(
        &mut self,
        column_type: &ColumnType,
        index: usize,
        column_name: &str,
        now: NaiveDateTime,
    ) -> Value {
        let lower = column_name.to_lowercase();
        match column_type {
            ColumnType::Number => self.number_for(&lower, index),
            ColumnType::String => self.string_for(&lower, column_name, index),
            ColumnType::Boolean => Value::Bool(self.rng.random_bool(0.5)),
            ColumnType::Date => {
                let days_back = self.rng.random_range(0..DATE_WINDOW_DAYS);
                let date = now - TimeDelta::days(days_back);
                Value::String(date.format(DATE_FORMAT).to_string())
            }
            ColumnType::Other(tag) => Value::String(format!("Unknown type: {tag}")),
        }
    }

    /// First matching substring wins; `id` is checked before anything random.
    fn number_for(&mut self, lower: &str, index: usize) -> Value {
        if lower.contains("id") {
            Value::Int(index as i64)
        } else if lower.contains("price") {
            // Whole cents in [10.00, 1010.00)
            let cents: u32 = self.rng.random_range(1_000..101_000);
            Value::Float(f64::from(cents) / 100.0)
        } else if lower.contains("age") {
            Value::Int(self.rng.random_range(18..=87))
        } else if lower.contains("quantity") || lower.contains("stock") {
            Value::Int(self.rng.random_range(1..=100))
        } else {
            Value::Int(self.rng.random_range(1..=1000))
        }
    }

    fn string_for(&mut self, lower: &str, column_name: &str, index: usize) -> Value {
        let text = if lower.contains("name") {
            generate_name(index)
        } else if lower.contains("email") {
            generate_email(index)
        } else if lower.contains("category") {
            CATEGORIES[self.rng.random_range(0..CATEGORIES.len())].to_string()
        } else if lower.contains("status") {
            STATUSES[self.rng.random_range(0..STATUSES.len())].to_string()
        } else if lower.contains("title") {
            format!("{} #{index}", TITLES[index % TITLES.len()])
        } else {
            format!("Sample {column_name} {index}")
        };
        Value::String(text)
    }
}

/// Full name for a row index. The last name strides by 3 so pairs don't repeat in lockstep.
pub fn generate_name(index: usize) -> String {
    format!(
        "{} {}",
        FIRST_NAMES[index % FIRST_NAMES.len()],
        LAST_NAMES[(index * 3) % LAST_NAMES.len()]
    )
}

/// Email matching `generate_name` for the same row index.
pub fn generate_email(index: usize) -> String {
    let local = generate_name(index).to_lowercase().replace(' ', ".");
    format!("{local}@{}", EMAIL_DOMAINS[index % EMAIL_DOMAINS.len()])
}
