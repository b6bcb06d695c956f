//! Dataset metadata consumed by schema-aware synthesis.
//!
//! Datasets are owned by the surrounding CRUD layer; this crate only reads
//! their schemas through the `DatasetCatalog` trait.

mod schema;

pub use schema::{ColumnType, Schema};

use serde::{Deserialize, Serialize};

/// A named dataset and the shape of its rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Stable identifier used in lookups.
    pub id: String,

    /// Display name.
    pub name: String,

    #[serde(default)]
    pub description: Option<String>,

    /// Column name to type tag, in declaration order.
    #[serde(default)]
    pub columns: Schema,
}

impl Dataset {
    pub fn new(id: impl Into<String>, name: impl Into<String>, columns: Schema) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            columns,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Read-only lookup of datasets by id.
pub trait DatasetCatalog: Send + Sync {
    /// Returns the dataset with the given id, if any.
    fn get(&self, dataset_id: &str) -> Option<&Dataset>;

    /// Returns every dataset in the catalog.
    fn list(&self) -> Vec<&Dataset>;

    /// Returns the schema of the dataset with the given id, if any.
    fn get_schema(&self, dataset_id: &str) -> Option<&Schema> {
        self.get(dataset_id).map(|d| &d.columns)
    }
}

/// A catalog held entirely in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    datasets: Vec<Dataset>,
}

impl InMemoryCatalog {
    pub fn new(datasets: Vec<Dataset>) -> Self {
        Self { datasets }
    }

    /// Builds a catalog from configured datasets, seeding the demo set when
    /// none are configured.
    pub fn from_config(datasets: &[Dataset]) -> Self {
        if datasets.is_empty() {
            Self::demo()
        } else {
            Self::new(datasets.to_vec())
        }
    }

    /// The demo datasets: users, products, orders.
    pub fn demo() -> Self {
        use ColumnType::*;

        let users = Dataset::new(
            "users",
            "Users",
            [
                ("id", Number),
                ("name", String),
                ("email", String),
                ("age", Number),
                ("status", String),
                ("created_date", Date),
            ]
            .into_iter()
            .collect(),
        )
        .with_description("User management dataset");

        let products = Dataset::new(
            "products",
            "Products",
            [
                ("id", Number),
                ("name", String),
                ("description", String),
                ("price", Number),
                ("category", String),
                ("stock_quantity", Number),
                ("is_active", Boolean),
            ]
            .into_iter()
            .collect(),
        )
        .with_description("Product catalog dataset");

        let orders = Dataset::new(
            "orders",
            "Orders",
            [
                ("id", Number),
                ("customer_name", String),
                ("product_name", String),
                ("quantity", Number),
                ("total_amount", Number),
                ("order_date", Date),
                ("status", String),
            ]
            .into_iter()
            .collect(),
        )
        .with_description("Customer orders dataset");

        Self::new(vec![users, products, orders])
    }
}

impl DatasetCatalog for InMemoryCatalog {
    fn get(&self, dataset_id: &str) -> Option<&Dataset> {
        self.datasets
            .iter()
            .find(|d| d.id.eq_ignore_ascii_case(dataset_id))
    }

    fn list(&self) -> Vec<&Dataset> {
        self.datasets.iter().collect()
    }
}
