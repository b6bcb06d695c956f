//! Command-line argument parsing for dynui-data.
//!
//! Uses clap to parse the global store options and one subcommand per
//! exposed operation.

use clap::{Parser, Subcommand};
use dynui_data::config::{Config, StoreConfig};
use dynui_data::db::Document;
use dynui_data::error::{DynuiError, Result};
use dynui_data::query::QueryRequest;
use std::path::PathBuf;

/// Query documents, with sample data when the store has none.
#[derive(Parser, Debug)]
#[command(name = "dynui-data")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Store URL (sqlite:///path/to/store.db or memory://); enables the store
    #[arg(long, value_name = "URL")]
    pub store_url: Option<String>,

    /// Ignore any configured store and serve sample data only
    #[arg(long, conflicts_with = "store_url")]
    pub no_store: bool,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run an ad-hoc query against a collection
    Query(QueryArgs),

    /// Check that a query names a collection
    Validate {
        /// Target collection
        #[arg(short, long, default_value = "")]
        collection: String,
    },

    /// List collection names
    Collections,

    /// List the datasets known to the catalog
    Datasets,

    /// Synthesize rows for a dataset
    Generate {
        /// Dataset id
        #[arg(short, long)]
        dataset: String,

        /// Number of rows (defaults to synthesis.default_rows)
        #[arg(short, long)]
        rows: Option<usize>,

        /// Seed for reproducible random columns
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Insert a JSON array of documents into a collection
    Seed {
        /// Target collection
        #[arg(short, long)]
        collection: String,

        /// JSON file containing an array of objects
        #[arg(short, long, value_name = "PATH")]
        file: PathBuf,
    },
}

#[derive(clap::Args, Debug)]
pub struct QueryArgs {
    /// Target collection
    #[arg(short, long, default_value = "")]
    pub collection: String,

    /// Filter document as JSON (e.g. '{"age": {"$gt": 30}}')
    #[arg(long, value_name = "JSON")]
    pub filter: Option<String>,

    /// Projection document as JSON (e.g. '{"name": 1}')
    #[arg(long, value_name = "JSON")]
    pub projection: Option<String>,

    /// Sort document as JSON (e.g. '{"age": -1}')
    #[arg(long, value_name = "JSON")]
    pub sort: Option<String>,

    /// Documents to skip
    #[arg(long)]
    pub skip: Option<u64>,

    /// Maximum documents to return
    #[arg(long)]
    pub limit: Option<u64>,
}

impl QueryArgs {
    /// Builds a query request, parsing the JSON clauses.
    pub fn to_request(&self) -> Result<QueryRequest> {
        Ok(QueryRequest {
            collection: self.collection.clone(),
            filter: parse_clause("filter", self.filter.as_deref())?,
            projection: parse_clause("projection", self.projection.as_deref())?,
            sort: parse_clause("sort", self.sort.as_deref())?,
            skip: self.skip,
            limit: self.limit,
        })
    }
}

fn parse_clause(name: &str, raw: Option<&str>) -> Result<Option<Document>> {
    raw.map(|json| {
        serde_json::from_str(json)
            .map_err(|e| DynuiError::validation(format!("Invalid {name} JSON: {e}")))
    })
    .transpose()
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Applies store flags on top of the file/env configuration.
    pub fn apply_store_overrides(&self, store: &mut StoreConfig) {
        if self.no_store {
            store.enabled = false;
        } else if let Some(url) = &self.store_url {
            *store = StoreConfig::enabled(url.clone());
        }
    }
}
