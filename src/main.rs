//! dynui-data - Generic document query engine with sample data synthesis.

mod cli;

use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;

use cli::{Cli, Command};
use dynui_data::config::Config;
use dynui_data::dataset::InMemoryCatalog;
use dynui_data::db::{Document, StoreHandle};
use dynui_data::error::{DynuiError, Result};
use dynui_data::logging;
use dynui_data::query::QueryRequest;
use dynui_data::service::DataService;
use dynui_data::synth::DataSynthesizer;
use serde::Serialize;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();
    logging::init_stderr_logging(cli.verbose);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("{}: {}", e.category(), e.message());
            ExitCode::FAILURE
        }
    }
}

/// Runs the selected command. Returns whether the operation succeeded.
async fn run(cli: Cli) -> Result<bool> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;

    // Precedence: CLI flags, then environment, then config file
    config.store.apply_env_defaults();
    cli.apply_store_overrides(&mut config.store);
    config.store.validate()?;

    let seed = match &cli.command {
        Command::Generate { seed: Some(seed), .. } => Some(*seed),
        _ => config.synthesis.seed,
    };
    let synthesizer = match seed {
        Some(seed) => DataSynthesizer::seeded(seed),
        None => DataSynthesizer::new(),
    };

    let store = StoreHandle::from_config(&config.store).await;
    let catalog = Arc::new(InMemoryCatalog::from_config(&config.datasets));
    let service = DataService::with_synthesizer(store.clone(), catalog, synthesizer);

    let outcome = dispatch(&cli.command, &service, &store, &config).await;
    store.close().await?;
    outcome
}

async fn dispatch(
    command: &Command,
    service: &DataService,
    store: &StoreHandle,
    config: &Config,
) -> Result<bool> {
    match command {
        Command::Query(args) => {
            let request = args.to_request()?;
            let response = service.execute_query(&request).await;
            print_json(&response)?;
            Ok(response.success)
        }
        Command::Validate { collection } => {
            let response = service.validate_query(&QueryRequest::new(collection.clone()));
            print_json(&response)?;
            Ok(response.success)
        }
        Command::Collections => {
            let response = service.list_collections().await;
            print_json(&response)?;
            Ok(response.success)
        }
        Command::Datasets => {
            print_json(&service.datasets())?;
            Ok(true)
        }
        Command::Generate { dataset, rows, .. } => {
            let row_count = rows.unwrap_or(config.synthesis.default_rows);
            let data = service.generate_data_for_dataset(dataset, row_count)?;
            print_json(&data)?;
            Ok(true)
        }
        Command::Seed { collection, file } => {
            let inserted = seed_collection(store, collection, file).await?;
            info!("Inserted {inserted} documents into '{collection}'");
            print_json(&serde_json::json!({ "success": true, "inserted": inserted }))?;
            Ok(true)
        }
    }
}

/// Loads a JSON array of documents from `file` into `collection`.
async fn seed_collection(store: &StoreHandle, collection: &str, file: &Path) -> Result<u64> {
    if collection.trim().is_empty() {
        return Err(DynuiError::validation("Collection name is required"));
    }
    let store = store
        .store()
        .ok_or_else(|| DynuiError::config("Seeding requires an enabled, reachable store"))?;

    let content = std::fs::read_to_string(file).map_err(|e| {
        DynuiError::config(format!("Failed to read {}: {e}", file.display()))
    })?;
    let docs: Vec<Document> = serde_json::from_str(&content).map_err(|e| {
        DynuiError::validation(format!(
            "{} must hold a JSON array of objects: {e}",
            file.display()
        ))
    })?;

    store.insert_many(collection, docs).await
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| DynuiError::internal(format!("Failed to encode output: {e}")))?;
    println!("{json}");
    Ok(())
}
