//! Configuration management for dynui-data.
//!
//! Handles loading configuration from TOML files and environment variables,
//! covering the document store, the dataset catalog, and synthesis defaults.

use crate::dataset::Dataset;
use crate::db::StoreBackend;
use crate::error::{DynuiError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable that supplies the store URL.
pub const STORE_URL_ENV: &str = "DYNUI_STORE_URL";

/// Environment variable that switches the store on or off.
pub const STORE_ENABLED_ENV: &str = "DYNUI_STORE_ENABLED";

/// Main configuration structure for dynui-data.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Document store settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Schema-aware synthesis settings.
    #[serde(default)]
    pub synthesis: SynthesisConfig,

    /// Dataset definitions. Empty means the built-in demo datasets.
    #[serde(default)]
    pub datasets: Vec<Dataset>,
}

/// Document store configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StoreConfig {
    /// Whether to connect to a store at all.
    #[serde(default)]
    pub enabled: bool,

    /// Store URL: `sqlite:///path/to/store.db` or `memory://`.
    pub url: Option<String>,
}

impl StoreConfig {
    /// Creates an enabled config for the given URL.
    pub fn enabled(url: impl Into<String>) -> Self {
        Self {
            enabled: true,
            url: Some(url.into()),
        }
    }

    /// Checks that an enabled store names a supported backend.
    pub fn validate(&self) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }
        match &self.url {
            Some(url) => StoreBackend::from_url(url).map(|_| ()),
            None => Err(DynuiError::config(
                "Store is enabled but no store URL is configured",
            )),
        }
    }

    /// Applies environment variables as defaults.
    ///
    /// `DYNUI_STORE_URL` fills a missing URL and enables the store;
    /// `DYNUI_STORE_ENABLED` then has the final word on `enabled`.
    pub fn apply_env_defaults(&mut self) {
        if self.url.is_none() {
            if let Ok(url) = std::env::var(STORE_URL_ENV) {
                if !url.trim().is_empty() {
                    self.url = Some(url);
                    self.enabled = true;
                }
            }
        }
        if let Ok(flag) = std::env::var(STORE_ENABLED_ENV) {
            if let Some(enabled) = parse_flag(&flag) {
                self.enabled = enabled;
            }
        }
    }

    /// Returns a display-safe string for logs.
    pub fn display_string(&self) -> String {
        match (&self.enabled, &self.url) {
            (false, _) => "disabled".to_string(),
            (true, Some(url)) => url.clone(),
            (true, None) => "enabled (no url)".to_string(),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Schema-aware synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesisConfig {
    /// Rows generated when a caller does not ask for a count.
    #[serde(default = "default_rows")]
    pub default_rows: usize,

    /// Fixed seed for reproducible random columns.
    pub seed: Option<u64>,
}

fn default_rows() -> usize {
    50
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            default_rows: default_rows(),
            seed: None,
        }
    }
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dynui-data")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| DynuiError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            DynuiError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints serde cannot express.
    ///
    /// The store section is left to `StoreConfig::validate`, which runs once
    /// environment and command-line overrides have been merged in.
    pub fn validate(&self) -> Result<()> {
        if self.synthesis.default_rows == 0 {
            return Err(DynuiError::config("synthesis.default_rows must be positive"));
        }

        for (i, dataset) in self.datasets.iter().enumerate() {
            if dataset.id.trim().is_empty() {
                return Err(DynuiError::config(format!("datasets[{i}] has a blank id")));
            }
            let duplicate = self.datasets[..i]
                .iter()
                .any(|d| d.id.eq_ignore_ascii_case(&dataset.id));
            if duplicate {
                return Err(DynuiError::config(format!(
                    "Duplicate dataset id '{}'",
                    dataset.id
                )));
            }
        }
        Ok(())
    }
}
