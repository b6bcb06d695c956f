//! Error types for dynui-data.
//!
//! Defines the main error enum used throughout the crate.

use thiserror::Error;

/// Main error type for dynui-data operations.
#[derive(Error, Debug)]
pub enum DynuiError {
    /// Caller-correctable request problems (blank collection name, zero row count, etc.)
    #[error("Validation error: {0}")]
    Validation(String),

    /// A live query against a reachable store failed.
    #[error("Error executing query: {0}")]
    StoreExecution(String),

    /// Raw failure reported by a store backend.
    #[error("Store error: {0}")]
    Store(String),

    /// Store could not be reached or opened at startup.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A referenced dataset does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Configuration errors (invalid config file, unsupported store URL, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DynuiError {
    /// Creates a validation error with the given message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Creates a store execution error with the given message.
    pub fn store_execution(msg: impl Into<String>) -> Self {
        Self::StoreExecution(msg.into())
    }

    /// Creates a store error with the given message.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Creates a connection error with the given message.
    pub fn connection(msg: impl Into<String>) -> Self {
        Self::Connection(msg.into())
    }

    /// Creates a not-found error with the given message.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the message without the category prefix.
    pub fn message(&self) -> &str {
        match self {
            Self::Validation(m)
            | Self::StoreExecution(m)
            | Self::Store(m)
            | Self::Connection(m)
            | Self::NotFound(m)
            | Self::Config(m)
            | Self::Internal(m) => m,
        }
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Validation(_) => "Validation Error",
            Self::StoreExecution(_) => "Query Error",
            Self::Store(_) => "Store Error",
            Self::Connection(_) => "Connection Error",
            Self::NotFound(_) => "Not Found",
            Self::Config(_) => "Configuration Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using DynuiError.
pub type Result<T> = std::result::Result<T, DynuiError>;
