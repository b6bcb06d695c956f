//! dynui-data - Generic document query engine with sample data synthesis.
//!
//! This library exposes the core modules for use by the binary and in
//! integration tests.

pub mod config;
pub mod dataset;
pub mod db;
pub mod error;
pub mod logging;
pub mod query;
pub mod service;
pub mod synth;
