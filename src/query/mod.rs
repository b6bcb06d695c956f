//! Query execution for dynui-data.
//!
//! This module isolates request validation, store execution, and the
//! sample-data fallback from the service envelopes.

pub mod executor;
pub mod request;
pub mod samples;

pub use executor::{FallbackReason, QueryExecutor, QueryOutcome, RowSource};
pub use request::{QueryRequest, COLLECTION_REQUIRED};
pub use samples::{sample_rows, DEMO_COLLECTIONS, MINIMAL_COLLECTIONS};
