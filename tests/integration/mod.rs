//! Integration tests for dynui-data.

pub mod query_test;
pub mod service_test;
pub mod sqlite_test;
pub mod synth_test;
