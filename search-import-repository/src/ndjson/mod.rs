//! Newline-delimited JSON data source.
//!
//! Each collection lives in `<root>/<collection>.ndjson`, one record per line.

mod data_source;

pub use data_source::NdjsonDataSource;
