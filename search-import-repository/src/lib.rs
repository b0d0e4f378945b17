//! # Search Import Repository
//!
//! This crate provides the collaborator interfaces the import pipeline talks
//! to (data source, search backend, collection registry) together with
//! concrete implementations: an OpenSearch backend, an NDJSON-directory data
//! source, and a static collection registry.

pub mod config;
pub mod errors;
pub mod interfaces;
pub mod ndjson;
pub mod opensearch;
pub mod registry;
pub mod types;

pub use config::SearchBackendConfig;
pub use errors::{DataSourceError, RegistryError, SearchError};
pub use interfaces::{CollectionRegistry, DataSource, SearchBackend};
pub use ndjson::NdjsonDataSource;
pub use opensearch::OpenSearchBackend;
pub use registry::{CollectionDefinition, StaticCollectionRegistry};
pub use types::{ConfigScope, WriteTask};
